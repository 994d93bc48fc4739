//! Build report lines on stderr.

use std::fmt::Display;
use std::path::Path;

use console::{Style, Term};
use fjson_site::{Diagnostic, DocumentFailure};

/// Styled writer for `fjson build` progress and results.
pub(crate) struct Output {
    term: Term,
    label: Style,
    warn: Style,
    fail: Style,
    done: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            label: Style::new().dim(),
            warn: Style::new().yellow(),
            fail: Style::new().red(),
            done: Style::new().green(),
        }
    }

    /// Resolved input or output location, e.g. `Pages: _build/html`.
    pub(crate) fn setting(&self, label: &str, path: &Path) {
        self.line(format!(
            "{} {}",
            self.label.apply_to(format!("{label}:")),
            path.display()
        ));
    }

    /// Broken reference found while resolving navigation.
    pub(crate) fn diagnostic(&self, diagnostic: &Diagnostic) {
        self.line(self.warn.apply_to(diagnostic_line(diagnostic)));
    }

    /// Document that produced no record, with its cause indented below.
    pub(crate) fn failure(&self, failure: &DocumentFailure) {
        self.line(self.fail.apply_to(format!("Failed: {}", failure.id)));
        self.line(format!("  {}", self.label.apply_to(&failure.error)));
    }

    pub(crate) fn summary(&self, written: usize, output_dir: &Path, broken: usize) {
        self.line(self.done.apply_to(summary_line(written, output_dir, broken)));
    }

    /// Fatal error ending the run.
    pub(crate) fn error(&self, err: &dyn Display) {
        self.line(self.fail.apply_to(format!("Error: {err}")));
    }

    fn line(&self, text: impl Display) {
        // stderr gone: nothing left to report to
        let _ = self.term.write_line(&text.to_string());
    }
}

fn diagnostic_line(diagnostic: &Diagnostic) -> String {
    format!("Warning: {diagnostic}")
}

fn summary_line(written: usize, output_dir: &Path, broken: usize) -> String {
    let noun = if written == 1 { "record" } else { "records" };
    match broken {
        0 => format!("Wrote {written} {noun} to {}", output_dir.display()),
        1 => format!(
            "Wrote {written} {noun} to {} (1 broken reference)",
            output_dir.display()
        ),
        n => format!(
            "Wrote {written} {noun} to {} ({n} broken references)",
            output_dir.display()
        ),
    }
}
