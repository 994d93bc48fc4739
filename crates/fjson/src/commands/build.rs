//! `fjson build` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use fjson_config::{CliSettings, Config};
use fjson_site::{MetaStore, Progress, RecordAssembler, RecordWriter};
use fjson_storage::{FsPageSource, PageSource};
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover fjson.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Metadata store dump produced by the parsing stage (overrides config).
    #[arg(short, long)]
    meta_file: Option<PathBuf>,

    /// Directory with rendered `{id}.html` pages (overrides config).
    #[arg(long)]
    html_dir: Option<PathBuf>,

    /// Output directory for `.fjson` records (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Identifier of the root index document (overrides config).
    #[arg(long)]
    root_id: Option<String>,

    /// Process documents one at a time.
    #[arg(long)]
    sequential: bool,

    /// Write compact JSON instead of pretty-printed JSON.
    #[arg(long)]
    compact: bool,

    /// Enable verbose output (show INFO logs).
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    /// Configuration overrides given on the command line.
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            meta_file: self.meta_file.clone(),
            html_dir: self.html_dir.clone(),
            output_dir: self.output_dir.clone(),
            root_id: self.root_id.clone(),
            parallel: self.sequential.then_some(false),
            pretty: self.compact.then_some(false),
        }
    }

    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        let build = &config.build_resolved;

        if let Some(path) = &config.config_path {
            output.setting("Config", path);
        }
        output.setting("Metadata", &build.meta_file);
        output.setting("Pages", &build.html_dir);
        output.setting("Output", &build.output_dir);

        let store = Arc::new(MetaStore::load(&build.meta_file)?);
        let pages: Arc<dyn PageSource> = Arc::new(FsPageSource::new(build.html_dir.clone()));

        let assembler = RecordAssembler::new(store, pages)
            .with_root_id(build.root_id.clone())
            .with_parallel(build.parallel);

        let progress = BarProgress::new();
        let report = assembler.assemble_all(&progress);

        for diagnostic in &report.diagnostics {
            tracing::warn!(document = %diagnostic.document, "{diagnostic}");
            output.diagnostic(diagnostic);
        }
        for failure in &report.failures {
            output.failure(failure);
        }

        let writer = RecordWriter::new(build.output_dir.clone()).with_pretty(build.pretty);
        let written = writer.write_all(&report.records)?;

        let total = assembler.store().len();
        if !report.is_success() {
            return Err(CliError::Build(report.failures.len(), total));
        }

        output.summary(written, &build.output_dir, report.diagnostics.len());
        Ok(())
    }
}

/// Progress bar on stderr, hidden when stderr is not a terminal.
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) =
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} documents ({elapsed})")
        {
            bar.set_style(style);
        }
        Self { bar }
    }
}

impl Progress for BarProgress {
    fn start(&self, total: usize) {
        self.bar.set_length(u64::try_from(total).unwrap_or(u64::MAX));
    }

    fn advance(&self) {
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
