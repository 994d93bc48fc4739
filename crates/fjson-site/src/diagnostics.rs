//! Broken-reference diagnostics.
//!
//! Reference resolution never fails a document: unresolved ids degrade to
//! absent links and are reported here instead. [`Diagnostics`] is an explicit
//! side-output passed by `&mut` into resolution, so resolvers stay pure
//! functions of the store plus their collector.

use std::fmt;

use serde::Serialize;

/// Kind of broken reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The document's parent id has no entry.
    MissingParent {
        /// Unresolved parent id.
        parent: String,
    },
    /// A neighbour or first-chapter id listed by a parent has no entry.
    MissingReference {
        /// Unresolved id.
        target: String,
    },
    /// The parent's listing does not contain the document.
    NotListed {
        /// Parent id.
        parent: String,
    },
}

/// One broken reference encountered while processing a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Document being processed when the reference was followed.
    pub document: String,
    /// What could not be resolved.
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::MissingParent { parent: missing }
            | DiagnosticKind::MissingReference { target: missing } => write!(
                f,
                "Could not find MetaEntry for file \"{missing}\" (referenced from \"{}\")",
                self.document
            ),
            DiagnosticKind::NotListed { parent } => write!(
                f,
                "Document \"{}\" is not listed by its parent \"{parent}\"",
                self.document
            ),
        }
    }
}

/// Collector for diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a broken reference found while processing `document`.
    pub fn note(&mut self, document: impl Into<String>, kind: DiagnosticKind) {
        let diagnostic = Diagnostic {
            document: document.into(),
            kind,
        };
        tracing::debug!(%diagnostic, "Broken reference");
        self.items.push(diagnostic);
    }

    /// Move all diagnostics of `other` to the end of this collector.
    pub fn append(&mut self, other: &mut Diagnostics) {
        self.items.append(&mut other.items);
    }

    /// Iterate diagnostics in the order they were recorded.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Number of recorded diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the collector.
    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
