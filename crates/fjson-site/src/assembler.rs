//! Output record assembly.
//!
//! [`RecordAssembler`] combines a document's metadata, its table of contents,
//! its navigation links and the body of its rendered page into an
//! [`OutputRecord`].
//!
//! # Batch processing
//!
//! [`RecordAssembler::assemble_all`] processes every document of the store,
//! in parallel on the global rayon pool unless sequential mode is selected.
//! Each document gets its own [`Diagnostics`]; results are merged in store
//! order, so the report is identical in both modes. A failing document is
//! recorded in the report and never aborts the batch.

use std::sync::Arc;
use std::time::Instant;

use fjson_storage::{PageSource, StorageError};
use rayon::prelude::*;

use crate::body::extract_body;
use crate::diagnostics::Diagnostics;
use crate::meta::MetaStore;
use crate::navigation::{DEFAULT_ROOT_ID, NavigationError, NavigationResolver};
use crate::record::OutputRecord;
use crate::toc::document_toc;

/// Convert Duration to milliseconds as f64.
fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Error assembling a single document.
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    /// The document is not in the store.
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    /// The rendered page cannot be read.
    #[error("Failed to read rendered page for \"{id}\": {source}")]
    Page {
        /// Document id.
        id: String,
        /// Underlying storage error.
        #[source]
        source: StorageError,
    },
}

/// Batch progress observer.
///
/// Called from worker threads, hence the `Sync` bound.
pub trait Progress: Sync {
    /// Batch is starting with `total` documents.
    fn start(&self, _total: usize) {}

    /// One more document was processed.
    fn advance(&self) {}

    /// Batch is done.
    fn finish(&self) {}
}

/// Progress observer that ignores all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullProgress;

impl Progress for NullProgress {}

/// Successfully assembled document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssembledRecord {
    /// Document id.
    pub id: String,
    /// Assembled record.
    pub record: OutputRecord,
}

/// Document that could not be assembled.
#[derive(Debug)]
pub struct DocumentFailure {
    /// Document id.
    pub id: String,
    /// Cause.
    pub error: AssembleError,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Assembled records in store order.
    pub records: Vec<AssembledRecord>,
    /// Failed documents in store order.
    pub failures: Vec<DocumentFailure>,
    /// Broken references of all documents, in store order.
    pub diagnostics: Diagnostics,
}

impl BuildReport {
    /// True if every document was assembled.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Assembles output records from the metadata store and rendered pages.
pub struct RecordAssembler {
    store: Arc<MetaStore>,
    pages: Arc<dyn PageSource>,
    root_id: String,
    parallel: bool,
}

impl RecordAssembler {
    /// Create an assembler using the default root id and parallel batches.
    #[must_use]
    pub fn new(store: Arc<MetaStore>, pages: Arc<dyn PageSource>) -> Self {
        Self {
            store,
            pages,
            root_id: DEFAULT_ROOT_ID.to_owned(),
            parallel: true,
        }
    }

    /// Use a different root index id.
    #[must_use]
    pub fn with_root_id(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = root_id.into();
        self
    }

    /// Enable or disable parallel batch processing.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Metadata store backing this assembler.
    #[must_use]
    pub fn store(&self) -> &MetaStore {
        &self.store
    }

    /// Assemble the record of a single document.
    ///
    /// Broken references degrade to absent links and are reported to
    /// `diagnostics`.
    ///
    /// # Errors
    ///
    /// Returns [`AssembleError::Navigation`] if `id` is not in the store and
    /// [`AssembleError::Page`] if its rendered page cannot be read.
    pub fn assemble(
        &self,
        id: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<OutputRecord, AssembleError> {
        let start = Instant::now();

        let entry = self
            .store
            .get(id)
            .ok_or_else(|| NavigationError::MissingDocument(id.to_owned()))?;

        let navigation = NavigationResolver::new(&self.store)
            .with_root_id(&self.root_id)
            .resolve(id, diagnostics)?;

        let html = self.pages.read(id).map_err(|source| AssembleError::Page {
            id: id.to_owned(),
            source,
        })?;

        let record = OutputRecord {
            title: entry.title.clone(),
            current_page_name: entry.id.clone(),
            toc: document_toc(entry),
            next: navigation.next,
            prev: navigation.prev,
            body: extract_body(&html),
        };

        tracing::debug!(id, elapsed_ms = elapsed_ms(start), "Record assembled");

        Ok(record)
    }

    /// Assemble every document of the store.
    ///
    /// Never fails as a whole: per-document failures are collected in the
    /// returned report.
    pub fn assemble_all(&self, progress: &dyn Progress) -> BuildReport {
        let start = Instant::now();
        let ids: Vec<&str> = self.store.ids().collect();

        progress.start(ids.len());

        let outcomes: Vec<_> = if self.parallel {
            ids.par_iter()
                .map(|&id| self.assemble_tracked(id, progress))
                .collect()
        } else {
            ids.iter()
                .map(|&id| self.assemble_tracked(id, progress))
                .collect()
        };

        let mut report = BuildReport::default();
        for (id, result, mut diagnostics) in outcomes {
            report.diagnostics.append(&mut diagnostics);
            match result {
                Ok(record) => report.records.push(AssembledRecord {
                    id: id.to_owned(),
                    record,
                }),
                Err(error) => {
                    tracing::warn!(id, %error, "Failed to assemble record");
                    report.failures.push(DocumentFailure {
                        id: id.to_owned(),
                        error,
                    });
                }
            }
        }

        progress.finish();

        tracing::info!(
            documents = ids.len(),
            records = report.records.len(),
            failures = report.failures.len(),
            diagnostics = report.diagnostics.len(),
            parallel = self.parallel,
            elapsed_ms = elapsed_ms(start),
            "Records assembled"
        );

        report
    }

    fn assemble_tracked<'s>(
        &self,
        id: &'s str,
        progress: &dyn Progress,
    ) -> (&'s str, Result<OutputRecord, AssembleError>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let result = self.assemble(id, &mut diagnostics);
        progress.advance();
        (id, result, diagnostics)
    }
}
