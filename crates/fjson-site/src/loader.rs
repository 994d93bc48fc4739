//! Metadata store loading.
//!
//! The parsing stage dumps its metadata index as a JSON array of entries:
//!
//! ```json
//! [
//!     {"id": "index", "title": "Home", "url": "index.html", "parent": null,
//!      "tocs": [["book/index"]], "titles": [{"text": "Home"}]},
//!     {"id": "book/index", "title": "The Book", "url": "book/index.html",
//!      "parent": "index", "tocs": [["book/installation"]]}
//! ]
//! ```
//!
//! `parent`, `tocs` and `titles` are optional.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::meta::{MetaEntry, MetaStore, StoreError};

/// Error loading a metadata store dump.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Dump file cannot be read.
    #[error("Failed to read metadata store {}: {source}", path.display())]
    Io {
        /// Dump file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Dump is not valid JSON or does not match the entry shape.
    #[error("Invalid metadata store: {0}")]
    Parse(#[from] serde_json::Error),
    /// Dump violates a store invariant.
    #[error("Invalid metadata store: {0}")]
    Store(#[from] StoreError),
}

impl MetaStore {
    /// Parse a store from its JSON dump.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] for malformed JSON and
    /// [`LoadError::Store`] for duplicate ids.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let entries: Vec<MetaEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries)?)
    }

    /// Load a store from a JSON dump file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be read, otherwise as
    /// [`MetaStore::from_json`].
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let start = Instant::now();
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_json(&content)?;

        tracing::info!(
            path = %path.display(),
            documents = store.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Metadata store loaded"
        );

        Ok(store)
    }
}
