//! Output record persistence.
//!
//! Each record is written to `{output_dir}/{id}.fjson`, creating intermediate
//! directories for nested ids. Pretty output uses a four-space indent.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::assembler::AssembledRecord;
use crate::record::OutputRecord;

/// Output file extension.
pub const RECORD_EXTENSION: &str = "fjson";

/// Error writing an output record.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// Document id cannot be mapped to a path inside the output directory.
    #[error("Invalid document id \"{0}\"")]
    InvalidId(String),
    /// Output file or directory cannot be written.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Record cannot be serialized.
    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Writes output records as `.fjson` files.
#[derive(Clone, Debug)]
pub struct RecordWriter {
    output_dir: PathBuf,
    pretty: bool,
}

impl RecordWriter {
    /// Create a writer emitting pretty-printed JSON into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            pretty: true,
        }
    }

    /// Choose between pretty-printed and compact JSON.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Output directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Output path of a document.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::InvalidId`] for empty or absolute ids and for ids
    /// containing `..` segments.
    pub fn record_path(&self, id: &str) -> Result<PathBuf, WriteError> {
        let relative = Path::new(id);
        let is_safe = !id.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !is_safe {
            return Err(WriteError::InvalidId(id.to_owned()));
        }
        Ok(self.output_dir.join(format!("{id}.{RECORD_EXTENSION}")))
    }

    /// Serialize a record to JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Serialize`] if serialization fails.
    pub fn to_json(&self, record: &OutputRecord) -> Result<Vec<u8>, WriteError> {
        let mut buf = Vec::new();
        if self.pretty {
            let formatter = PrettyFormatter::with_indent(b"    ");
            let mut serializer = Serializer::with_formatter(&mut buf, formatter);
            record.serialize(&mut serializer)?;
        } else {
            serde_json::to_writer(&mut buf, record)?;
        }
        Ok(buf)
    }

    /// Write a single record.
    ///
    /// # Returns
    ///
    /// Path of the written file.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] if the id is invalid or the file cannot be
    /// written.
    pub fn write(&self, id: &str, record: &OutputRecord) -> Result<PathBuf, WriteError> {
        let path = self.record_path(id)?;
        let json = self.to_json(record)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| WriteError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, json).map_err(|source| WriteError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(id, path = %path.display(), "Record written");
        Ok(path)
    }

    /// Write all records, stopping at the first error.
    ///
    /// # Returns
    ///
    /// Number of written files.
    ///
    /// # Errors
    ///
    /// Returns the first [`WriteError`] encountered.
    pub fn write_all<'r>(
        &self,
        records: impl IntoIterator<Item = &'r AssembledRecord>,
    ) -> Result<usize, WriteError> {
        let start = Instant::now();
        let mut written = 0;

        for assembled in records {
            self.write(&assembled.id, &assembled.record)?;
            written += 1;
        }

        tracing::info!(
            output_dir = %self.output_dir.display(),
            records = written,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Records written"
        );

        Ok(written)
    }
}
