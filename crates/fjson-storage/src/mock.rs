//! Mock page source for testing.
//!
//! Provides [`MockPageSource`] for unit testing without filesystem access.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::storage::{PageSource, StorageError, StorageErrorKind};

/// Mock page source for testing.
///
/// Stores rendered pages in memory. Use the builder methods to configure the
/// mock with test data.
///
/// # Example
///
/// ```ignore
/// use fjson_storage::{MockPageSource, PageSource};
///
/// let pages = MockPageSource::new()
///     .with_page("index", "<html><body><h1>Home</h1></body></html>");
///
/// let html = pages.read("index").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockPageSource {
    pages: RwLock<HashMap<String, String>>,
}

impl MockPageSource {
    /// Create a new empty mock page source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rendered page for a document id.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(self, id: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.write().unwrap().insert(id.into(), html.into());
        self
    }

    /// Add a minimal `<html><body>…</body></html>` page wrapping `body`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_body(self, id: impl Into<String>, body: &str) -> Self {
        self.with_page(id, format!("<html><head></head><body>{body}</body></html>"))
    }
}

impl PageSource for MockPageSource {
    fn read(&self, id: &str) -> Result<String, StorageError> {
        self.pages
            .read()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| {
                StorageError::new(StorageErrorKind::NotFound)
                    .with_path(id)
                    .with_backend("Mock")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_page_roundtrip() {
        let pages = MockPageSource::new().with_page("index", "<p>Home</p>");

        assert_eq!(pages.read("index").unwrap(), "<p>Home</p>");
    }

    #[test]
    fn test_with_body_wraps_document() {
        let pages = MockPageSource::new().with_body("setup", "<p>Setup</p>");

        let html = pages.read("setup").unwrap();

        assert!(html.starts_with("<html>"));
        assert!(html.contains("<body><p>Setup</p></body>"));
    }

    #[test]
    fn test_missing_page_not_found() {
        let pages = MockPageSource::new();

        let err = pages.read("missing").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.to_string(), "[Mock] Not found (path: missing)");
    }
}
