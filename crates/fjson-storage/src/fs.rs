//! Filesystem page source.
//!
//! Provides [`FsPageSource`] for reading rendered pages from the build
//! output directory.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::storage::{PageSource, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem page source.
///
/// Maps a document id to `{html_dir}/{id}.html`, e.g. the id
/// `"book/installation"` to `_build/html/book/installation.html`.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use fjson_storage::{FsPageSource, PageSource};
///
/// let pages = FsPageSource::new(PathBuf::from("_build/html"));
/// let html = pages.read("index")?;
/// ```
#[derive(Debug, Clone)]
pub struct FsPageSource {
    /// Root directory of the rendered pages.
    html_dir: PathBuf,
}

impl FsPageSource {
    /// Create a page source reading `.html` files.
    ///
    /// # Arguments
    ///
    /// * `html_dir` - Root directory containing the rendered pages
    #[must_use]
    pub fn new(html_dir: PathBuf) -> Self {
        Self { html_dir }
    }

    /// Resolve a document id to the rendered page path.
    ///
    /// Rejects ids that are absolute or contain parent directory components
    /// (`..`) so a malformed store cannot read outside the page directory.
    fn page_path(&self, id: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(id);
        let escapes = id.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));

        if escapes {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(relative)
                .with_backend(BACKEND));
        }

        Ok(self.html_dir.join(format!("{id}.html")))
    }
}

impl PageSource for FsPageSource {
    fn read(&self, id: &str) -> Result<String, StorageError> {
        let full_path = self.page_path(id)?;
        tracing::trace!(id, path = %full_path.display(), "Reading rendered page");
        fs::read_to_string(&full_path)
            .map_err(|e| StorageError::io(e, Some(full_path.clone())).with_backend(BACKEND))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_page(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_read_top_level_page() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_page(temp_dir.path(), "index.html", "<html><body>Home</body></html>");
        let pages = FsPageSource::new(temp_dir.path().to_path_buf());

        let html = pages.read("index").unwrap();

        assert_eq!(html, "<html><body>Home</body></html>");
    }

    #[test]
    fn test_read_nested_page() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_page(temp_dir.path(), "book/installation.html", "<p>Install</p>");
        let pages = FsPageSource::new(temp_dir.path().to_path_buf());

        assert_eq!(pages.read("book/installation").unwrap(), "<p>Install</p>");
    }

    #[test]
    fn test_read_missing_page() {
        let temp_dir = tempfile::tempdir().unwrap();
        let pages = FsPageSource::new(temp_dir.path().to_path_buf());

        let err = pages.read("missing").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, Some("Fs"));
        assert_eq!(err.path, Some(temp_dir.path().join("missing.html")));
    }

    #[test]
    fn test_read_rejects_parent_traversal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let pages = FsPageSource::new(temp_dir.path().join("html"));

        let err = pages.read("../secret").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::InvalidPath);
    }

    #[test]
    fn test_read_rejects_absolute_and_empty_ids() {
        let pages = FsPageSource::new(PathBuf::from("html"));

        assert_eq!(
            pages.read("/etc/passwd").unwrap_err().kind,
            StorageErrorKind::InvalidPath
        );
        assert_eq!(pages.read("").unwrap_err().kind, StorageErrorKind::InvalidPath);
    }
}
