//! Rendered page source abstraction for fjson.
//!
//! The parsing stage renders every document to a full HTML page before
//! navigation synthesis runs. This crate provides a [`PageSource`] trait for
//! reading those pages by document identifier, decoupling record assembly
//! from the underlying storage backend. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Backend flexibility** (build directory, archive, remote bucket)
//!
//! # Architecture
//!
//! The crate provides:
//! - [`PageSource`] trait with a `read()` method
//! - [`FsPageSource`] implementation reading `{html_dir}/{id}.html`
//! - [`MockPageSource`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use fjson_storage::{FsPageSource, PageSource};
//!
//! let pages = FsPageSource::new(PathBuf::from("_build/html"));
//! let html = pages.read("book/installation")?;
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsPageSource;
#[cfg(feature = "mock")]
pub use mock::MockPageSource;
pub use storage::{PageSource, StorageError, StorageErrorKind};
