//! Navigation and table-of-contents synthesis for fjson.
//!
//! This crate turns the metadata store produced by the parsing stage into
//! one serialized record per document:
//! - [`MetaStore`]: read-only index of parsed documents
//! - [`build_toc`]: heading tree to linked table of contents
//! - [`NavigationResolver`]: next/prev links from parent listings
//! - [`RecordAssembler`]: record assembly, single or batch
//! - [`RecordWriter`]: `.fjson` output files
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use std::sync::Arc;
//! use fjson_site::{MetaStore, NullProgress, RecordAssembler, RecordWriter};
//! use fjson_storage::FsPageSource;
//!
//! let store = Arc::new(MetaStore::load(Path::new("_build/metas.json"))?);
//! let pages = Arc::new(FsPageSource::new("_build/html".into()));
//!
//! let report = RecordAssembler::new(store, pages).assemble_all(&NullProgress);
//! RecordWriter::new("_build/json").write_all(&report.records)?;
//! # Ok(())
//! # }
//! ```

mod assembler;
mod body;
mod diagnostics;
mod loader;
mod meta;
mod navigation;
mod record;
mod slug;
mod toc;
mod writer;

pub use assembler::{
    AssembleError, AssembledRecord, BuildReport, DocumentFailure, NullProgress, Progress,
    RecordAssembler,
};
pub use body::extract_body;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use loader::LoadError;
pub use meta::{Heading, MetaEntry, MetaStore, MetaStoreBuilder, StoreError};
pub use navigation::{DEFAULT_ROOT_ID, NavLink, Navigation, NavigationError, NavigationResolver};
pub use record::OutputRecord;
pub use slug::slugify;
pub use toc::{TocNode, build_toc, document_toc, page_name};
pub use writer::{RECORD_EXTENSION, RecordWriter, WriteError};
