//! Metadata store for parsed documents.
//!
//! Provides the read-only index of documents produced by the parsing stage.
//! This is the pure data representation of the document hierarchy; it holds
//! no rendered content and is never mutated once built.
//!
//! # Architecture
//!
//! Entries are stored in a flat `Vec<MetaEntry>` in the order the parsing
//! stage emitted them, with an id index on the side. Parent/child
//! relationships are expressed by document ids (`parent`, `sub_listings`)
//! and resolved through the index, never through live references. This
//! provides:
//! - O(1) id lookups via `id_index` `HashMap`
//! - Stable iteration order for batch processing
//! - Cheap sharing across worker threads (`MetaStore` is `Sync`)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One heading of a document, with its nested sub-headings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading text as written by the author.
    pub text: String,
    /// Nested headings in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Heading>,
}

impl Heading {
    /// Create a heading without sub-headings.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Add a nested heading.
    #[must_use]
    pub fn with_child(mut self, child: Heading) -> Self {
        self.children.push(child);
        self
    }
}

/// Parsed document metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaEntry {
    /// Unique document identifier derived from the source path
    /// (e.g., "index", "book/installation").
    pub id: String,
    /// Display title.
    pub title: String,
    /// Output-relative link target (e.g., "book/installation.html").
    pub url: String,
    /// Id of the document whose listing includes this one.
    #[serde(default)]
    pub parent: Option<String>,
    /// Ordered sub-document listings, each an ordered sequence of ids.
    #[serde(default, rename = "tocs")]
    pub sub_listings: Vec<Vec<String>>,
    /// Heading tree. The first root heading is the page title.
    #[serde(default, rename = "titles")]
    pub headings: Vec<Heading>,
}

impl MetaEntry {
    /// Create an entry without parent, listings or headings.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            parent: None,
            sub_listings: Vec::new(),
            headings: Vec::new(),
        }
    }

    /// Set the parent document id.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Append a sub-document listing.
    #[must_use]
    pub fn with_listing<I, S>(mut self, listing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sub_listings
            .push(listing.into_iter().map(Into::into).collect());
        self
    }

    /// Append a root heading.
    #[must_use]
    pub fn with_heading(mut self, heading: Heading) -> Self {
        self.headings.push(heading);
        self
    }

    /// Parent document id, if any.
    ///
    /// An empty parent is the parsing stage's root marker and counts as
    /// no parent.
    #[must_use]
    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_deref().filter(|parent| !parent.is_empty())
    }

    /// The single sub-document listing, if the document has exactly one.
    ///
    /// Sibling order is undefined for documents with zero or several
    /// listings.
    #[must_use]
    pub fn single_listing(&self) -> Option<&[String]> {
        match self.sub_listings.as_slice() {
            [listing] => Some(listing),
            _ => None,
        }
    }
}

/// Error building a [`MetaStore`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// Two entries share the same id.
    #[error("Duplicate document id \"{0}\"")]
    DuplicateId(String),
}

/// Read-only index of parsed documents.
///
/// Pure data structure storing entries in a flat list with an id index.
/// Built once with [`MetaStoreBuilder`] (or [`MetaStore::from_entries`]) and
/// shared immutably afterwards.
#[derive(Debug, Default)]
pub struct MetaStore {
    entries: Vec<MetaEntry>,
    id_index: HashMap<String, usize>,
}

impl MetaStore {
    /// Build a store from entries in parsing order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if two entries share an id.
    pub fn from_entries(entries: impl IntoIterator<Item = MetaEntry>) -> Result<Self, StoreError> {
        let mut builder = MetaStoreBuilder::new();
        for entry in entries {
            builder.add_entry(entry)?;
        }
        Ok(builder.build())
    }

    /// Get entry by document id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&MetaEntry> {
        self.id_index.get(id).map(|&i| &self.entries[i])
    }

    /// Document ids in parsing order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.id.as_str())
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the store holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for constructing [`MetaStore`] instances.
#[derive(Debug, Default)]
pub struct MetaStoreBuilder {
    entries: Vec<MetaEntry>,
    id_index: HashMap<String, usize>,
}

impl MetaStoreBuilder {
    /// Create a new store builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry to the store.
    ///
    /// # Returns
    ///
    /// Index of the added entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if the id is already present.
    pub fn add_entry(&mut self, entry: MetaEntry) -> Result<usize, StoreError> {
        if self.id_index.contains_key(&entry.id) {
            return Err(StoreError::DuplicateId(entry.id));
        }

        let idx = self.entries.len();
        self.id_index.insert(entry.id.clone(), idx);
        self.entries.push(entry);
        Ok(idx)
    }

    /// Build the [`MetaStore`] instance.
    #[must_use]
    pub fn build(self) -> MetaStore {
        MetaStore {
            entries: self.entries,
            id_index: self.id_index,
        }
    }
}
