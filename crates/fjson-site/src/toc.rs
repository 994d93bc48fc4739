//! Table of contents synthesis.
//!
//! Converts a document's heading tree into a nested tree of [`TocNode`]s,
//! each linking to the heading's anchor on the document's page.

use serde::Serialize;

use crate::meta::{Heading, MetaEntry};
use crate::slug::slugify;

/// Table of contents node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TocNode {
    /// Link to the heading (`{page url}#{fragment}`).
    pub url: String,
    /// Page identifier (page url without `.html`).
    pub page: String,
    /// Heading anchor.
    pub fragment: String,
    /// Heading text.
    pub title: String,
    /// Nested headings.
    pub children: Vec<TocNode>,
}

/// Page identifier for a page url: everything before the last `.html`.
///
/// The cut happens at the last occurrence anywhere in the url, so
/// `"a.html/b"` yields `"a"`. Urls without `.html` are returned unchanged.
///
/// # Examples
///
/// ```
/// use fjson_site::page_name;
///
/// assert_eq!(page_name("book/routing.html"), "book/routing");
/// assert_eq!(page_name("book/routing/"), "book/routing/");
/// ```
#[must_use]
pub fn page_name(url: &str) -> &str {
    url.rsplit_once(".html").map_or(url, |(page, _)| page)
}

/// Build the TOC tree for a heading subtree of a document.
///
/// Returns an empty tree for an absent subtree. Headings keep their
/// document order; nothing is sorted or deduplicated.
#[must_use]
pub fn build_toc(entry: &MetaEntry, headings: Option<&[Heading]>) -> Vec<TocNode> {
    let Some(headings) = headings else {
        return Vec::new();
    };

    let page = page_name(&entry.url);

    headings
        .iter()
        .map(|heading| {
            let fragment = slugify(&heading.text);
            TocNode {
                url: format!("{}#{fragment}", entry.url),
                page: page.to_owned(),
                title: heading.text.clone(),
                children: build_toc(entry, Some(heading.children.as_slice())),
                fragment,
            }
        })
        .collect()
}

/// Build the TOC of a whole document.
///
/// The first root heading is the page title, so the TOC lists its
/// sub-headings. Documents without headings have an empty TOC.
#[must_use]
pub fn document_toc(entry: &MetaEntry) -> Vec<TocNode> {
    build_toc(
        entry,
        entry
            .headings
            .first()
            .map(|title| title.children.as_slice()),
    )
}
