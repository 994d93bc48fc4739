//! Next/previous link resolution.
//!
//! Sibling order comes from the parent's sub-document listing. A document is
//! only placed among its siblings when the parent exists and has exactly one
//! listing; any other shape leaves both links absent.
//!
//! The root index gets special treatment: the root index and the root's
//! single section link forward into the first chapter of that section
//! rather than to their listed sibling.

use serde::Serialize;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::meta::{MetaEntry, MetaStore};

/// Default id of the root index document.
pub const DEFAULT_ROOT_ID: &str = "index";

/// Link to a neighbouring document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavLink {
    /// Target document title.
    pub title: String,
    /// Target document url.
    pub link: String,
}

impl NavLink {
    fn from_entry(entry: &MetaEntry) -> Self {
        Self {
            title: entry.title.clone(),
            link: entry.url.clone(),
        }
    }
}

/// Resolved neighbours of a document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Navigation {
    /// Following document.
    pub next: Option<NavLink>,
    /// Preceding document, or the parent for the first child.
    pub prev: Option<NavLink>,
}

/// Error resolving navigation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NavigationError {
    /// The document itself has no entry in the store.
    #[error("Could not find MetaEntry for file \"{0}\"")]
    MissingDocument(String),
}

/// A document's place in its parent's listing.
struct Location<'a> {
    parent: &'a MetaEntry,
    listing: &'a [String],
    position: usize,
}

/// Computes next/prev links from the metadata store.
///
/// Holds only shared borrows, so one resolver may serve many documents and
/// threads. Broken references are reported to the [`Diagnostics`] passed to
/// each call.
#[derive(Clone, Copy, Debug)]
pub struct NavigationResolver<'a> {
    store: &'a MetaStore,
    root_id: &'a str,
}

impl<'a> NavigationResolver<'a> {
    /// Create a resolver using [`DEFAULT_ROOT_ID`] as the root index.
    #[must_use]
    pub fn new(store: &'a MetaStore) -> Self {
        Self {
            store,
            root_id: DEFAULT_ROOT_ID,
        }
    }

    /// Use a different root index id.
    #[must_use]
    pub fn with_root_id(mut self, root_id: &'a str) -> Self {
        self.root_id = root_id;
        self
    }

    /// Resolve the following document.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::MissingDocument`] if `id` has no entry.
    pub fn resolve_next(
        &self,
        id: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<NavLink>, NavigationError> {
        let entry = self.entry(id)?;
        if let Some(next) = self.root_first_chapter(entry, diagnostics) {
            return Ok(next);
        }
        let location = self.locate(entry, diagnostics);
        Ok(self.next_in_listing(entry, location.as_ref(), diagnostics))
    }

    /// Resolve the preceding document.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::MissingDocument`] if `id` has no entry.
    pub fn resolve_prev(
        &self,
        id: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<NavLink>, NavigationError> {
        let entry = self.entry(id)?;
        let location = self.locate(entry, diagnostics);
        Ok(self.prev_in_listing(entry, location.as_ref(), diagnostics))
    }

    /// Resolve both neighbours, locating the document only once.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::MissingDocument`] if `id` has no entry.
    pub fn resolve(
        &self,
        id: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Navigation, NavigationError> {
        let entry = self.entry(id)?;
        let location = self.locate(entry, diagnostics);

        let next = match self.root_first_chapter(entry, diagnostics) {
            Some(next) => next,
            None => self.next_in_listing(entry, location.as_ref(), diagnostics),
        };
        let prev = self.prev_in_listing(entry, location.as_ref(), diagnostics);

        Ok(Navigation { next, prev })
    }

    fn entry(&self, id: &str) -> Result<&'a MetaEntry, NavigationError> {
        self.store
            .get(id)
            .ok_or_else(|| NavigationError::MissingDocument(id.to_owned()))
    }

    fn locate(&self, entry: &MetaEntry, diagnostics: &mut Diagnostics) -> Option<Location<'a>> {
        let parent_id = entry.parent_id()?;

        let Some(parent) = self.store.get(parent_id) else {
            diagnostics.note(
                &entry.id,
                DiagnosticKind::MissingParent {
                    parent: parent_id.to_owned(),
                },
            );
            return None;
        };

        // Zero or several listings: sibling order is undefined.
        let listing = parent.single_listing()?;

        let Some(position) = listing.iter().position(|id| *id == entry.id) else {
            diagnostics.note(
                &entry.id,
                DiagnosticKind::NotListed {
                    parent: parent_id.to_owned(),
                },
            );
            return None;
        };

        Some(Location {
            parent,
            listing,
            position,
        })
    }

    /// First chapter link for the root index and its single section.
    ///
    /// Returns `None` when the rule does not apply, `Some(None)` when it
    /// applies but the first chapter is missing.
    fn root_first_chapter(
        &self,
        entry: &MetaEntry,
        diagnostics: &mut Diagnostics,
    ) -> Option<Option<NavLink>> {
        let is_root = entry.id == self.root_id;
        if !is_root && entry.parent_id() != Some(self.root_id) {
            return None;
        }

        let root = self.store.get(self.root_id)?;
        let [section_id] = root.single_listing()? else {
            return None;
        };
        // Children of the root that it does not list keep sibling lookup.
        if !is_root && entry.id != *section_id {
            return None;
        }

        let Some(section) = self.store.get(section_id) else {
            diagnostics.note(
                &entry.id,
                DiagnosticKind::MissingReference {
                    target: section_id.clone(),
                },
            );
            return None;
        };
        let first_chapter = section.single_listing()?.first()?;

        Some(self.link_to(&entry.id, first_chapter, diagnostics))
    }

    fn next_in_listing(
        &self,
        entry: &MetaEntry,
        location: Option<&Location<'_>>,
        diagnostics: &mut Diagnostics,
    ) -> Option<NavLink> {
        let location = location?;
        let next_id = location.listing.get(location.position + 1)?;
        self.link_to(&entry.id, next_id, diagnostics)
    }

    fn prev_in_listing(
        &self,
        entry: &MetaEntry,
        location: Option<&Location<'_>>,
        diagnostics: &mut Diagnostics,
    ) -> Option<NavLink> {
        let location = location?;
        match location.position.checked_sub(1) {
            Some(prev) => self.link_to(&entry.id, &location.listing[prev], diagnostics),
            None => Some(NavLink::from_entry(location.parent)),
        }
    }

    fn link_to(
        &self,
        document: &str,
        target: &str,
        diagnostics: &mut Diagnostics,
    ) -> Option<NavLink> {
        let Some(entry) = self.store.get(target) else {
            diagnostics.note(
                document,
                DiagnosticKind::MissingReference {
                    target: target.to_owned(),
                },
            );
            return None;
        };
        Some(NavLink::from_entry(entry))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn link(title: &str, url: &str) -> Option<NavLink> {
        Some(NavLink {
            title: title.to_owned(),
            link: url.to_owned(),
        })
    }

    fn entry(id: &str) -> MetaEntry {
        MetaEntry::new(id, id.to_uppercase(), format!("{id}.html"))
    }

    /// `index -> intro -> [ch1, ch2]`
    fn book_store_entries() -> Vec<MetaEntry> {
        vec![
            entry("index").with_listing(["intro"]),
            entry("intro")
                .with_parent("index")
                .with_listing(["ch1", "ch2"]),
            entry("ch1").with_parent("intro"),
            entry("ch2").with_parent("intro"),
        ]
    }

    fn book_store() -> MetaStore {
        MetaStore::from_entries(book_store_entries()).unwrap()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let store = book_store();
        let resolver = NavigationResolver::new(&store);
        let mut diagnostics = Diagnostics::new();

        assert_eq!(
            resolver.resolve_prev("ch1", &mut diagnostics).unwrap(),
            link("INTRO", "intro.html")
        );
        assert_eq!(
            resolver.resolve_next("ch1", &mut diagnostics).unwrap(),
            link("CH2", "ch2.html")
        );
        assert_eq!(resolver.resolve_next("ch2", &mut diagnostics).unwrap(), None);
        assert_eq!(
            resolver.resolve_prev("intro", &mut diagnostics).unwrap(),
            link("INDEX", "index.html")
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_root_index_links_to_first_chapter() {
        let store = book_store();
        let resolver = NavigationResolver::new(&store);
        let mut diagnostics = Diagnostics::new();

        assert_eq!(
            resolver.resolve_next("index", &mut diagnostics).unwrap(),
            link("CH1", "ch1.html")
        );
        assert_eq!(
            resolver.resolve_next("intro", &mut diagnostics).unwrap(),
            link("CH1", "ch1.html")
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_root_without_parent_has_no_prev() {
        let store = book_store();
        let resolver = NavigationResolver::new(&store);
        let mut diagnostics = Diagnostics::new();

        assert_eq!(resolver.resolve_prev("index", &mut diagnostics).unwrap(), None);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_positions_in_listing() {
        let ids = ["a", "b", "c", "d"];
        let mut entries = vec![entry("guide").with_listing(ids)];
        entries.extend(ids.iter().map(|id| entry(id).with_parent("guide")));
        let store = MetaStore::from_entries(entries).unwrap();
        let resolver = NavigationResolver::new(&store);
        let mut diagnostics = Diagnostics::new();

        for (p, id) in ids.iter().enumerate() {
            let nav = resolver.resolve(id, &mut diagnostics).unwrap();

            let expected_next = ids
                .get(p + 1)
                .and_then(|next| link(&next.to_uppercase(), &format!("{next}.html")));
            let expected_prev = match p {
                0 => link("GUIDE", "guide.html"),
                _ => link(&ids[p - 1].to_uppercase(), &format!("{}.html", ids[p - 1])),
            };
            assert_eq!(nav.next, expected_next, "next of {id}");
            assert_eq!(nav.prev, expected_prev, "prev of {id}");
        }
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_missing_neighbour_is_diagnostic() {
        let store = MetaStore::from_entries([
            entry("guide").with_listing(["a", "ghost", "b"]),
            entry("a").with_parent("guide"),
            entry("b").with_parent("guide"),
        ])
        .unwrap();
        let resolver = NavigationResolver::new(&store);
        let mut diagnostics = Diagnostics::new();

        let next = resolver.resolve_next("a", &mut diagnostics).unwrap();

        assert_eq!(next, None);
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.document, "a");
        assert_eq!(
            diagnostic.kind,
            DiagnosticKind::MissingReference {
                target: "ghost".to_owned()
            }
        );
    }

    #[test]
    fn test_missing_parent_is_diagnostic() {
        let store = MetaStore::from_entries([entry("orphan").with_parent("gone")]).unwrap();
        let resolver = NavigationResolver::new(&store);
        let mut diagnostics = Diagnostics::new();

        let nav = resolver.resolve("orphan", &mut diagnostics).unwrap();

        assert_eq!(nav, Navigation::default());
        assert_eq!(
            diagnostics.into_vec()[0].kind,
            DiagnosticKind::MissingParent {
                parent: "gone".to_owned()
            }
        );
    }

    #[test]
    fn test_unlisted_child_is_diagnostic() {
        let store = MetaStore::from_entries([
            entry("guide").with_listing(["a"]),
            entry("a").with_parent("guide"),
            entry("stray").with_parent("guide"),
        ])
        .unwrap();
        let resolver = NavigationResolver::new(&store);
        let mut diagnostics = Diagnostics::new();

        let nav = resolver.resolve("stray", &mut diagnostics).unwrap();

        assert_eq!(nav, Navigation::default());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_ambiguous_listings_are_silent() {
        let store = MetaStore::from_entries([
            entry("guide").with_listing(["a"]).with_listing(["b"]),
            entry("a").with_parent("guide"),
            entry("b").with_parent("guide"),
            entry("empty"),
            entry("c").with_parent("empty"),
        ])
        .unwrap();
        let resolver = NavigationResolver::new(&store);
        let mut diagnostics = Diagnostics::new();

        assert_eq!(
            resolver.resolve("a", &mut diagnostics).unwrap(),
            Navigation::default()
        );
        assert_eq!(
            resolver.resolve("c", &mut diagnostics).unwrap(),
            Navigation::default()
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_missing_first_chapter_is_diagnostic() {
        let store = MetaStore::from_entries([
            entry("index").with_listing(["intro"]),
            entry("intro")
                .with_parent("index")
                .with_listing(["ghost", "ch2"]),
            entry("ch2").with_parent("intro"),
        ])
        .unwrap();
        let resolver = NavigationResolver::new(&store);
        let mut diagnostics = Diagnostics::new();

        let next = resolver.resolve_next("index", &mut diagnostics).unwrap();

        assert_eq!(next, None);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_root_rule_falls_back_to_siblings() {
        // Root lists two sections, so the first-chapter rule does not apply.
        let store = MetaStore::from_entries([
            entry("index").with_listing(["intro", "usage"]),
            entry("intro").with_parent("index").with_listing(["ch1"]),
            entry("usage").with_parent("index"),
            entry("ch1").with_parent("intro"),
        ])
        .unwrap();
        let resolver = NavigationResolver::new(&store);
        let mut diagnostics = Diagnostics::new();

        assert_eq!(
            resolver.resolve_next("intro", &mut diagnostics).unwrap(),
            link("USAGE", "usage.html")
        );
        assert_eq!(resolver.resolve_next("index", &mut diagnostics).unwrap(), None);
    }

    #[test]
    fn test_missing_root_section_is_diagnostic() {
        let store = MetaStore::from_entries([entry("index").with_listing(["ghost"])]).unwrap();
        let resolver = NavigationResolver::new(&store);
        let mut diagnostics = Diagnostics::new();

        let nav = resolver.resolve("index", &mut diagnostics).unwrap();

        assert_eq!(nav, Navigation::default());
        let diagnostics = diagnostics.into_vec();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].document, "index");
        assert_eq!(
            diagnostics[0].kind,
            DiagnosticKind::MissingReference {
                target: "ghost".to_owned()
            }
        );
    }

    #[test]
    fn test_unlisted_child_of_root_skips_first_chapter() {
        let mut entries = book_store_entries();
        entries.push(entry("stray").with_parent("index"));
        let store = MetaStore::from_entries(entries).unwrap();
        let resolver = NavigationResolver::new(&store);
        let mut diagnostics = Diagnostics::new();

        let nav = resolver.resolve("stray", &mut diagnostics).unwrap();

        assert_eq!(nav, Navigation::default());
        assert_eq!(
            diagnostics.into_vec()[0].kind,
            DiagnosticKind::NotListed {
                parent: "index".to_owned()
            }
        );
    }

    #[test]
    fn test_custom_root_id() {
        let store = MetaStore::from_entries([
            entry("home").with_listing(["intro"]),
            entry("intro").with_parent("home").with_listing(["ch1"]),
            entry("ch1").with_parent("intro"),
        ])
        .unwrap();
        let mut diagnostics = Diagnostics::new();

        let default_root = NavigationResolver::new(&store);
        assert_eq!(
            default_root.resolve_next("home", &mut diagnostics).unwrap(),
            None
        );

        let custom_root = NavigationResolver::new(&store).with_root_id("home");
        assert_eq!(
            custom_root.resolve_next("home", &mut diagnostics).unwrap(),
            link("CH1", "ch1.html")
        );
    }

    #[test]
    fn test_missing_document_is_error() {
        let store = book_store();
        let resolver = NavigationResolver::new(&store);
        let mut diagnostics = Diagnostics::new();

        let err = resolver.resolve("nope", &mut diagnostics).unwrap_err();

        assert_eq!(err, NavigationError::MissingDocument("nope".to_owned()));
        assert_eq!(
            err.to_string(),
            "Could not find MetaEntry for file \"nope\""
        );
    }
}
