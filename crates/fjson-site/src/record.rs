//! Per-document output record.

use serde::{Serialize, Serializer};

use crate::navigation::NavLink;
use crate::toc::TocNode;

/// Serialized view of a document consumed by downstream theming.
///
/// Serializes with an extra `rellinks` key holding `[next, prev]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputRecord {
    /// Document title.
    pub title: String,
    /// Id of the document the record was built for.
    pub current_page_name: String,
    /// Table of contents below the page title.
    pub toc: Vec<TocNode>,
    /// Following document.
    pub next: Option<NavLink>,
    /// Preceding document.
    pub prev: Option<NavLink>,
    /// Inner HTML of the rendered page body.
    pub body: String,
}

impl OutputRecord {
    /// Related links in `[next, prev]` order.
    #[must_use]
    pub fn rellinks(&self) -> [Option<&NavLink>; 2] {
        [self.next.as_ref(), self.prev.as_ref()]
    }
}

/// Borrowed view used for serialization.
#[derive(Serialize)]
struct OutputRecordRef<'a> {
    title: &'a str,
    current_page_name: &'a str,
    toc: &'a [TocNode],
    next: Option<&'a NavLink>,
    prev: Option<&'a NavLink>,
    rellinks: [Option<&'a NavLink>; 2],
    body: &'a str,
}

impl Serialize for OutputRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        OutputRecordRef {
            title: &self.title,
            current_page_name: &self.current_page_name,
            toc: &self.toc,
            next: self.next.as_ref(),
            prev: self.prev.as_ref(),
            rellinks: self.rellinks(),
            body: &self.body,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn record() -> OutputRecord {
        OutputRecord {
            title: "Routing".to_owned(),
            current_page_name: "book/routing".to_owned(),
            toc: Vec::new(),
            next: Some(NavLink {
                title: "Templating".to_owned(),
                link: "book/templating.html".to_owned(),
            }),
            prev: None,
            body: "<p>Routes</p>".to_owned(),
        }
    }

    #[test]
    fn test_rellinks_order() {
        let record = record();

        let [next, prev] = record.rellinks();

        assert_eq!(next.map(|link| link.title.as_str()), Some("Templating"));
        assert_eq!(prev, None);
    }

    #[test]
    fn test_serialization_shape() {
        let json = serde_json::to_value(record()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "title": "Routing",
                "current_page_name": "book/routing",
                "toc": [],
                "next": {"title": "Templating", "link": "book/templating.html"},
                "prev": null,
                "rellinks": [
                    {"title": "Templating", "link": "book/templating.html"},
                    null
                ],
                "body": "<p>Routes</p>"
            })
        );
    }

    #[test]
    fn test_serialization_key_order() {
        let json = serde_json::to_string(&record()).unwrap();

        let keys: Vec<_> = [
            "\"title\"",
            "\"current_page_name\"",
            "\"toc\"",
            "\"next\"",
            "\"prev\"",
            "\"rellinks\"",
            "\"body\"",
        ]
        .iter()
        .map(|key| json.find(key).unwrap())
        .collect();

        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
