//! Rendered page body extraction.

use scraper::{Html, Selector};

/// Inner HTML of a rendered page's `<body>` element.
///
/// Pages are parsed as full HTML5 documents, so bare fragments land in the
/// implicit body and come back unchanged.
#[must_use]
pub fn extract_body(html: &str) -> String {
    let document = Html::parse_document(html);

    if let Ok(body_selector) = Selector::parse("body")
        && let Some(body) = document.select(&body_selector).next()
    {
        return body.inner_html();
    }

    String::new()
}
