//! HTML content helpers for the crawler and harvester
//!
//! Parsing happens in synchronous helpers that return owned data, so no
//! parsed document is ever held across an await point.

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

/// Extract the visible text of a page with inter-element whitespace
/// collapsed to single spaces.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::new();

    for text in document.root_element().text() {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        // Collapse runs of internal whitespace as well
        let mut words = trimmed.split_whitespace();
        if let Some(first) = words.next() {
            out.push_str(first);
            for word in words {
                out.push(' ');
                out.push_str(word);
            }
        }
    }

    out
}

/// Collect every anchor href on a page, resolved to an absolute URL
/// against the page's own URL, in document order.
///
/// Unresolvable hrefs are dropped; only http(s) links are returned, so
/// `mailto:` and friends never enter the traversal frontier.
pub fn page_links(base: &Url, html: &str) -> Vec<Url> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href]").expect("static selector");

    let mut links = Vec::new();
    for element in document.select(&anchors) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        match base.join(href) {
            Ok(resolved) if matches!(resolved.scheme(), "http" | "https") => links.push(resolved),
            Ok(_) => {}
            Err(e) => debug!("Ignoring unresolvable href {:?}: {}", href, e),
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_text_collapses_whitespace() {
        let html = "<html><body><h1>Student   Services</h1>\n\n<p>We offer\ttutoring\nand counseling.</p></body></html>";
        assert_eq!(
            visible_text(html),
            "Student Services We offer tutoring and counseling."
        );
    }

    #[test]
    fn test_page_links_resolves_relative_hrefs_in_document_order() {
        let base = Url::parse("https://example.com/services/").unwrap();
        let html = r#"<a href="tutoring">t</a><a href="/aid">a</a><a href="https://other.org/x">x</a>"#;

        let links: Vec<String> = page_links(&base, html)
            .into_iter()
            .map(|u| u.to_string())
            .collect();
        assert_eq!(
            links,
            vec![
                "https://example.com/services/tutoring",
                "https://example.com/aid",
                "https://other.org/x",
            ]
        );
    }

    #[test]
    fn test_page_links_skips_mailto() {
        let base = Url::parse("https://example.com/").unwrap();
        let html = r#"<a href="mailto:aid@example.com">mail</a><a href="/contact">c</a>"#;

        let links = page_links(&base, html);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].path(), "/contact");
    }
}
