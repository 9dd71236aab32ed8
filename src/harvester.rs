//! Content harvesting
//!
//! Builds the combined text corpus for extraction: each matched page is
//! re-fetched (the crawler does not cache page bodies) and its visible
//! text appended in crawl-match order, pages separated by a blank line.

use tracing::{info, instrument, warn};

use crate::crawler::{KeywordMatch, visible_text};
use crate::fetch::Fetch;

/// Separator between pages in the combined corpus
const PAGE_SEPARATOR: &str = "\n\n";

/// Harvest the matched pages into one combined corpus.
///
/// Individual fetch failures are logged and skipped; the harvest always
/// runs to the end of the match list.
#[instrument(skip(fetcher, matches))]
pub async fn harvest<F: Fetch + ?Sized>(fetcher: &F, matches: &[KeywordMatch]) -> String {
    let mut corpus = String::new();
    let mut harvested = 0usize;

    for entry in matches {
        let Some(body) = fetcher.fetch_page(&entry.url).await else {
            warn!("Skipping {}: fetch failed during harvest", entry.url);
            continue;
        };

        corpus.push_str(&visible_text(&body));
        corpus.push_str(PAGE_SEPARATOR);
        harvested += 1;
    }

    info!("Harvested {} of {} matched pages", harvested, matches.len());
    corpus
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FakeFetcher {
        pages: HashMap<String, String>,
    }

    #[async_trait]
    impl Fetch for FakeFetcher {
        async fn fetch_page(&self, url: &str) -> Option<String> {
            self.pages.get(url).cloned()
        }

        async fn is_reachable(&self, url: &str) -> bool {
            self.pages.contains_key(url)
        }
    }

    fn matches(urls: &[&str]) -> Vec<KeywordMatch> {
        urls.iter()
            .map(|u| KeywordMatch {
                url: u.to_string(),
                matched_keywords: vec!["aid".to_string()],
            })
            .collect()
    }

    #[tokio::test]
    async fn test_harvest_preserves_match_order() {
        let fetcher = FakeFetcher {
            pages: HashMap::from([
                (
                    "https://example.com/a".to_string(),
                    "<p>First   page</p>".to_string(),
                ),
                (
                    "https://example.com/b".to_string(),
                    "<p>Second page</p>".to_string(),
                ),
            ]),
        };

        let corpus = harvest(
            &fetcher,
            &matches(&["https://example.com/a", "https://example.com/b"]),
        )
        .await;

        assert_eq!(corpus, "First page\n\nSecond page\n\n");
    }

    #[tokio::test]
    async fn test_harvest_skips_failed_fetches() {
        let fetcher = FakeFetcher {
            pages: HashMap::from([(
                "https://example.com/ok".to_string(),
                "<p>Still here</p>".to_string(),
            )]),
        };

        let corpus = harvest(
            &fetcher,
            &matches(&["https://example.com/gone", "https://example.com/ok"]),
        )
        .await;

        assert_eq!(corpus, "Still here\n\n");
    }
}
