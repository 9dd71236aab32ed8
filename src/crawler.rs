//! Website crawler module
//!
//! This module provides the depth-bounded, keyword-filtering crawl at
//! the heart of the pipeline: subdomain expansion to derive seed URLs,
//! the deduplicated same-origin traversal, and incremental persistence
//! of the match list.

mod config;
mod content;
mod error;
mod snapshot;
mod subdomains;
mod traversal;

pub use config::{CrawlerConfig, CrawlerConfigBuilder};
pub use content::{page_links, visible_text};
pub use error::CrawlError;
pub use snapshot::SnapshotWriter;
pub use subdomains::expand_subdomains;
pub use traversal::{Traversal, crawl_seeds};

use serde::{Deserialize, Serialize};

/// A page whose text matched at least one crawl keyword
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeywordMatch {
    /// URL of the matched page
    pub url: String,

    /// The keywords found in the page text, in keyword-list order
    pub matched_keywords: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_match_round_trips_as_json() {
        let m = KeywordMatch {
            url: "https://example.com/aid".to_string(),
            matched_keywords: vec!["financial aid".to_string(), "grants".to_string()],
        };

        let json = serde_json::to_string(&m).unwrap();
        let back: KeywordMatch = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
        assert!(json.contains("matched_keywords"));
    }
}
