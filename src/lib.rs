//! # CTDL Harvester
//!
//! This crate crawls a domain for pages matching a set of keywords,
//! gathers the matched pages into one text corpus, asks Google's Gemini
//! API to restructure that corpus into CTDL support-service records, and
//! turns the result into either a direct-publish payload for the
//! Credential Engine API or a bulk-upload CSV.
//!
//! ## Pipeline
//!
//! - Subdomain expansion: derive seed URLs from the root domain
//! - Crawl: depth-bounded, deduplicated, same-origin traversal with
//!   keyword filtering and an incrementally persisted match snapshot
//! - Harvest: re-fetch matched pages into a combined corpus
//! - Extract: prompt Gemini with the corpus and the CTDL taxonomies,
//!   retrying with exponential backoff on rate limits
//! - Output: validate, convert to CSV, or publish
//!
//! ## Example
//!
//! ```rust,no_run
//! use ctdl_harvester::crawler::{self, Traversal};
//! use ctdl_harvester::fetch::HttpFetcher;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = HttpFetcher::new()?;
//!     let seeds = crawler::expand_subdomains("https://www.example.com");
//!     let keywords = vec!["tutoring".to_string(), "counseling".to_string()];
//!
//!     let mut traversal = Traversal::new(keywords, None);
//!     for seed in &seeds {
//!         traversal.crawl_seed(&fetcher, seed, 2).await?;
//!     }
//!
//!     for m in traversal.into_matches() {
//!         println!("{} -> {:?}", m.url, m.matched_keywords);
//!     }
//!     Ok(())
//! }
//! ```

mod error;

pub mod config;
pub mod crawler;
pub mod extract;
pub mod fetch;
pub mod gemini;
pub mod harvester;
pub mod output;
pub mod publish;

pub use error::Error;

/// Re-export of the crate error types for public use
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
}
