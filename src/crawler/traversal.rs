//! Depth-bounded keyword-filtering traversal
//!
//! The crawl is an explicit-worklist depth-first traversal rather than
//! native recursion, so the depth bound lives in the traversal state and
//! deep same-origin sites cannot exhaust the call stack. One
//! [`Traversal`] context owns the visited set and the match accumulator
//! for an entire invocation and is reused across every seed URL.

use std::collections::HashSet;

use tracing::{debug, info, instrument};
use url::Url;

use super::config::CrawlerConfig;
use super::content::{page_links, visible_text};
use super::error::CrawlError;
use super::snapshot::SnapshotWriter;
use super::KeywordMatch;
use crate::fetch::Fetch;

/// Traversal context shared across all seeds of one crawl invocation
#[derive(Debug)]
pub struct Traversal {
    keywords: Vec<String>,
    visited: HashSet<String>,
    matches: Vec<KeywordMatch>,
    snapshot: Option<SnapshotWriter>,
}

impl Traversal {
    /// Create a context for one crawl invocation.
    ///
    /// When a snapshot writer is given, the full match list is persisted
    /// after every new match.
    pub fn new(keywords: Vec<String>, snapshot: Option<SnapshotWriter>) -> Self {
        Self {
            keywords,
            visited: HashSet::new(),
            matches: Vec::new(),
            snapshot,
        }
    }

    /// URLs already dispatched for fetching
    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    /// Matches accumulated so far, in traversal order
    pub fn matches(&self) -> &[KeywordMatch] {
        &self.matches
    }

    /// Consume the context and return the accumulated matches
    pub fn into_matches(self) -> Vec<KeywordMatch> {
        self.matches
    }

    /// Crawl from one seed URL down to `max_depth` levels.
    ///
    /// A URL is marked visited immediately before its fetch is issued,
    /// so it gets at most one fetch attempt per invocation no matter how
    /// many link paths reach it. Fetch failures skip the page without
    /// retry. Sibling links are visited in document order.
    #[instrument(skip(self, fetcher))]
    pub async fn crawl_seed<F: Fetch + ?Sized>(
        &mut self,
        fetcher: &F,
        seed: &str,
        max_depth: u32,
    ) -> Result<(), CrawlError> {
        // Normalize the seed the same way discovered links are
        // normalized, so both hit the same visited-set entry.
        let seed = Url::parse(seed)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| seed.to_string());

        let mut frontier: Vec<(String, u32)> = vec![(seed, max_depth)];

        while let Some((url, depth)) = frontier.pop() {
            if depth == 0 || self.visited.contains(&url) {
                continue;
            }
            self.visited.insert(url.clone());

            let Some(body) = fetcher.fetch_page(&url).await else {
                continue;
            };

            let page_text = visible_text(&body).to_lowercase();
            let matched_keywords: Vec<String> = self
                .keywords
                .iter()
                .filter(|keyword| {
                    let keyword = keyword.trim();
                    !keyword.is_empty() && page_text.contains(&keyword.to_lowercase())
                })
                .cloned()
                .collect();

            if !matched_keywords.is_empty() {
                debug!("Matched {:?} on {}", matched_keywords, url);
                self.matches.push(KeywordMatch {
                    url: url.clone(),
                    matched_keywords,
                });
                if let Some(snapshot) = &self.snapshot {
                    snapshot.write(&self.matches).await?;
                }
            }

            let Ok(base) = Url::parse(&url) else {
                continue;
            };
            let Some(current_host) = base.host_str().map(str::to_string) else {
                continue;
            };

            // Reverse-push so document order comes off the stack first.
            for link in page_links(&base, &body).into_iter().rev() {
                let Some(host) = link.host_str() else {
                    continue;
                };
                if !same_site(host, &current_host) {
                    continue;
                }
                let link = link.to_string();
                if !self.visited.contains(&link) {
                    frontier.push((link, depth - 1));
                }
            }
        }

        Ok(())
    }
}

/// Same-site rule for link following: the discovered host must equal the
/// current page's host or be a subdomain of it. The label boundary is
/// checked explicitly, so `evil-example.com` is not a subdomain of
/// `example.com`.
fn same_site(discovered: &str, current: &str) -> bool {
    discovered == current
        || discovered
            .strip_suffix(current)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Crawl every seed URL with one shared traversal context.
///
/// Matches accumulate across seeds; the shared visited set means only
/// the first seed to reach a URL actually fetches it, while each seed
/// restarts the depth budget at `config.max_depth`.
#[instrument(skip(fetcher, config))]
pub async fn crawl_seeds<F: Fetch + ?Sized>(
    fetcher: &F,
    seeds: &[String],
    config: &CrawlerConfig,
) -> Result<Vec<KeywordMatch>, CrawlError> {
    let snapshot = config.snapshot_path.clone().map(SnapshotWriter::new);
    let mut traversal = Traversal::new(config.keywords.clone(), snapshot);

    for seed in seeds {
        info!("Crawling seed {}", seed);
        traversal.crawl_seed(fetcher, seed, config.max_depth).await?;
    }

    let matches = traversal.into_matches();
    info!("Crawl finished with {} matched pages", matches.len());
    Ok(matches)
}
