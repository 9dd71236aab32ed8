//! Crawler configuration
//!
//! Builder-pattern configuration for a crawl invocation: depth bound,
//! keyword list, and the optional snapshot path for incremental match
//! persistence.

use std::path::PathBuf;

/// Configuration for a crawl invocation
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Maximum depth to crawl from each seed URL
    pub max_depth: u32,

    /// Keywords to match against page text (case-insensitive substring)
    pub keywords: Vec<String>,

    /// Where to persist the match snapshot after every new match;
    /// `None` disables persistence
    pub snapshot_path: Option<PathBuf>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            keywords: Vec::new(),
            snapshot_path: None,
        }
    }
}

/// Builder for CrawlerConfig
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set the maximum depth to crawl
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Set the keywords to match
    pub fn keywords(mut self, keywords: Vec<String>) -> Self {
        self.config.keywords = keywords;
        self
    }

    /// Set the snapshot path
    pub fn snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.snapshot_path = Some(path.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

impl CrawlerConfig {
    /// Create a new builder
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }
}
