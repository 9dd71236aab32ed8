//! Error types for the crawler module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Snapshot persistence error
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] std::io::Error),

    /// Snapshot serialization error
    #[error("Snapshot serialization error: {0}")]
    SnapshotSerialize(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl From<CrawlError> for CrateError {
    fn from(err: CrawlError) -> Self {
        match err {
            CrawlError::Http(e) => CrateError::Http(e),
            CrawlError::Snapshot(e) => CrateError::Io(e),
            _ => CrateError::Crawl(err.to_string()),
        }
    }
}
