//! Page fetching seam
//!
//! The crawler and harvester consume fetching as a capability so tests
//! can drive them with in-memory fakes. Fetch failures (network errors
//! and non-2xx statuses) are recovered locally by the callers, so the
//! trait collapses them to `None` rather than surfacing an error type.

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use tracing::{debug, warn};

/// Request timeout for page fetches in seconds
const FETCH_TIMEOUT_SECS: u64 = 30;

/// Capability for fetching a web page body
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch the body of `url`. Returns `None` on network failure or a
    /// non-success status; the caller treats that as "no content".
    async fn fetch_page(&self, url: &str) -> Option<String>;

    /// Check whether `url` resolves to a reachable page (HEAD request,
    /// redirects followed). Used by the bulk-record validator.
    async fn is_reachable(&self, url: &str) -> bool;
}

/// HTTP fetcher backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: ReqwestClient,
}

impl HttpFetcher {
    /// Create a fetcher with an explicit request timeout and the crate
    /// user agent.
    pub fn new() -> crate::prelude::Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .user_agent(format!("ctdl-harvester/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Option<String> {
        match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => match response.text().await {
                Ok(body) => Some(body),
                Err(e) => {
                    warn!("Failed to read body from {}: {}", url, e);
                    None
                }
            },
            Ok(response) => {
                debug!("Skipping {}: status {}", url, response.status());
                None
            }
            Err(e) => {
                warn!("Failed to fetch {}: {}", url, e);
                None
            }
        }
    }

    async fn is_reachable(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
