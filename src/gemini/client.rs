//! Client implementation for the Gemini API
//!
//! This module provides the main entry point for interacting with the
//! Gemini API.

use crate::gemini::http::HttpClient;
use crate::gemini::models::ModelsService;
use crate::gemini::types::HttpOptions;

/// Client for the Gemini API
#[derive(Clone)]
pub struct Client {
    http_client: HttpClient,
}

impl Client {
    /// Create a new client with an API key for the Gemini Developer API
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        let http_client = HttpClient::with_api_key(api_key.into());
        Self { http_client }
    }

    /// Create a new client with custom HTTP options
    pub fn with_options(api_key: impl Into<String>, options: HttpOptions) -> Self {
        let http_client = HttpClient::with_api_key_and_options(api_key.into(), options);
        Self { http_client }
    }

    /// Access the models service
    pub fn models(&self) -> ModelsService {
        ModelsService::new(self.http_client.clone())
    }

    #[cfg(test)]
    pub(crate) fn set_base_url(&mut self, url: String) {
        self.http_client.set_base_url(url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_with_api_key() {
        let client = Client::with_api_key("test-api-key");
        // The models service shares the configured HTTP client.
        let _ = client.models();
    }
}
