//! HTTP client implementation for the Gemini API
//!
//! Handles authentication, request formatting, and response parsing.
//! A 429 response maps to [`Error::RateLimit`] so callers can tell the
//! retryable failure class apart from fatal API errors; this client
//! performs no retries of its own.

use crate::error::{Error, Result};
use crate::gemini::types::HttpOptions;
use reqwest::{Client as ReqwestClient, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;

/// Default timeout for HTTP requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// HTTP client for making requests to the Gemini API
#[derive(Clone)]
pub struct HttpClient {
    /// The underlying reqwest client
    client: ReqwestClient,

    /// Base URL for API requests
    base_url: String,

    /// API key for authentication
    api_key: String,

    /// API version
    api_version: String,

    /// Fallback retry delay when a 429 carries no Retry-After header
    default_retry_after_secs: u64,
}

#[cfg(test)]
impl HttpClient {
    /// Set the base URL (for testing only)
    pub fn set_base_url(&mut self, url: String) {
        self.base_url = url;
    }
}

impl HttpClient {
    /// Create a new HTTP client with an API key
    pub fn with_api_key(api_key: String) -> Self {
        Self::with_api_key_and_options(api_key, HttpOptions::default())
    }

    /// Create a new HTTP client with an API key and custom options
    pub fn with_api_key_and_options(api_key: String, options: HttpOptions) -> Self {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key,
            api_version: options.api_version,
            default_retry_after_secs: options.default_retry_after_secs,
        }
    }

    /// Build a URL for the Gemini Developer API
    fn build_url(&self, path: &str) -> Result<Url> {
        let url = format!("{}/{}/{}", self.base_url, self.api_version, path);
        Url::parse(&url).map_err(|e| Error::Other(format!("Invalid URL: {}", e)))
    }

    /// Prepare a POST request with a JSON body
    #[instrument(skip(self, body), level = "debug")]
    pub async fn post<T: DeserializeOwned, B: Serialize + std::fmt::Debug>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path)?;
        let request = self
            .client
            .post(url)
            .json(body)
            .query(&[("key", &self.api_key)]);

        debug!("Sending POST request to {}", path);
        self.execute_request(request).await
    }

    /// Execute an HTTP request and classify the response
    async fn execute_request<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(Error::Http)?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(self.default_retry_after_secs);

            let response_text = response.text().await.map_err(Error::Http)?;
            error!("API rate limited: {} - {}", status, response_text);
            return Err(Error::RateLimit {
                retry_after_secs: retry_after,
            });
        }

        let response_text = response.text().await.map_err(Error::Http)?;

        if status.is_success() {
            serde_json::from_str(&response_text).map_err(|e| {
                error!("Failed to parse response: {}", e);
                Error::UnexpectedResponse(format!("Failed to parse response: {}", e))
            })
        } else {
            error!("API error: {} - {}", status, response_text);

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                Err(Error::Auth("Invalid API key or credentials".to_string()))
            } else {
                Err(Error::Api {
                    status_code: status.as_u16(),
                    message: response_text,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct TestResponse {
        message: String,
    }

    #[tokio::test]
    async fn test_post_request_success() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("POST", "/v1beta/test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{\"message\": \"success\"}")
            .match_query(mockito::Matcher::Any)
            .expect(1)
            .create_async()
            .await;

        let mut client = HttpClient::with_api_key("test-key".to_string());
        client.set_base_url(server.url());

        let body = serde_json::json!({"test": "data"});
        let response: TestResponse = client.post("test", &body).await.unwrap();
        assert_eq!(response.message, "success");

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_retryable_error() {
        let mut server = Server::new_async().await;
        let mock_server = server.mock("POST", "/v1beta/test")
            .with_status(429)
            .with_header("retry-after", "7")
            .with_body("{\"error\": {\"code\": 429, \"message\": \"Resource has been exhausted\", \"status\": \"RESOURCE_EXHAUSTED\"}}")
            .match_query(mockito::Matcher::Any)
            .expect(1)
            .create_async()
            .await;

        let mut client = HttpClient::with_api_key("test-key".to_string());
        client.set_base_url(server.url());

        let body = serde_json::json!({});
        let result: Result<TestResponse> = client.post("test", &body).await;
        assert!(matches!(
            result,
            Err(Error::RateLimit {
                retry_after_secs: 7
            })
        ));

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_error() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("POST", "/v1beta/test")
            .with_status(401)
            .with_body("Unauthorized")
            .match_query(mockito::Matcher::Any)
            .create_async()
            .await;

        let mut client = HttpClient::with_api_key("test-key".to_string());
        client.set_base_url(server.url());

        let body = serde_json::json!({});
        let result: Result<TestResponse> = client.post("test", &body).await;
        assert!(matches!(result, Err(Error::Auth(_))));

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_other_error_is_fatal_api_error() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("POST", "/v1beta/test")
            .with_status(500)
            .with_body("boom")
            .match_query(mockito::Matcher::Any)
            .create_async()
            .await;

        let mut client = HttpClient::with_api_key("test-key".to_string());
        client.set_base_url(server.url());

        let body = serde_json::json!({});
        let result: Result<TestResponse> = client.post("test", &body).await;
        assert!(matches!(
            result,
            Err(Error::Api {
                status_code: 500,
                ..
            })
        ));

        mock_server.assert_async().await;
    }
}
