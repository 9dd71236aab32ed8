//! Models service for the Gemini API
//!
//! Provides content generation against a named Gemini model.

use crate::error::Result;
use crate::gemini::http::HttpClient;
use crate::gemini::types::{Content, GenerateContentResponse};
use serde::Serialize;
use tracing::{debug, instrument};

/// Request for generating content
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    /// The contents to generate from
    contents: Vec<Content>,
}

/// Service for interacting with Gemini models
#[derive(Clone)]
pub struct ModelsService {
    /// HTTP client for making API requests
    http_client: HttpClient,
}

impl ModelsService {
    /// Create a new models service
    pub(crate) fn new(http_client: HttpClient) -> Self {
        Self { http_client }
    }

    /// Generate content from a model
    #[instrument(skip(self, contents), level = "debug")]
    pub async fn generate_content(
        &self,
        model: impl Into<String> + std::fmt::Debug,
        contents: Vec<Content>,
    ) -> Result<GenerateContentResponse> {
        let model = model.into();

        let request = GenerateContentRequest { contents };
        let path = format!("models/{}:generateContent", model);

        debug!("Generating content from model {}", model);
        self.http_client.post(&path, &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_generate_content() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                "candidates": [{
                    "content": {
                        "parts": [{
                            "text": "Generated text"
                        }]
                    }
                }]
            }"#,
            )
            .create_async()
            .await;

        let mut http_client = HttpClient::with_api_key("test-key".to_string());
        http_client.set_base_url(server.url());

        let models_service = ModelsService::new(http_client);

        let content = Content::new().with_role("user").with_text("Hello, world!");
        let response = models_service
            .generate_content("gemini-2.0-flash", vec![content])
            .await
            .unwrap();

        assert_eq!(response.text(), "Generated text");
        mock_server.assert_async().await;
    }
}
