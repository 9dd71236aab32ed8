//! Publishing to the Credential Engine registry
//!
//! Posts an api-mode publish envelope to the sandbox bulk-publish
//! endpoint. The registry's JSON response is the publish log; on
//! success it is written under the output directory so a publish can
//! be audited after the fact.

use reqwest::{Client as ReqwestClient, StatusCode};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, instrument};

use crate::config::AppConfig;
use crate::error::{Error, Result};

const BULK_PUBLISH_ENDPOINT: &str =
    "https://sandbox.credentialengine.org/assistant/SupportService/bulkpublish";

/// Timeout for publish requests in seconds
const PUBLISH_TIMEOUT_SECS: u64 = 120;

/// Client for the registry bulk-publish endpoint
pub struct Publisher {
    client: ReqwestClient,
    endpoint: String,
    api_token: String,
    organization_identifier: String,
}

impl Publisher {
    /// Create a publisher from the process configuration.
    ///
    /// Fails with [`Error::Config`] when no API token is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let api_token = config
            .ce_api_token
            .clone()
            .ok_or_else(|| Error::Config("CE_API_TOKEN environment variable must be set".into()))?;

        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(PUBLISH_TIMEOUT_SECS))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            endpoint: BULK_PUBLISH_ENDPOINT.to_string(),
            api_token,
            organization_identifier: config.organization_identifier.clone(),
        })
    }

    #[cfg(test)]
    pub(crate) fn set_endpoint(&mut self, endpoint: String) {
        self.endpoint = endpoint;
    }

    /// Post the publish envelope and return the registry's publish log.
    #[instrument(skip(self, payload))]
    pub async fn publish(&self, payload: &Value) -> Result<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("APIToken {}", self.api_token))
            .header(
                "PublishForOrganizationIdentifier",
                &self.organization_identifier,
            )
            .json(payload)
            .send()
            .await
            .map_err(Error::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Http)?;

        if status == StatusCode::OK {
            info!("Publish accepted by the registry");
            serde_json::from_str(&body).map_err(|e| {
                Error::UnexpectedResponse(format!("registry returned malformed JSON: {}", e))
            })
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            error!("Publish rejected: {} - {}", status, body);
            Err(Error::Auth("Invalid registry API token".to_string()))
        } else {
            error!("Publish failed: {} - {}", status, body);
            Err(Error::Publish(format!(
                "registry returned {}: {}",
                status, body
            )))
        }
    }
}

/// Persist the registry's publish log under the output directory.
pub async fn write_publish_log(output_dir: &Path, log: &Value) -> Result<()> {
    tokio::fs::create_dir_all(output_dir).await?;
    let path = output_dir.join("publish_log.json");
    let bytes = serde_json::to_vec_pretty(log)?;
    tokio::fs::write(&path, bytes).await?;
    info!("Publish log written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde_json::json;

    fn test_config(token: Option<&str>) -> AppConfig {
        AppConfig {
            gemini_api_key: "gem-key".to_string(),
            organization_identifier: "ce-org".to_string(),
            ce_api_token: token.map(String::from),
            institution_code: "inst".to_string(),
            output_dir: "uploads".into(),
        }
    }

    #[test]
    fn test_missing_token_is_a_config_error() {
        let result = Publisher::from_config(&test_config(None));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_publish_sends_auth_headers_and_returns_log() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("POST", "/bulkpublish")
            .match_header("authorization", "APIToken secret-token")
            .match_header("publishfororganizationidentifier", "ce-org")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"Successful": true, "RecordsPublished": 2}"#)
            .expect(1)
            .create_async()
            .await;

        let mut publisher = Publisher::from_config(&test_config(Some("secret-token"))).unwrap();
        publisher.set_endpoint(format!("{}/bulkpublish", server.url()));

        let log = publisher
            .publish(&json!({"SupportServices": []}))
            .await
            .unwrap();

        assert_eq!(log["RecordsPublished"], 2);
        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_publish_failure_surfaces_status_and_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/bulkpublish")
            .with_status(400)
            .with_body("bad envelope")
            .create_async()
            .await;

        let mut publisher = Publisher::from_config(&test_config(Some("secret-token"))).unwrap();
        publisher.set_endpoint(format!("{}/bulkpublish", server.url()));

        let result = publisher.publish(&json!({})).await;
        match result {
            Err(Error::Publish(message)) => assert!(message.contains("bad envelope")),
            other => panic!("expected publish error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_publish_unauthorized_is_auth_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/bulkpublish")
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let mut publisher = Publisher::from_config(&test_config(Some("wrong-token"))).unwrap();
        publisher.set_endpoint(format!("{}/bulkpublish", server.url()));

        let result = publisher.publish(&json!({})).await;
        assert!(matches!(result, Err(Error::Auth(_))));
    }

    #[tokio::test]
    async fn test_write_publish_log_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("uploads");

        write_publish_log(&nested, &json!({"Successful": true}))
            .await
            .unwrap();

        let written = tokio::fs::read_to_string(nested.join("publish_log.json"))
            .await
            .unwrap();
        assert!(written.contains("\"Successful\": true"));
    }
}
