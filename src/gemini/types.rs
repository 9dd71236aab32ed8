//! Type definitions for the Gemini API
//!
//! Request and response structures for the `generateContent` endpoint.

use serde::{Deserialize, Serialize};

/// Content represents a piece of content sent to or returned by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// The role of the content (e.g., "user", "model")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// The parts that make up this content
    pub parts: Vec<Part>,
}

impl Default for Content {
    fn default() -> Self {
        Self::new()
    }
}

impl Content {
    /// Create a new empty content
    pub fn new() -> Self {
        Self {
            role: None,
            parts: Vec::new(),
        }
    }

    /// Set the role for this content
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Add text to this content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(Part::Text(text.into()));
        self
    }
}

/// A part of content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Part {
    /// Text content
    #[serde(rename = "text")]
    Text(String),
}

/// Response from content generation
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    /// The generated candidates
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Get the text from the first candidate's first text part
    pub fn text(&self) -> String {
        if let Some(candidate) = self.candidates.first() {
            if let Some(content) = candidate.content.as_ref() {
                for part in &content.parts {
                    let Part::Text(text) = part;
                    return text.clone();
                }
            }
        }
        String::new()
    }
}

/// A candidate response from the model
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    /// The content of the candidate
    pub content: Option<Content>,

    /// Finish reason
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

/// HTTP options for client configuration
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// API version
    pub api_version: String,

    /// Default retry delay in seconds reported when a rate-limit
    /// response carries no Retry-After header
    pub default_retry_after_secs: u64,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            api_version: "v1beta".to_string(),
            default_retry_after_secs: 2,
        }
    }
}
