//! Corpus-to-CTDL extraction
//!
//! Sends the harvested text corpus to Gemini together with the CTDL
//! taxonomies and parses the generated JSON. Rate-limited calls are
//! retried with exponential backoff; malformed generations surface as
//! [`Error::InvalidGenerated`] so callers can distinguish a bad model
//! output from a transport failure.

mod prompt;
mod retry;

pub use prompt::{ACCOMMODATION_TYPES, SUPPORT_SERVICE_TYPES, api_prompt, bulk_prompt};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper, retry_with_backoff};

use async_trait::async_trait;
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{debug, instrument};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::gemini::prelude::Content;

/// Matches the Markdown code fences Gemini wraps JSON output in
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?").expect("static regex"));

/// Which output shape to ask the model for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// One publish envelope for the Credential Engine registry API
    Api,
    /// A flat record array for the bulk-upload CSV template
    Bulk,
}

impl FromStr for ExtractMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "api" => Ok(Self::Api),
            "bulk" => Ok(Self::Bulk),
            other => Err(Error::Config(format!(
                "unknown extraction mode '{}', expected 'api' or 'bulk'",
                other
            ))),
        }
    }
}

/// Text generation seam so extraction can be tested without the live API
#[async_trait]
pub trait GenerateText: Send + Sync {
    /// Generate a text completion for the given prompt
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Production generator backed by the Gemini models service
pub struct GeminiGenerator {
    client: crate::gemini::Client,
    model: String,
}

impl GeminiGenerator {
    /// Create a generator for a named Gemini model
    pub fn new(client: crate::gemini::Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl GenerateText for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let content = Content::new().with_role("user").with_text(prompt);
        let response = self
            .client
            .models()
            .generate_content(self.model.clone(), vec![content])
            .await?;
        Ok(response.text())
    }
}

/// Strip Markdown code fences from a generation and trim whitespace
pub fn strip_code_fences(raw: &str) -> String {
    FENCE_RE.replace_all(raw, "").trim().to_string()
}

/// Parse a cleaned generation into JSON, surfacing parse failures as
/// invalid-generation errors rather than plain JSON errors
pub fn parse_generated(cleaned: &str) -> Result<serde_json::Value> {
    serde_json::from_str(cleaned)
        .map_err(|e| Error::InvalidGenerated(format!("model returned malformed JSON: {}", e)))
}

/// Run the full extraction step: build the prompt for `mode`, call the
/// generator under the retry policy, and parse the cleaned output.
#[instrument(skip(generator, sleeper, policy, corpus, config), level = "debug")]
pub async fn extract_services<G, S>(
    generator: &G,
    sleeper: &S,
    policy: &RetryPolicy,
    corpus: &str,
    mode: ExtractMode,
    config: &AppConfig,
) -> Result<serde_json::Value>
where
    G: GenerateText + ?Sized,
    S: Sleeper + ?Sized,
{
    let prompt = match mode {
        ExtractMode::Api => api_prompt(corpus, &config.organization_identifier),
        ExtractMode::Bulk => bulk_prompt(corpus, &config.institution_code),
    };
    debug!("Extraction prompt is {} chars", prompt.len());

    let raw = retry_with_backoff(policy, sleeper, || generator.generate(&prompt)).await?;
    let cleaned = strip_code_fences(&raw);
    parse_generated(&cleaned)
}
