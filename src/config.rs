//! Process configuration
//!
//! All ambient inputs (API credentials, organization identity, file
//! locations) are read from the environment exactly once at process
//! entry and carried in an explicit [`AppConfig`] passed by reference
//! into the extraction and publishing stages. Core logic never performs
//! its own environment lookups.

use std::path::{Path, PathBuf};

use crate::prelude::{Error, Result};

/// Configuration for the extraction and publishing stages
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Gemini API key
    pub gemini_api_key: String,

    /// Organization identifier embedded in api-mode output and the
    /// publish request headers (constant per deployment)
    pub organization_identifier: String,

    /// Credential Engine API token; only required for publishing
    pub ce_api_token: Option<String>,

    /// Institution code used in bulk-mode external identifiers
    /// (`<code>_ss_<n>`)
    pub institution_code: String,

    /// Directory for snapshots, corpora, and generated output
    pub output_dir: PathBuf,
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// Fails with [`Error::Config`] when a required variable is absent,
    /// before any network activity takes place.
    pub fn from_env() -> Result<Self> {
        let gemini_api_key = require_env("GEMINI_API_KEY")?;
        let organization_identifier = require_env("ORGANIZATION_IDENTIFIER")?;
        let ce_api_token = std::env::var("CE_API_TOKEN").ok();
        let institution_code =
            std::env::var("INSTITUTION_CODE").unwrap_or_else(|_| "inst".to_string());
        let output_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));

        Ok(Self {
            gemini_api_key,
            organization_identifier,
            ce_api_token,
            institution_code,
            output_dir,
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| Error::Config(format!("{} environment variable must be set", name)))
}

/// Load keywords from a plain-text file, one keyword per line.
///
/// Lines are whitespace-trimmed and blank lines dropped. A missing file
/// is a configuration error: the pipeline must fail before any crawl
/// starts rather than crawl with an empty keyword list.
pub fn load_keywords(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("keywords file {} not readable: {}", path.display(), e))
    })?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}
