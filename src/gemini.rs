//! Gemini API implementation
//!
//! This module provides the generation capability consumed by the
//! extraction orchestrator: a typed HTTP client for Google's Gemini
//! `generateContent` endpoint. Rate-limit responses (HTTP 429) surface
//! as a distinct retryable error class; the retry policy itself lives
//! with the orchestrator, not here.

mod client;
mod http;
mod models;
mod types;

pub use client::Client;

/// Re-export of types module for public use
pub mod prelude {
    pub use super::types::*;
    pub use crate::error::Error;
    pub use crate::error::Result;
}
