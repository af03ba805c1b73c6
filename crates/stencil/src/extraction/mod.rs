//! Interface to the LLM that turns page text into [`PageRecord`]s.
//!
//! The engine never calls a model itself. Callers implement
//! [`PageExtractor`] for their provider; [`ExtractionRunner`] fans the pages
//! of a batch out to it and keeps only the records that validate.
//!
//! [`PageRecord`]: crate::record::PageRecord

pub mod prompt;
pub mod response;
pub mod runner;

use async_trait::async_trait;

use crate::error::ExtractionError;

pub use prompt::{build_page_prompt, build_system_prompt, sanitize_for_prompt};
pub use response::{extract_json, parse_page_response, ResponseParser};
pub use runner::ExtractionRunner;

/// A single system/user prompt pair sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
}

/// A text completion backend.
///
/// Implementations map transport and provider failures to
/// [`ExtractionError::Provider`].
#[async_trait]
pub trait PageExtractor: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ExtractionError>;
}
