//! AI trait for the language-model extraction tier.
//!
//! Implementations wrap a specific LLM provider and handle the specifics of
//! prompting and response parsing. The pipeline only needs one capability:
//! turn preprocessed HTML into Markdown.

use async_trait::async_trait;

use crate::error::ExtractResult;

pub mod openai;

pub use openai::OpenAiClient;

/// AI trait for LLM-assisted content extraction.
#[async_trait]
pub trait AI: Send + Sync {
    /// Extract the main content of `html` as Markdown.
    ///
    /// The implementation should return the model's answer verbatim apart
    /// from trimming; the caller judges admissibility. Errors are treated by
    /// the chain as "strategy unavailable", never as pipeline failures.
    async fn extract_markdown(&self, html: &str, url: &str) -> ExtractResult<String>;
}
