//! LLM credential handling with secure memory.
//!
//! Uses the `secrecy` crate so API keys are never accidentally exposed in
//! logs, debug output, or error messages.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

/// An API key held in `secrecy`-guarded memory. The only way out is
/// [`SecretString::expose`], called at the point the request is built.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose().to_string())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Credentials and endpoint for the language-model collaborator.
///
/// Presence of this value enables the AI extraction tier; its absence
/// silently disables it.
#[derive(Clone)]
pub struct AiCredentials {
    /// API key (secret).
    pub api_key: SecretString,

    /// OpenAI-compatible base URL, normalized to end in `/v1`.
    pub base_url: String,

    /// Model identifier.
    pub model: String,
}

impl AiCredentials {
    /// Create new credentials. The base URL is normalized to carry the
    /// `/v1` suffix the chat-completions path is appended to.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key),
            base_url: normalize_base_url(&base_url.into()),
            model: "deepseek-chat".to_string(),
        }
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl fmt::Debug for AiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiCredentials")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

/// Ensure the base URL ends with `/v1`; the client appends
/// `/chat/completions` to it.
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim_end_matches('/');
    if trimmed.ends_with("/v1") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/v1")
    }
}
