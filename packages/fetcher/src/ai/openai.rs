//! OpenAI-compatible implementation of the [`AI`] trait.
//!
//! Works against any `/v1/chat/completions` endpoint (OpenAI, DeepSeek,
//! proxies). Extraction calls run at a low temperature to favor
//! deterministic output over creativity.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::ai::AI;
use crate::error::{ExtractError, ExtractResult};
use crate::types::credentials::AiCredentials;

const SYSTEM_PROMPT: &str = "You are a content extraction assistant. You read raw HTML and \
     return only the main article content, converted to clean Markdown. \
     Preserve headings, lists, and links. Do not add commentary, \
     preamble, or explanations of any kind.";

/// Sampling temperature for extraction calls. Lower than downstream
/// summarization calls; extraction should be near-deterministic.
const EXTRACTION_TEMPERATURE: f64 = 0.3;

/// Output token cap for a single extraction response.
const MAX_OUTPUT_TOKENS: u32 = 8192;

/// OpenAI-compatible chat-completion client.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    credentials: AiCredentials,
}

impl OpenAiClient {
    /// Create a client with the given credentials and request timeout.
    pub fn new(credentials: AiCredentials, timeout: Duration) -> ExtractResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExtractError::Ai(Box::new(e)))?;
        Ok(Self {
            client,
            credentials,
        })
    }

    /// Current model identifier.
    pub fn model(&self) -> &str {
        &self.credentials.model
    }

    async fn chat(&self, system: &str, user: &str) -> ExtractResult<String> {
        let request = ChatRequest {
            model: self.credentials.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: EXTRACTION_TEMPERATURE,
            max_tokens: MAX_OUTPUT_TOKENS,
        };

        debug!(
            model = %self.credentials.model,
            prompt_chars = user.len(),
            "sending extraction request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.credentials.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.credentials.api_key.expose()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ExtractError::Ai(Box::new(e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::Ai(
                format!("chat completion failed with {status}: {body}").into(),
            ));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::Ai(Box::new(e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| ExtractError::Ai("empty chat completion response".into()))
    }
}

#[async_trait]
impl AI for OpenAiClient {
    async fn extract_markdown(&self, html: &str, url: &str) -> ExtractResult<String> {
        let user = format!(
            "Extract the main content of the page at {url} from the HTML below \
             and return it as Markdown. Return only the Markdown.\n\n{html}"
        );
        self.chat(SYSTEM_PROMPT, &user).await
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_with_cap_and_temperature() {
        let request = ChatRequest {
            model: "deepseek-chat".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
            temperature: EXTRACTION_TEMPERATURE,
            max_tokens: MAX_OUTPUT_TOKENS,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["temperature"], serde_json::json!(0.3));
        assert_eq!(json["max_tokens"], serde_json::json!(8192));
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_response_parses_first_choice() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":" # Title \n"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.trim(),
            "# Title"
        );
    }
}
