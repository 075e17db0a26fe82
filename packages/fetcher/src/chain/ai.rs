//! LLM-assisted extraction tier.

use async_trait::async_trait;
use dom_smoothie::Readability;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::ai::AI;
use crate::chain::{MarkdownCandidate, Strategy, PRIMARY_MIN_CHARS};
use crate::html::strip_noise;

/// Character cap on the HTML handed to the model. Keeps prompts inside
/// context limits on long pages.
const MAX_PROMPT_CHARS: usize = 50_000;

/// Minimum size of a readability-reduced document before we fall back to
/// generic noise stripping for preprocessing.
const MIN_REDUCED_CHARS: usize = 200;

/// First extraction tier: preprocess the page down to its probable article
/// region, then ask the model to produce Markdown.
pub struct AiStrategy {
    ai: Arc<dyn AI>,
}

impl AiStrategy {
    pub fn new(ai: Arc<dyn AI>) -> Self {
        Self { ai }
    }

    /// Reduce the page before prompting. Prefer the readability extraction;
    /// when it yields too little, fall back to generic noise stripping so
    /// the model still sees the whole (cleaned) page.
    fn preprocess(html: &str, url: &str) -> String {
        let reduced = Readability::new(html, Some(url), None)
            .ok()
            .and_then(|mut reader| reader.parse().ok())
            .map(|article| article.content.to_string())
            .unwrap_or_default();

        if reduced.trim().chars().count() >= MIN_REDUCED_CHARS {
            reduced
        } else {
            strip_noise(html)
        }
    }

    /// Truncate on a character boundary.
    fn truncate(text: &str) -> &str {
        match text.char_indices().nth(MAX_PROMPT_CHARS) {
            Some((idx, _)) => &text[..idx],
            None => text,
        }
    }
}

#[async_trait]
impl Strategy for AiStrategy {
    fn name(&self) -> &'static str {
        "ai"
    }

    fn min_chars(&self) -> usize {
        PRIMARY_MIN_CHARS
    }

    async fn attempt(&self, html: &str, url: &str) -> Option<MarkdownCandidate> {
        let prepared = Self::preprocess(html, url);
        let prompt_html = Self::truncate(&prepared);
        debug!(
            url = %url,
            prompt_chars = prompt_html.chars().count(),
            "running AI extraction"
        );

        match self.ai.extract_markdown(prompt_html, url).await {
            Ok(markdown) => Some(MarkdownCandidate::new(markdown, self.name())),
            Err(e) => {
                warn!(url = %url, error = %e, "AI extraction failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockAi;

    #[tokio::test]
    async fn test_ai_error_becomes_none() {
        let strategy = AiStrategy::new(Arc::new(MockAi::failing("model offline")));
        let result = strategy
            .attempt("<p>page</p>", "https://example.com")
            .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_ai_output_becomes_candidate() {
        let strategy = AiStrategy::new(Arc::new(MockAi::returning("# Extracted")));
        let candidate = strategy
            .attempt("<p>page</p>", "https://example.com")
            .await
            .unwrap();
        assert_eq!(candidate.text, "# Extracted");
        assert_eq!(candidate.strategy, "ai");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "é".repeat(MAX_PROMPT_CHARS + 10);
        let truncated = AiStrategy::truncate(&text);
        assert_eq!(truncated.chars().count(), MAX_PROMPT_CHARS);
    }

    #[test]
    fn test_preprocess_falls_back_to_noise_stripping() {
        // Too thin for readability; generic cleaning must still remove nav.
        let html = r#"<html><body>
            <nav>Menu</nav>
            <p>Short body.</p>
        </body></html>"#;

        let prepared = AiStrategy::preprocess(html, "https://example.com");
        assert!(prepared.contains("Short body."));
        assert!(!prepared.contains("Menu"));
    }
}
