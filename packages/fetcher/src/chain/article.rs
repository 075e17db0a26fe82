//! Readability-based extraction tier.

use async_trait::async_trait;
use dom_smoothie::Readability;
use tracing::warn;

use crate::chain::{MarkdownCandidate, Strategy, PRIMARY_MIN_CHARS};
use crate::html::html_to_markdown;

/// Second extraction tier: score the DOM for its main article node and
/// convert that node alone to Markdown.
#[derive(Default)]
pub struct ArticleStrategy;

impl ArticleStrategy {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Strategy for ArticleStrategy {
    fn name(&self) -> &'static str {
        "article"
    }

    fn min_chars(&self) -> usize {
        PRIMARY_MIN_CHARS
    }

    async fn attempt(&self, html: &str, url: &str) -> Option<MarkdownCandidate> {
        let mut reader = match Readability::new(html, Some(url), None) {
            Ok(reader) => reader,
            Err(e) => {
                warn!(url = %url, error = %e, "readability init failed");
                return None;
            }
        };

        match reader.parse() {
            Ok(article) => {
                let markdown = html_to_markdown(&article.content);
                Some(MarkdownCandidate::new(markdown, self.name()))
            }
            Err(e) => {
                warn!(url = %url, error = %e, "readability parse failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::article_page;

    #[tokio::test]
    async fn test_extracts_article_body() {
        let strategy = ArticleStrategy::new();
        let candidate = strategy
            .attempt(&article_page(), "https://example.com/post")
            .await
            .unwrap();

        assert!(candidate.text.contains("first paragraph"));
        assert_eq!(candidate.strategy, "article");
    }

    #[tokio::test]
    async fn test_empty_page_yields_none_or_thin_candidate() {
        let strategy = ArticleStrategy::new();
        let candidate = strategy
            .attempt("<html><body></body></html>", "https://example.com")
            .await;

        if let Some(candidate) = candidate {
            assert!(candidate.usable_chars() <= PRIMARY_MIN_CHARS);
        }
    }
}
