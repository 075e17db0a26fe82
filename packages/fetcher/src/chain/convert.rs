//! Mechanical conversion tier, the chain's guaranteed last resort.

use async_trait::async_trait;

use crate::chain::{MarkdownCandidate, Strategy, FALLBACK_MIN_CHARS};
use crate::html::{html_to_markdown, strip_noise};

/// Final extraction tier: strip noise and convert the whole remaining page.
/// Always produces a candidate; only the admissibility check can reject it.
#[derive(Default)]
pub struct ConvertStrategy;

impl ConvertStrategy {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Strategy for ConvertStrategy {
    fn name(&self) -> &'static str {
        "convert"
    }

    fn min_chars(&self) -> usize {
        FALLBACK_MIN_CHARS
    }

    async fn attempt(&self, html: &str, _url: &str) -> Option<MarkdownCandidate> {
        let cleaned = strip_noise(html);
        Some(MarkdownCandidate::new(
            html_to_markdown(&cleaned),
            self.name(),
        ))
    }
}
