//! Extraction fallback chain.
//!
//! Given rendered HTML, produce the best obtainable Markdown by trying an
//! ordered list of strategies of decreasing sophistication. Expensive,
//! unreliable strategies run first; a cheap mechanical conversion anchors
//! worst-case behavior. Each candidate passes a uniform admissibility check
//! before acceptance, otherwise the chain falls through to the next tier.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::ai::AI;
use crate::error::{ExtractError, ExtractResult};
use crate::html::normalize_markdown;

mod ai;
mod article;
mod convert;

pub use ai::AiStrategy;
pub use article::ArticleStrategy;
pub use convert::ConvertStrategy;

/// Minimum trimmed character count for the AI and article tiers.
pub const PRIMARY_MIN_CHARS: usize = 100;

/// Minimum trimmed character count for the final conversion tier.
pub const FALLBACK_MIN_CHARS: usize = 50;

/// A candidate result produced by one extraction strategy.
#[derive(Debug, Clone)]
pub struct MarkdownCandidate {
    /// Markdown text, pre-normalization.
    pub text: String,

    /// Name of the strategy that produced it.
    pub strategy: &'static str,
}

impl MarkdownCandidate {
    /// Create a candidate.
    pub fn new(text: impl Into<String>, strategy: &'static str) -> Self {
        Self {
            text: text.into(),
            strategy,
        }
    }

    /// Trimmed character count used for admissibility.
    pub fn usable_chars(&self) -> usize {
        self.text.trim().chars().count()
    }
}

/// One extraction tier.
///
/// `attempt` returns `None` when the strategy cannot run or produced
/// nothing; internal errors are logged by the implementation and mapped to
/// `None` so a failing tier never fails the chain.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Strategy name for logging.
    fn name(&self) -> &'static str;

    /// Admissibility threshold: a candidate is accepted only when its
    /// trimmed character count strictly exceeds this.
    fn min_chars(&self) -> usize;

    /// Try to extract Markdown from the rendered HTML.
    async fn attempt(&self, html: &str, url: &str) -> Option<MarkdownCandidate>;
}

/// Ordered extraction chain.
pub struct ExtractionChain {
    strategies: Vec<Box<dyn Strategy>>,
}

impl ExtractionChain {
    /// Build the standard three-tier chain. The AI tier is present only
    /// when an AI collaborator is supplied.
    pub fn standard(ai: Option<Arc<dyn AI>>) -> Self {
        let mut strategies: Vec<Box<dyn Strategy>> = Vec::with_capacity(3);
        if let Some(ai) = ai {
            strategies.push(Box::new(AiStrategy::new(ai)));
        }
        strategies.push(Box::new(ArticleStrategy::new()));
        strategies.push(Box::new(ConvertStrategy::new()));
        Self { strategies }
    }

    /// Build a chain from explicit strategies (used by tests).
    pub fn from_strategies(strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    /// Number of tiers in this chain.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Whether the chain has no tiers.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Run the chain over rendered HTML, returning normalized Markdown from
    /// the first admissible candidate.
    pub async fn extract(&self, html: &str, url: &str) -> ExtractResult<String> {
        for strategy in &self.strategies {
            let Some(candidate) = strategy.attempt(html, url).await else {
                warn!(strategy = strategy.name(), url = %url, "strategy unavailable");
                continue;
            };

            let usable = candidate.usable_chars();
            if usable > strategy.min_chars() {
                info!(
                    strategy = strategy.name(),
                    chars = usable,
                    url = %url,
                    "extraction strategy accepted"
                );
                return Ok(normalize_markdown(&candidate.text));
            }

            warn!(
                strategy = strategy.name(),
                chars = usable,
                threshold = strategy.min_chars(),
                url = %url,
                "candidate below admissibility threshold"
            );
        }

        Err(ExtractError::TooLittleContent)
    }
}
