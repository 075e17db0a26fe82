//! Resilient web content fetching.
//!
//! Turns a URL into clean Markdown via a real headless browser, surviving
//! the usual hostile conditions: bot detection, lazy-loaded content, pages
//! that never finish loading, and markup too messy for any single
//! extraction technique.
//!
//! The pipeline per fetch:
//!
//! 1. Launch a Chromium session with a rotated user agent, masked
//!    automation fingerprint, and cookies persisted from earlier visits to
//!    the same domain.
//! 2. Navigate, wait for the page to settle (degrading from network idle
//!    down to best effort), and scroll until lazy content stops appearing.
//! 3. Run the captured HTML through an extraction chain: LLM extraction
//!    when configured, readability scoring, and finally a mechanical
//!    HTML-to-Markdown conversion that cannot fail.
//!
//! Attempts that fail retry with linear backoff before the fetch is
//! reported as exhausted.
//!
//! ```no_run
//! use fetcher::{ContentFetcher, FetchConfig};
//!
//! # async fn run() -> Result<(), fetcher::FetchError> {
//! let fetcher = ContentFetcher::new(FetchConfig::from_env());
//! let markdown = fetcher.fetch_content("https://example.com/article").await?;
//! # Ok(())
//! # }
//! ```

pub mod ai;
pub mod chain;
pub mod error;
pub mod fetcher;
pub mod html;
pub mod navigate;
pub mod session;
pub mod testing;
pub mod types;

pub use ai::{OpenAiClient, AI};
pub use chain::{ExtractionChain, MarkdownCandidate, Strategy};
pub use error::{AttemptError, ExtractError, FetchError, SessionError};
pub use fetcher::ContentFetcher;
pub use session::{CookieRecord, CookieStore};
pub use types::config::FetchConfig;
pub use types::credentials::AiCredentials;
