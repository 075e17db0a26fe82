//! Typed errors for the fetching pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! The taxonomy follows the pipeline's degradation path: strategy-level
//! problems stay inside the extraction chain (logged, never surfaced),
//! anything that fails a single attempt becomes an [`AttemptError`], and
//! only retry exhaustion crosses the pipeline boundary as
//! [`FetchError::Exhausted`].

use thiserror::Error;

/// Terminal errors returned by [`crate::ContentFetcher::fetch_content`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// The input could not be parsed as an absolute URL.
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Every retry attempt failed; carries the last underlying error.
    #[error("failed to fetch {url} after {attempts} attempts: {source}")]
    Exhausted {
        url: String,
        attempts: u32,
        #[source]
        source: Box<AttemptError>,
    },
}

/// Failure of one complete fetch attempt (session + navigation + extraction).
///
/// Caught by the retry orchestrator; triggers backoff and retry unless
/// attempts are exhausted.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// Browser session could not be established or driven.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Navigation never reached a usable state.
    #[error("navigation failed for {url}: {reason}")]
    Navigation { url: String, reason: String },

    /// All extraction tiers were inadmissible.
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),
}

/// Errors from the browser session lifecycle.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Browser process failed to launch.
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// A CDP command failed.
    #[error("browser command failed: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    /// Cookie jar file could not be read or written.
    #[error("cookie store I/O error: {0}")]
    CookieIo(#[from] std::io::Error),

    /// Cookie jar file contained invalid JSON.
    #[error("cookie store codec error: {0}")]
    CookieCodec(#[from] serde_json::Error),
}

/// Errors from the extraction fallback chain.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Every tier produced output below its admissibility threshold.
    #[error("all extraction strategies produced too little content")]
    TooLittleContent,

    /// The language-model collaborator failed or returned garbage.
    ///
    /// Inside the chain this is downgraded to "strategy unavailable";
    /// it only surfaces from direct [`crate::AI`] calls.
    #[error("AI service error: {0}")]
    Ai(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias for top-level fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Result type alias for single-attempt operations.
pub type AttemptResult<T> = std::result::Result<T, AttemptError>;

/// Result type alias for session operations.
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Result type alias for extraction operations.
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;
