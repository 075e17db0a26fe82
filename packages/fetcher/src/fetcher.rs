//! The top-level fetch pipeline.
//!
//! One call to [`ContentFetcher::fetch_content`] runs the whole flow:
//! launch a browser session, navigate and settle, scroll lazy content into
//! the DOM, capture HTML, tear the session down, and push the capture
//! through the extraction chain. Failed attempts retry with linear backoff.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{error, info, warn};
use url::Url;

use crate::ai::{OpenAiClient, AI};
use crate::chain::ExtractionChain;
use crate::error::{AttemptError, AttemptResult, FetchError, Result, SessionError};
use crate::navigate::{adaptive_scroll, wait_for_settled};
use crate::session::{BrowserSession, CookieRecord, CookieStore};
use crate::types::config::FetchConfig;

/// Base delay unit for retry backoff; attempt `k` waits `k` times this.
const BACKOFF_UNIT: Duration = Duration::from_secs(2);

/// Browser-based content fetcher.
pub struct ContentFetcher {
    config: FetchConfig,
    cookies: CookieStore,
    chain: ExtractionChain,
}

impl ContentFetcher {
    /// Build a fetcher from configuration. The AI extraction tier is
    /// enabled when credentials are configured; a client that cannot be
    /// constructed downgrades the chain rather than failing construction.
    pub fn new(config: FetchConfig) -> Self {
        let ai: Option<Arc<dyn AI>> = config.ai.clone().and_then(|credentials| {
            match OpenAiClient::new(credentials, config.llm_timeout) {
                Ok(client) => Some(Arc::new(client) as Arc<dyn AI>),
                Err(e) => {
                    warn!(error = %e, "AI client unavailable, continuing without AI tier");
                    None
                }
            }
        });
        Self::with_ai(config, ai)
    }

    /// Build a fetcher with an explicit AI collaborator (or none).
    pub fn with_ai(config: FetchConfig, ai: Option<Arc<dyn AI>>) -> Self {
        let cookies = CookieStore::new(config.cookie_dir.clone());
        let chain = ExtractionChain::standard(ai);
        Self {
            config,
            cookies,
            chain,
        }
    }

    /// Fetch a URL and return its main content as Markdown.
    pub async fn fetch_content(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
            });
        }

        let domain_key = CookieStore::domain_key(&parsed);
        info!(url = %parsed, "fetching content");

        let outcome = run_with_backoff(self.config.max_retries, BACKOFF_UNIT, |attempt| {
            let parsed = parsed.clone();
            let domain_key = domain_key.clone();
            async move {
                let result = self.attempt(&parsed, domain_key.as_deref()).await;
                if let Err(e) = &result {
                    warn!(url = %parsed, attempt, error = %e, "fetch attempt failed");
                }
                result
            }
        })
        .await;

        match outcome {
            Ok(markdown) => Ok(markdown),
            Err((attempts, source)) => {
                error!(url = %parsed, attempts, error = %source, "fetch exhausted");
                Err(FetchError::Exhausted {
                    url: url.to_string(),
                    attempts,
                    source: Box::new(source),
                })
            }
        }
    }

    /// One full attempt: session, capture, teardown, extraction.
    async fn attempt(&self, url: &Url, domain_key: Option<&str>) -> AttemptResult<String> {
        let records = match domain_key {
            Some(key) => self.cookies.load(key).unwrap_or_else(|e| {
                warn!(key = %key, error = %e, "cookie load failed, starting fresh");
                Vec::new()
            }),
            None => Vec::new(),
        };

        let session = BrowserSession::launch(&self.config, &records).await?;

        // Teardown must run whatever capture did.
        let capture = self.capture(&session, url).await;
        let harvested = session.teardown().await;

        // A successful harvest overwrites the jar even when empty; only a
        // failed harvest leaves the previous jar in place.
        if let (Some(key), Some(harvested)) = (domain_key, harvested) {
            if let Err(e) = self.cookies.save(key, &harvested) {
                warn!(key = %key, error = %e, "cookie save failed");
            }
        }

        let html = capture?;
        let markdown = self.chain.extract(&html, url.as_str()).await?;
        Ok(markdown)
    }

    /// Navigate, settle, scroll, and capture rendered HTML.
    async fn capture(&self, session: &BrowserSession, url: &Url) -> AttemptResult<String> {
        let page = session.page();

        timeout(self.config.page_timeout, page.goto(url.as_str()))
            .await
            .map_err(|_| AttemptError::Navigation {
                url: url.to_string(),
                reason: format!(
                    "page load exceeded {}s",
                    self.config.page_timeout.as_secs()
                ),
            })?
            .map_err(|e| AttemptError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let settled = wait_for_settled(page, self.config.page_timeout).await;
        info!(url = %url, settled = ?settled, "page settled");

        let scrolls = adaptive_scroll(
            page,
            self.config.scroll_pause,
            self.config.max_scroll_iterations,
        )
        .await?;
        if scrolls > 0 {
            // Lazy content triggered by scrolling gets one more idle window,
            // shorter than the initial load wait.
            wait_for_settled(page, self.config.settle_timeout).await;
        }

        let html = page.content().await.map_err(SessionError::Cdp)?;
        Ok(html)
    }

    /// Cookies persisted for a domain, exposed for inspection.
    pub fn saved_cookies(&self, url: &Url) -> Vec<CookieRecord> {
        CookieStore::domain_key(url)
            .and_then(|key| self.cookies.load(&key).ok())
            .unwrap_or_default()
    }
}

/// Run `op` up to `max_attempts` times with linear backoff between
/// failures: attempt `k` is followed by a `k * unit` delay, except the
/// last. Returns the first success or the attempt count and last error.
pub(crate) async fn run_with_backoff<T, E, F, Fut>(
    max_attempts: u32,
    unit: Duration,
    mut op: F,
) -> std::result::Result<T, (u32, E)>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
{
    let max_attempts = max_attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                last_error = Some(e);
                if attempt < max_attempts {
                    sleep(unit * attempt).await;
                }
            }
        }
    }

    // max_attempts >= 1, so at least one error was recorded.
    Err((max_attempts, last_error.unwrap()))
}
