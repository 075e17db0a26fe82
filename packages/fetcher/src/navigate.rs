//! Page settling and adaptive scrolling.
//!
//! After `goto`, pages are given a chance to reach network idle before
//! capture; sites that never go idle degrade to weaker readiness signals
//! instead of failing. Lazy-loading pages are scrolled until the document
//! height stops growing so below-the-fold content renders before capture.

use async_trait::async_trait;
use chromiumoxide::Page;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::error::{SessionError, SessionResult};

/// Poll interval for readiness checks.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// How long the resource count must hold still to count as network idle.
const IDLE_WINDOW: Duration = Duration::from_secs(1);

/// Consecutive stable height measurements required to stop scrolling.
const STABLE_ROUNDS: u32 = 3;

/// Readiness level reached before capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// Document complete and no new network resources for [`IDLE_WINDOW`].
    NetworkIdle,
    /// Document complete, network still active.
    LoadComplete,
    /// Weaker readiness accepted after the settle deadline.
    BestEffort,
}

/// The readiness signals [`wait_for_settled`] polls from a page.
#[async_trait]
pub trait ReadinessProbe {
    /// Current `document.readyState`, `None` when the probe itself fails.
    async fn ready_state(&self) -> Option<String>;

    /// Number of network resources the page has loaded so far.
    async fn resource_count(&self) -> Option<u64>;
}

#[async_trait]
impl ReadinessProbe for Page {
    async fn ready_state(&self) -> Option<String> {
        match self.evaluate("document.readyState").await {
            Ok(result) => result.into_value::<String>().ok(),
            Err(e) => {
                debug!(error = %e, "readyState probe failed");
                None
            }
        }
    }

    async fn resource_count(&self) -> Option<u64> {
        match self
            .evaluate("performance.getEntriesByType('resource').length")
            .await
        {
            Ok(result) => result.into_value::<u64>().ok(),
            Err(e) => {
                debug!(error = %e, "resource count probe failed");
                None
            }
        }
    }
}

/// Wait up to `timeout` for the page to settle, degrading through
/// readiness tiers.
///
/// Never fails: a page that refuses to settle is captured as-is.
pub async fn wait_for_settled<P: ReadinessProbe + Sync>(probe: &P, timeout: Duration) -> Settled {
    let deadline = Instant::now() + timeout;
    let mut last_resources: Option<u64> = None;
    let mut stable_since: Option<Instant> = None;

    while Instant::now() < deadline {
        let complete = matches!(probe.ready_state().await.as_deref(), Some("complete"));
        let resources = probe.resource_count().await;

        if complete {
            match (resources, last_resources) {
                (Some(now), Some(prev)) if now == prev => {
                    let since = *stable_since.get_or_insert_with(Instant::now);
                    if since.elapsed() >= IDLE_WINDOW {
                        return Settled::NetworkIdle;
                    }
                }
                _ => stable_since = None,
            }
        } else {
            stable_since = None;
        }

        last_resources = resources;
        sleep(POLL_INTERVAL).await;
    }

    if matches!(probe.ready_state().await.as_deref(), Some("complete")) {
        debug!("settle deadline reached with document complete");
        Settled::LoadComplete
    } else {
        warn!("settle deadline reached before document complete");
        Settled::BestEffort
    }
}

/// The scrolling operations [`adaptive_scroll`] needs from a page.
#[async_trait]
pub trait ScrollSurface {
    async fn scroll_by_viewport(&self) -> SessionResult<()>;
    async fn document_height(&self) -> SessionResult<u64>;
    async fn scroll_to_top(&self) -> SessionResult<()>;
}

#[async_trait]
impl ScrollSurface for Page {
    async fn scroll_by_viewport(&self) -> SessionResult<()> {
        self.evaluate("window.scrollBy(0, window.innerHeight)")
            .await?;
        Ok(())
    }

    async fn document_height(&self) -> SessionResult<u64> {
        let result = self
            .evaluate("document.body ? document.body.scrollHeight : 0")
            .await?;
        result
            .into_value::<u64>()
            .map_err(|e| SessionError::Cdp(e.into()))
    }

    async fn scroll_to_top(&self) -> SessionResult<()> {
        self.evaluate("window.scrollTo(0, 0)").await?;
        Ok(())
    }
}

/// Scroll until the document height is stable for [`STABLE_ROUNDS`]
/// consecutive measurements or the iteration cap is reached, then return
/// to the top. Returns the number of scroll steps performed.
pub async fn adaptive_scroll<S: ScrollSurface + Sync>(
    surface: &S,
    pause: Duration,
    max_iterations: u32,
) -> SessionResult<u32> {
    let mut last_height = surface.document_height().await?;
    let mut stable: u32 = 0;
    let mut iterations: u32 = 0;

    while iterations < max_iterations {
        surface.scroll_by_viewport().await?;
        iterations += 1;
        sleep(pause).await;

        let height = surface.document_height().await?;
        if height == last_height {
            stable += 1;
            if stable >= STABLE_ROUNDS {
                break;
            }
        } else {
            stable = 0;
        }
        last_height = height;
    }

    if iterations >= max_iterations {
        debug!(iterations, "scroll iteration cap reached");
    }

    surface.scroll_to_top().await?;
    Ok(iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

    /// A page whose height grows by a fixed step for the first `growth`
    /// scrolls, then holds still.
    struct GrowingSurface {
        growth: u32,
        scrolls: AtomicU32,
        height: AtomicU64,
    }

    impl GrowingSurface {
        fn new(growth: u32) -> Self {
            Self {
                growth,
                scrolls: AtomicU32::new(0),
                height: AtomicU64::new(1000),
            }
        }
    }

    #[async_trait]
    impl ScrollSurface for GrowingSurface {
        async fn scroll_by_viewport(&self) -> SessionResult<()> {
            let n = self.scrolls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= self.growth {
                self.height.fetch_add(500, Ordering::SeqCst);
            }
            Ok(())
        }

        async fn document_height(&self) -> SessionResult<u64> {
            Ok(self.height.load(Ordering::SeqCst))
        }

        async fn scroll_to_top(&self) -> SessionResult<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_scroll_count_is_growth_plus_stability_window() {
        for growth in [0u32, 1, 4, 10] {
            let surface = GrowingSurface::new(growth);
            let count = adaptive_scroll(&surface, Duration::from_millis(500), 30)
                .await
                .unwrap();
            assert_eq!(count, growth + STABLE_ROUNDS);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ever_growing_page_hits_cap() {
        let surface = GrowingSurface::new(u32::MAX);
        let count = adaptive_scroll(&surface, Duration::from_millis(500), 30)
            .await
            .unwrap();
        assert_eq!(count, 30);
    }

    /// A page with a fixed readyState whose resource count grows for the
    /// first `busy_polls` probes, then holds still.
    struct ScriptedProbe {
        state: &'static str,
        busy_polls: u64,
        polls: AtomicU64,
    }

    impl ScriptedProbe {
        fn new(state: &'static str, busy_polls: u64) -> Self {
            Self {
                state,
                busy_polls,
                polls: AtomicU64::new(0),
            }
        }
    }

    #[async_trait]
    impl ReadinessProbe for ScriptedProbe {
        async fn ready_state(&self) -> Option<String> {
            Some(self.state.to_string())
        }

        async fn resource_count(&self) -> Option<u64> {
            let n = self.polls.fetch_add(1, Ordering::SeqCst);
            Some(n.min(self.busy_polls))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_quiet_page_reaches_network_idle() {
        let probe = ScriptedProbe::new("complete", 0);
        let settled = wait_for_settled(&probe, Duration::from_secs(10)).await;
        assert_eq!(settled, Settled::NetworkIdle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_network_degrades_to_load_complete() {
        // Resources grow on every poll, so idle is never observed.
        let probe = ScriptedProbe::new("complete", u64::MAX);
        let start = Instant::now();
        let settled = wait_for_settled(&probe, Duration::from_secs(10)).await;
        assert_eq!(settled, Settled::LoadComplete);
        assert!(start.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_incomplete_document_is_best_effort() {
        let probe = ScriptedProbe::new("interactive", 0);
        let settled = wait_for_settled(&probe, Duration::from_secs(10)).await;
        assert_eq!(settled, Settled::BestEffort);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_deadline_honors_given_timeout() {
        // The caller's timeout bounds the wait, not a fixed constant: a
        // never-idle page holds the long wait for the long deadline.
        let probe = ScriptedProbe::new("complete", u64::MAX);
        let start = Instant::now();
        wait_for_settled(&probe, Duration::from_secs(90)).await;
        assert!(start.elapsed() >= Duration::from_secs(90));

        let probe = ScriptedProbe::new("complete", u64::MAX);
        let start = Instant::now();
        wait_for_settled(&probe, Duration::from_secs(10)).await;
        assert!(start.elapsed() < Duration::from_secs(12));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_cap_never_scrolls() {
        let surface = GrowingSurface::new(5);
        let count = adaptive_scroll(&surface, Duration::from_millis(500), 0)
            .await
            .unwrap();
        assert_eq!(count, 0);
        assert_eq!(surface.scrolls.load(Ordering::SeqCst), 0);
    }
}
