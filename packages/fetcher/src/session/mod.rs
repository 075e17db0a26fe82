//! Browser session lifecycle.
//!
//! A [`BrowserSession`] owns one headless Chromium instance and one page.
//! Launch configures identity (user agent, headers, locale, timezone),
//! registers stealth scripts, and replays persisted cookies before any
//! navigation. Teardown harvests cookies and always releases the browser,
//! even when harvesting fails.

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::{
    SetLocaleOverrideParams, SetTimezoneOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::network::{
    CookieParam, Headers, SetExtraHttpHeadersParams, SetUserAgentOverrideParams, TimeSinceEpoch,
};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{SessionError, SessionResult};
use crate::types::config::FetchConfig;

pub mod cookies;
pub mod identity;
pub mod stealth;

pub use cookies::{CookieRecord, CookieStore};

/// A live browser session bound to a single page.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Page,
}

impl BrowserSession {
    /// Launch a configured browser and prepare a page for navigation.
    ///
    /// `records` are cookies persisted by earlier sessions against the same
    /// domain; each is replayed best-effort before navigation.
    pub async fn launch(
        config: &FetchConfig,
        records: &[CookieRecord],
    ) -> SessionResult<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(config.viewport.0, config.viewport.1)
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-dev-shm-usage")
            .arg("--no-sandbox")
            .arg("--disable-gpu");

        if let Some(proxy) = &config.proxy {
            builder = builder.arg(format!("--proxy-server={proxy}"));
        }
        if let Some(executable) = &config.chrome_executable {
            builder = builder.chrome_executable(executable.clone());
        }

        let browser_config = builder.build().map_err(SessionError::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config).await?;
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "browser handler event error");
                }
            }
        });

        let page = browser.new_page("about:blank").await?;

        let user_agent = identity::random_user_agent();
        let accept_language = identity::accept_language_for(&config.locale);
        page.execute(
            SetUserAgentOverrideParams::builder()
                .user_agent(user_agent)
                .accept_language(accept_language.clone())
                .build()
                .map_err(SessionError::Launch)?,
        )
        .await?;

        page.execute(SetExtraHttpHeadersParams::new(Headers::new(
            identity::default_headers(&accept_language),
        )))
        .await?;

        page.execute(SetTimezoneOverrideParams::new(config.timezone.clone()))
            .await?;
        page.execute(SetLocaleOverrideParams {
            locale: Some(config.locale.clone()),
        })
        .await?;

        stealth::apply(&page).await;

        for record in records {
            let mut param = CookieParam::builder()
                .name(record.name.as_str())
                .value(record.value.as_str())
                .domain(record.domain.as_str())
                .path(record.path.as_str())
                .secure(record.secure)
                .http_only(record.http_only);
            if let Some(expires) = record.expires {
                param = param.expires(TimeSinceEpoch::new(expires));
            }

            match param.build() {
                Ok(param) => {
                    if let Err(e) = page.set_cookie(param).await {
                        warn!(name = %record.name, error = %e, "cookie replay failed");
                    }
                }
                Err(e) => {
                    warn!(name = %record.name, error = %e, "cookie param invalid");
                }
            }
        }

        debug!(user_agent = %user_agent, "browser session ready");
        Ok(Self {
            browser,
            handler_task,
            page,
        })
    }

    /// The session's page.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Harvest cookies and shut the browser down.
    ///
    /// Returns `Some` with the context's current cookie set on a successful
    /// harvest; an empty set is a valid result and replaces whatever was
    /// persisted before. `None` means the harvest itself failed and the
    /// caller should keep its previous jar. Every shutdown step runs
    /// regardless of earlier failures; the browser is never leaked because
    /// cookie harvesting errored.
    pub async fn teardown(mut self) -> Option<Vec<CookieRecord>> {
        let harvested = match self.page.get_cookies().await {
            Ok(cookies) => Some(
                cookies
                    .iter()
                    .map(|c| CookieRecord {
                        name: c.name.clone(),
                        value: c.value.clone(),
                        domain: c.domain.clone(),
                        path: c.path.clone(),
                        // CDP reports -1 for session cookies.
                        expires: (c.expires >= 0.0).then_some(c.expires),
                        secure: c.secure,
                        http_only: c.http_only,
                    })
                    .collect(),
            ),
            Err(e) => {
                warn!(error = %e, "cookie harvest failed, keeping previous jar");
                None
            }
        };

        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "browser close failed");
        }
        if let Err(e) = self.browser.wait().await {
            debug!(error = %e, "browser wait after close failed");
        }
        self.handler_task.abort();

        harvested
    }
}
