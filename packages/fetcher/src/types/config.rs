//! Fetch pipeline configuration.
//!
//! Configuration is threaded explicitly through constructors; nothing in the
//! pipeline reads the process environment after construction. The single
//! merge point for environment-provided settings is [`FetchConfig::from_env`].

use std::path::PathBuf;
use std::time::Duration;

use crate::types::credentials::AiCredentials;

/// Configuration for the full fetch pipeline.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Maximum number of fetch attempts before giving up. Default: 3.
    pub max_retries: u32,

    /// Page load timeout for navigation and the first settle tier.
    /// Default: 90 seconds.
    pub page_timeout: Duration,

    /// Post-scroll network-idle wait; a timeout here is non-fatal.
    /// Default: 10 seconds.
    pub settle_timeout: Duration,

    /// Pause between scroll steps while triggering lazy content.
    /// Default: 500 ms.
    pub scroll_pause: Duration,

    /// Hard cap on scroll iterations so pathological infinite-scroll pages
    /// cannot loop forever. Default: 30.
    pub max_scroll_iterations: u32,

    /// Browser viewport, width by height. Default: 1920x1080.
    pub viewport: (u32, u32),

    /// Context locale. Default: `zh-CN`.
    pub locale: String,

    /// Context timezone. Default: `Asia/Shanghai`.
    pub timezone: String,

    /// Network proxy URL; `None` connects directly.
    pub proxy: Option<String>,

    /// Directory holding one cookie jar file per domain. Default: `cookies`.
    pub cookie_dir: PathBuf,

    /// LLM collaborator credentials; `None` disables the AI extraction tier.
    pub ai: Option<AiCredentials>,

    /// Request timeout for LLM calls. Default: 120 seconds.
    pub llm_timeout: Duration,

    /// Explicit Chrome/Chromium executable; `None` lets the browser layer
    /// discover one.
    pub chrome_executable: Option<PathBuf>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            page_timeout: Duration::from_secs(90),
            settle_timeout: Duration::from_secs(10),
            scroll_pause: Duration::from_millis(500),
            max_scroll_iterations: 30,
            viewport: (1920, 1080),
            locale: "zh-CN".to_string(),
            timezone: "Asia/Shanghai".to_string(),
            proxy: None,
            cookie_dir: PathBuf::from("cookies"),
            ai: None,
            llm_timeout: Duration::from_secs(120),
            chrome_executable: None,
        }
    }
}

impl FetchConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from the process environment.
    ///
    /// Reads `ALL_PROXY`/`all_proxy` for the proxy, and `BASE_URL`,
    /// `API_KEY`, `LLM_MODEL` for the AI tier. Missing LLM variables are not
    /// an error; they disable the AI tier.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.proxy = std::env::var("ALL_PROXY")
            .or_else(|_| std::env::var("all_proxy"))
            .ok()
            .filter(|p| !p.is_empty());

        let base_url = std::env::var("BASE_URL").ok().filter(|v| !v.is_empty());
        let api_key = std::env::var("API_KEY").ok().filter(|v| !v.is_empty());
        if let (Some(base_url), Some(api_key)) = (base_url, api_key) {
            let mut creds = AiCredentials::new(base_url, api_key);
            if let Ok(model) = std::env::var("LLM_MODEL") {
                if !model.is_empty() {
                    creds = creds.with_model(model);
                }
            }
            config.ai = Some(creds);
        }

        config
    }

    /// Set the retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the page load timeout.
    pub fn with_page_timeout(mut self, timeout: Duration) -> Self {
        self.page_timeout = timeout;
        self
    }

    /// Set the proxy URL.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set the cookie storage directory.
    pub fn with_cookie_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cookie_dir = dir.into();
        self
    }

    /// Set the AI credentials, enabling the AI extraction tier.
    pub fn with_ai(mut self, credentials: AiCredentials) -> Self {
        self.ai = Some(credentials);
        self
    }

    /// Set the scroll iteration cap.
    pub fn with_max_scroll_iterations(mut self, cap: u32) -> Self {
        self.max_scroll_iterations = cap;
        self
    }

    /// Set an explicit browser executable path.
    pub fn with_chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_executable = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_contract() {
        let config = FetchConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.page_timeout, Duration::from_secs(90));
        assert_eq!(config.settle_timeout, Duration::from_secs(10));
        assert_eq!(config.viewport, (1920, 1080));
        assert_eq!(config.locale, "zh-CN");
        assert!(config.ai.is_none());
    }

    #[test]
    fn test_builder_methods() {
        let config = FetchConfig::new()
            .with_max_retries(5)
            .with_proxy("socks5://127.0.0.1:1080")
            .with_cookie_dir("/tmp/jars")
            .with_max_scroll_iterations(10);

        assert_eq!(config.max_retries, 5);
        assert_eq!(config.proxy.as_deref(), Some("socks5://127.0.0.1:1080"));
        assert_eq!(config.cookie_dir, PathBuf::from("/tmp/jars"));
        assert_eq!(config.max_scroll_iterations, 10);
    }
}
