//! Automation-fingerprint masking.
//!
//! Scripts are registered to run before any page script so detection code
//! that probes `navigator` at load time sees ordinary browser values.
//! Injection is best-effort: a site that breaks on injection still gets
//! fetched, just without masking.

use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::Page;
use tracing::debug;

/// Scripts that hide the usual headless-automation tells.
pub const STEALTH_SCRIPTS: &[&str] = &[
    // The single most-probed property.
    "Object.defineProperty(navigator, 'webdriver', { get: () => undefined });",
    // Headless Chrome ships without window.chrome.
    "window.chrome = window.chrome || { runtime: {} };",
    // Permission queries behave oddly under automation.
    "const originalQuery = window.navigator.permissions.query; \
     window.navigator.permissions.query = (parameters) => \
         parameters.name === 'notifications' \
             ? Promise.resolve({ state: Notification.permission }) \
             : originalQuery(parameters);",
    // Empty plugin lists are a headless giveaway.
    "Object.defineProperty(navigator, 'plugins', { get: () => [1, 2, 3, 4, 5] });",
    "Object.defineProperty(navigator, 'languages', { get: () => ['zh-CN', 'zh', 'en'] });",
];

/// Register all stealth scripts on a page. Failures are logged and
/// swallowed; masking never blocks a fetch.
pub async fn apply(page: &Page) {
    for script in STEALTH_SCRIPTS {
        if let Err(e) = page
            .execute(AddScriptToEvaluateOnNewDocumentParams::new(
                script.to_string(),
            ))
            .await
        {
            debug!(error = %e, "stealth script registration skipped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts_cover_known_probes() {
        let joined = STEALTH_SCRIPTS.join("\n");
        assert!(joined.contains("webdriver"));
        assert!(joined.contains("window.chrome"));
        assert!(joined.contains("permissions.query"));
        assert!(joined.contains("plugins"));
        assert!(joined.contains("languages"));
    }
}
