//! Cookie persistence across browser sessions.
//!
//! Cookies are stored per target domain as JSON files so repeated fetches
//! against the same site reuse whatever session state earlier visits earned
//! (consent banners dismissed, soft logins, anti-bot clearance cookies).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

use crate::error::SessionResult;

/// A persisted cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    /// Expiry as seconds since the epoch; `None` for session cookies.
    #[serde(default)]
    pub expires: Option<f64>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
}

/// File-backed cookie store, one JSON file per domain key.
#[derive(Debug, Clone)]
pub struct CookieStore {
    dir: PathBuf,
}

impl CookieStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Derive the storage key for a URL: its host with every run of
    /// non-word characters replaced by an underscore.
    pub fn domain_key(url: &Url) -> Option<String> {
        let host = url.host_str()?;
        let sanitizer = Regex::new(r"\W+").unwrap();
        Some(sanitizer.replace_all(host, "_").to_string())
    }

    fn file_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Load cookies for a domain key. A missing file is an empty session,
    /// not an error.
    pub fn load(&self, key: &str) -> SessionResult<Vec<CookieRecord>> {
        let path = self.file_for(key);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&path)?;
        let records: Vec<CookieRecord> = serde_json::from_str(&raw)?;
        debug!(key = %key, count = records.len(), "loaded cookies");
        Ok(records)
    }

    /// Persist cookies for a domain key, creating the store directory on
    /// first use.
    pub fn save(&self, key: &str, records: &[CookieRecord]) -> SessionResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(records)?;
        std::fs::write(self.file_for(key), json)?;
        debug!(key = %key, count = records.len(), "saved cookies");
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_key_sanitizes_host() {
        let url = Url::parse("https://news.example.co.uk/article?id=1").unwrap();
        assert_eq!(
            CookieStore::domain_key(&url).unwrap(),
            "news_example_co_uk"
        );
    }

    #[test]
    fn test_domain_key_none_without_host() {
        let url = Url::parse("data:text/plain,hello").unwrap();
        assert!(CookieStore::domain_key(&url).is_none());
    }

    #[test]
    fn test_missing_file_is_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = CookieStore::new(dir.path());
        assert!(store.load("nonexistent_example_com").unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CookieStore::new(dir.path().join("cookies"));

        let records = vec![CookieRecord {
            name: "session".to_string(),
            value: "abc123".to_string(),
            domain: ".example.com".to_string(),
            path: "/".to_string(),
            expires: Some(1_900_000_000.0),
            secure: true,
            http_only: true,
        }];

        store.save("example_com", &records).unwrap();
        let loaded = store.load("example_com").unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "session");
        assert_eq!(loaded[0].expires, Some(1_900_000_000.0));
        assert!(loaded[0].secure);
    }

    #[test]
    fn test_save_is_last_writer_wins_including_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CookieStore::new(dir.path());

        let records = vec![CookieRecord {
            name: "session".to_string(),
            value: "abc123".to_string(),
            domain: ".example.com".to_string(),
            path: "/".to_string(),
            expires: None,
            secure: false,
            http_only: false,
        }];
        store.save("example_com", &records).unwrap();
        assert_eq!(store.load("example_com").unwrap().len(), 1);

        // A site that cleared its cookies must not leave a stale jar.
        store.save("example_com", &[]).unwrap();
        assert!(store.load("example_com").unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = CookieStore::new(dir.path());
        std::fs::write(dir.path().join("bad_key.json"), "not json").unwrap();
        assert!(store.load("bad_key").is_err());
    }
}
