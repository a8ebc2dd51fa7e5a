//! Client configuration.
//!
//! Loaded from `DBDECK_*` environment variables with defaults that match a
//! backend running locally.

use std::path::PathBuf;
use std::time::Duration;

/// Backend URL used when `DBDECK_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, without trailing `/`.
    pub api_url: String,
    /// Directory holding the persisted session.
    pub home: PathBuf,
    /// Host used when building Neo4j Browser URLs.
    pub browser_host: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Log filter (e.g. `warn`, `dbdeck_core=debug`).
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones.
    pub log_json: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            home: default_home(),
            browser_host: dbdeck_core::registry::DEFAULT_BROWSER_HOST.to_owned(),
            timeout: None,
            log_level: "warn".to_owned(),
            log_json: false,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DBDECK_API_URL` — backend base URL (default: `http://localhost:5000`)
    /// - `DBDECK_HOME` — session directory (default: `$HOME/.dbdeck`)
    /// - `DBDECK_BROWSER_HOST` — host for Neo4j Browser links (default: `localhost`)
    /// - `DBDECK_TIMEOUT_SECS` — request timeout in seconds (default: none)
    /// - `DBDECK_LOG_LEVEL` — log filter (default: `warn`)
    /// - `DBDECK_LOG_FORMAT` — `json` or `text` (default: `text`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from `lookup`, which maps a variable name to
    /// its value. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_url = var("DBDECK_API_URL")
            .map_or(defaults.api_url, |url| url.trim_end_matches('/').to_owned());

        let home = var("DBDECK_HOME").map_or(defaults.home, PathBuf::from);

        let browser_host = var("DBDECK_BROWSER_HOST").unwrap_or(defaults.browser_host);

        let timeout = var("DBDECK_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let log_level = var("DBDECK_LOG_LEVEL").unwrap_or(defaults.log_level);

        let log_json = var("DBDECK_LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json"));

        Self {
            api_url,
            home,
            browser_host,
            timeout,
            log_level,
            log_json,
        }
    }
}

fn default_home() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map_or_else(|| PathBuf::from(".dbdeck"), |h| PathBuf::from(h).join(".dbdeck"))
}
