//! Client configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`), with defaults matching the web front end's behavior.

use std::time::Duration;

use crate::domain::{DEFAULT_MAX_VISIBLE, PageSizes};
use crate::error::ClientError;
use crate::service::RetryPolicy;

/// Top-level client configuration.
///
/// Loaded once at startup via [`ClientConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend REST API (e.g. `https://api.example.com`).
    pub api_base_url: String,

    /// Per-request timeout applied to the HTTP client.
    pub request_timeout: Duration,

    /// Quiet period before a search keystroke triggers a fetch.
    pub search_debounce: Duration,

    /// Allowed page sizes; the first entry matching `DEFAULT_PAGE_SIZE`
    /// is the initial one.
    pub page_sizes: PageSizes,

    /// Number of page buttons in the pagination window.
    pub pagination_max_visible: u32,

    /// HTTP status that triggers the maintenance probe.
    pub maintenance_status: u16,

    /// JSON endpoint reporting maintenance mode, if any.
    pub maintenance_probe_url: Option<String>,

    /// Automatic retries for the comment feed.
    pub comment_retry_max: u32,

    /// Base delay of the comment feed's linear backoff.
    pub comment_retry_base: Duration,

    /// Capacity of the event bus broadcast channel.
    pub event_bus_capacity: usize,
}

impl ClientConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set or unparseable.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if `PAGE_SIZE_OPTIONS` yields no
    /// usable page size or `DEFAULT_PAGE_SIZE` is not one of them.
    pub fn from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();

        let api_base_url = std::env::var("API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string())
            .trim_end_matches('/')
            .to_string();

        let options = std::env::var("PAGE_SIZE_OPTIONS").unwrap_or_else(|_| "10,20,50".to_string());
        let options: Vec<u32> = options
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        let default_size = parse_env("DEFAULT_PAGE_SIZE", 10);
        let page_sizes = PageSizes::new(options, default_size)?;

        Ok(Self {
            api_base_url,
            request_timeout: Duration::from_secs(parse_env("API_TIMEOUT_SECS", 30)),
            search_debounce: Duration::from_millis(parse_env("SEARCH_DEBOUNCE_MS", 500)),
            page_sizes,
            pagination_max_visible: parse_env("PAGINATION_MAX_VISIBLE", DEFAULT_MAX_VISIBLE),
            maintenance_status: parse_env("MAINTENANCE_STATUS", 503),
            maintenance_probe_url: std::env::var("MAINTENANCE_PROBE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            comment_retry_max: parse_env("COMMENT_RETRY_MAX", 3),
            comment_retry_base: Duration::from_millis(parse_env("COMMENT_RETRY_BASE_MS", 1000)),
            event_bus_capacity: parse_env("EVENT_BUS_CAPACITY", 1024),
        })
    }

    /// Retry policy for the comment feed.
    #[must_use]
    pub fn comment_retry(&self) -> RetryPolicy {
        RetryPolicy::linear(self.comment_retry_max, self.comment_retry_base)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            request_timeout: Duration::from_secs(30),
            search_debounce: Duration::from_millis(500),
            page_sizes: PageSizes::default(),
            pagination_max_visible: DEFAULT_MAX_VISIBLE,
            maintenance_status: 503,
            maintenance_probe_url: None,
            comment_retry_max: 3,
            comment_retry_base: Duration::from_millis(1000),
            event_bus_capacity: 1024,
        }
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
