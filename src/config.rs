//! Provider and pagination settings.
//!
//! [`FetchConfig`] holds the defaults; `SCHEDULE_*` environment variables
//! override them.

use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://api.flightradar24.com";
pub const DEFAULT_PAGE_SIZE: u32 = 100;

// The provider rejects requests carrying reqwest's default agent.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X x.y; rv:42.0) Gecko/20100101 Firefox/42.0";

/// Settings for the schedule provider and the pagination loop.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub base_url: String,
    pub page_size: u32,
    /// Deadline applied to each page request.
    pub page_timeout: Duration,
    /// Wall-clock budget for one complete `fetch` call.
    pub fetch_budget: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            page_timeout: Duration::from_secs(30),
            fetch_budget: Duration::from_secs(300),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    /// Builds the config from `SCHEDULE_*` environment variables.
    ///
    /// Unset variables keep their default. Unparseable ones are logged and
    /// also fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let secs = |key: &str, fallback: Duration| {
            parse_or(&lookup, key, fallback.as_secs()).map_or(fallback, Duration::from_secs)
        };

        Self {
            base_url: lookup("SCHEDULE_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            page_size: parse_or(&lookup, "SCHEDULE_PAGE_SIZE", defaults.page_size)
                .filter(|size| *size > 0)
                .unwrap_or(defaults.page_size),
            page_timeout: secs("SCHEDULE_PAGE_TIMEOUT_SECS", defaults.page_timeout),
            fetch_budget: secs("SCHEDULE_FETCH_BUDGET_SECS", defaults.fetch_budget),
            user_agent: lookup("SCHEDULE_USER_AGENT").unwrap_or(defaults.user_agent),
        }
    }
}

fn parse_or<T: FromStr + Copy>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    fallback: T,
) -> Option<T> {
    match lookup(key) {
        None => Some(fallback),
        Some(raw) => match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(key, value = %raw, "Ignoring unparseable setting, using default");
                None
            }
        },
    }
}
