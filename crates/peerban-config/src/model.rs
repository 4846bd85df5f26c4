//! Typed configuration models.

use std::fmt;
use std::time::Duration;

use url::Url;

/// Fully validated monitor configuration.
#[derive(Debug, Clone)]
pub struct PeerbanConfig {
    /// Control API location and credentials.
    pub api: ApiSettings,
    /// Scan and reset cadence.
    pub schedule: ScheduleSettings,
    /// Retry budget for idempotent requests.
    pub retry: RetrySettings,
    /// Upper bound on a single HTTP request.
    pub http_timeout: Duration,
    /// Operator override for the bad client prefixes; `None` keeps the
    /// built-in set.
    pub bad_client_prefixes: Option<Vec<String>>,
}

/// Control API location and login credentials.
#[derive(Clone)]
pub struct ApiSettings {
    /// Base URL, always ending in `/`.
    pub base_url: Url,
    /// Login username.
    pub username: String,
    /// Login password.
    pub password: String,
}

impl fmt::Debug for ApiSettings {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ApiSettings")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Periods for the two background loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSettings {
    /// Time between scan cycles.
    pub scan_interval: Duration,
    /// Time between ban-list resets.
    pub reset_interval: Duration,
}

/// Attempt budget for the retrying executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySettings {
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

/// Logging preferences. Never fails to load; bad input falls back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Normalised level directive.
    pub level: String,
    /// Requested output format, `None` to let the build decide.
    pub format: Option<String>,
    /// Why the defaults were used, reported once logging is installed.
    pub fallback_notice: Option<String>,
}
