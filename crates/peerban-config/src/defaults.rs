//! Default values and environment variable names.
//!
//! # Design
//! - Keep every variable name in one place so the loader and docs agree.
//! - Defaults match the cadence the monitor was tuned for against qBittorrent.

/// Control API base URL.
pub const ENV_BASE_URL: &str = "QBIT_BASE_URL";
/// Control API login username.
pub const ENV_USERNAME: &str = "QBIT_USERNAME";
/// Control API login password.
pub const ENV_PASSWORD: &str = "QBIT_PASSWORD";
/// Seconds between scan cycles.
pub const ENV_SCAN_INTERVAL: &str = "PEERBAN_SCAN_INTERVAL_SECS";
/// Seconds between ban-list resets.
pub const ENV_RESET_INTERVAL: &str = "PEERBAN_RESET_INTERVAL_SECS";
/// Attempts made by the retrying executor.
pub const ENV_RETRY_ATTEMPTS: &str = "PEERBAN_RETRY_ATTEMPTS";
/// Seconds slept between executor attempts.
pub const ENV_RETRY_DELAY: &str = "PEERBAN_RETRY_DELAY_SECS";
/// Per-request HTTP timeout in seconds.
pub const ENV_HTTP_TIMEOUT: &str = "PEERBAN_HTTP_TIMEOUT_SECS";
/// Comma-separated client identifier prefixes to ban.
pub const ENV_BAD_PREFIXES: &str = "PEERBAN_BAD_CLIENT_PREFIXES";
/// Log level override.
pub const ENV_LOG_LEVEL: &str = "PEERBAN_LOG_LEVEL";
/// Log format override (`json` or `pretty`).
pub const ENV_LOG_FORMAT: &str = "PEERBAN_LOG_FORMAT";

/// Default scan period.
pub const SCAN_INTERVAL_SECS: u64 = 10;
/// Default ban-list reset period (six hours).
pub const RESET_INTERVAL_SECS: u64 = 6 * 60 * 60;
/// Longest accepted ban-list reset period (one week).
pub const MAX_RESET_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;
/// Default attempt budget for idempotent requests.
pub const RETRY_ATTEMPTS: u64 = 5;
/// Default delay between attempts.
pub const RETRY_DELAY_SECS: u64 = 2;
/// Default per-request timeout.
pub const HTTP_TIMEOUT_SECS: u64 = 10;
/// Default log level.
pub const LOG_LEVEL: &str = "info";
