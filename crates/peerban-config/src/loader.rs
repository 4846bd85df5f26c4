//! Environment loading for [`PeerbanConfig`] and [`LogSettings`].
//!
//! # Design
//! - Variables are read through an injected lookup so tests never touch the
//!   process environment.
//! - Blank values are treated exactly like unset ones.

use std::time::Duration;

use url::Url;

use crate::defaults::{
    ENV_BAD_PREFIXES, ENV_BASE_URL, ENV_HTTP_TIMEOUT, ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_PASSWORD,
    ENV_RESET_INTERVAL, ENV_RETRY_ATTEMPTS, ENV_RETRY_DELAY, ENV_SCAN_INTERVAL, ENV_USERNAME,
    HTTP_TIMEOUT_SECS, LOG_LEVEL, MAX_RESET_INTERVAL_SECS, RESET_INTERVAL_SECS, RETRY_ATTEMPTS,
    RETRY_DELAY_SECS, SCAN_INTERVAL_SECS,
};
use crate::error::{ConfigError, ConfigResult};
use crate::model::{ApiSettings, LogSettings, PeerbanConfig, RetrySettings, ScheduleSettings};
use crate::validate::{
    normalize_log_format, normalize_log_level, parse_base_url, parse_bounded, parse_prefixes,
};

/// Reads configuration through a variable lookup function.
pub struct ConfigLoader<F>
where
    F: Fn(&str) -> Option<String>,
{
    lookup: F,
}

impl<F> ConfigLoader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Wrap a lookup function such as `|name| std::env::var(name).ok()`.
    pub const fn new(lookup: F) -> Self {
        Self { lookup }
    }

    fn get(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|value| !value.trim().is_empty())
    }

    fn require(&self, name: &'static str) -> ConfigResult<String> {
        self.get(name).ok_or(ConfigError::MissingEnv { name })
    }

    fn bounded_or(
        &self,
        name: &'static str,
        default: u64,
        range: std::ops::RangeInclusive<u64>,
    ) -> ConfigResult<u64> {
        self.get(name)
            .map_or(Ok(default), |raw| parse_bounded(name, &raw, range))
    }

    /// Load and validate the monitor configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when a required variable is missing or any value fails
    /// validation.
    pub fn load(&self) -> ConfigResult<PeerbanConfig> {
        let base_url: Url = parse_base_url(ENV_BASE_URL, &self.require(ENV_BASE_URL)?)?;
        let username = self.require(ENV_USERNAME)?;
        let password = self.require(ENV_PASSWORD)?;

        let scan_interval = self.bounded_or(ENV_SCAN_INTERVAL, SCAN_INTERVAL_SECS, 1..=3_600)?;
        let reset_interval =
            self.bounded_or(ENV_RESET_INTERVAL, RESET_INTERVAL_SECS, 60..=MAX_RESET_INTERVAL_SECS)?;
        let attempts = self.bounded_or(ENV_RETRY_ATTEMPTS, RETRY_ATTEMPTS, 1..=20)?;
        let delay = self.bounded_or(ENV_RETRY_DELAY, RETRY_DELAY_SECS, 0..=60)?;
        let http_timeout = self.bounded_or(ENV_HTTP_TIMEOUT, HTTP_TIMEOUT_SECS, 1..=300)?;

        let bad_client_prefixes = self
            .get(ENV_BAD_PREFIXES)
            .map(|raw| parse_prefixes(ENV_BAD_PREFIXES, &raw))
            .transpose()?;

        let attempts = u32::try_from(attempts)
            .map_err(|_| ConfigError::invalid(ENV_RETRY_ATTEMPTS, "out_of_range", ""))?;

        Ok(PeerbanConfig {
            api: ApiSettings {
                base_url,
                username,
                password,
            },
            schedule: ScheduleSettings {
                scan_interval: Duration::from_secs(scan_interval),
                reset_interval: Duration::from_secs(reset_interval),
            },
            retry: RetrySettings {
                attempts,
                delay: Duration::from_secs(delay),
            },
            http_timeout: Duration::from_secs(http_timeout),
            bad_client_prefixes,
        })
    }

    /// Resolve logging preferences, falling back to defaults on bad input.
    #[must_use]
    pub fn log_settings(&self) -> LogSettings {
        let mut notices = Vec::new();

        let level = match self.get(ENV_LOG_LEVEL) {
            None => {
                notices.push(format!("log level not set, defaulting to {LOG_LEVEL}"));
                LOG_LEVEL
            }
            Some(raw) => normalize_log_level(&raw).unwrap_or_else(|| {
                notices.push(format!("log level {raw} invalid, defaulting to {LOG_LEVEL}"));
                LOG_LEVEL
            }),
        };

        let format = self.get(ENV_LOG_FORMAT).and_then(|raw| {
            let format = normalize_log_format(&raw);
            if format.is_none() {
                notices.push(format!("log format {raw} invalid, using build default"));
            }
            format
        });

        LogSettings {
            level: level.to_string(),
            format: format.map(str::to_string),
            fallback_notice: (!notices.is_empty()).then(|| notices.join("; ")),
        }
    }
}

/// Load the monitor configuration from the process environment.
///
/// # Errors
///
/// Returns an error when required variables are missing or invalid.
pub fn load_from_env() -> ConfigResult<PeerbanConfig> {
    ConfigLoader::new(|name| std::env::var(name).ok()).load()
}

/// Resolve logging preferences from the process environment.
#[must_use]
pub fn load_log_settings_from_env() -> LogSettings {
    ConfigLoader::new(|name| std::env::var(name).ok()).log_settings()
}
