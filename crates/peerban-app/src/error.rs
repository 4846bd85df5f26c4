//! # Design
//!
//! - Only failures that end the process surface here; recoverable inspection
//!   and ban failures are logged where they happen.
//! - Messages stay constant while the operation label and source carry the
//!   detail.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Fatal application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration was missing or invalid.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: peerban_config::ConfigError,
    },
    /// Logging could not be installed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: peerban_telemetry::TelemetryError,
    },
    /// The control API client could not be built.
    #[error("control api client setup failed")]
    Client {
        /// Operation identifier.
        operation: &'static str,
        /// Source wire error.
        source: peerban_qbit::QbitError,
    },
    /// Login failed, at startup or while renewing the session.
    #[error("authentication failed")]
    Auth {
        /// Operation identifier.
        operation: &'static str,
        /// Source authentication error.
        source: peerban_qbit::AuthError,
    },
    /// The active torrent list could not be read.
    #[error("torrent scan failed")]
    Scan {
        /// Operation identifier.
        operation: &'static str,
        /// Source scan error.
        source: peerban_qbit::ScanError,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: peerban_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: peerban_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn client(operation: &'static str, source: peerban_qbit::QbitError) -> Self {
        Self::Client { operation, source }
    }

    pub(crate) const fn auth(operation: &'static str, source: peerban_qbit::AuthError) -> Self {
        Self::Auth { operation, source }
    }

    pub(crate) const fn scan(operation: &'static str, source: peerban_qbit::ScanError) -> Self {
        Self::Scan { operation, source }
    }

    /// Operation that failed.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Config { operation, .. }
            | Self::Telemetry { operation, .. }
            | Self::Client { operation, .. }
            | Self::Auth { operation, .. }
            | Self::Scan { operation, .. } => *operation,
        }
    }
}
