//! # Design
//!
//! - `QbitError` describes what went wrong on the wire; the per-component
//!   errors (`AuthError`, `ScanError`, `InspectError`, `BanError`) say which
//!   step it broke, so the orchestrator can decide fatal versus recoverable.
//! - Messages stay short and carry the fields needed to diagnose the failure.

use thiserror::Error;

/// Why a single attempt inside the retry executor did not succeed.
#[derive(Debug, Error)]
pub enum AttemptFailure {
    /// The request never produced a response.
    #[error("transport error: {source}")]
    Transport {
        /// Source HTTP client error.
        source: reqwest::Error,
    },
    /// The server answered with a 5xx status.
    #[error("server returned status {status}")]
    ServerStatus {
        /// HTTP status code returned by the server.
        status: u16,
    },
}

/// Wire-level failures talking to the control API.
#[derive(Debug, Error)]
pub enum QbitError {
    /// The shared HTTP client could not be constructed.
    #[error("failed to build http client")]
    ClientBuild {
        /// Source HTTP client error.
        source: reqwest::Error,
    },
    /// An endpoint path could not be resolved against the base URL.
    #[error("invalid endpoint {path}")]
    Endpoint {
        /// Relative endpoint path.
        path: &'static str,
        /// Source URL error.
        source: url::ParseError,
    },
    /// Every attempt allowed by the retry policy failed.
    #[error("{operation} failed after {attempts} attempts: {source}")]
    ExhaustedRetries {
        /// Operation identifier.
        operation: &'static str,
        /// Attempts made.
        attempts: u32,
        /// Failure observed on the last attempt.
        source: AttemptFailure,
    },
    /// A single-shot request failed before a response arrived.
    #[error("{operation} request failed: {source}")]
    Transport {
        /// Operation identifier.
        operation: &'static str,
        /// Source HTTP client error.
        source: reqwest::Error,
    },
    /// The response body could not be read.
    #[error("{operation} response body unreadable")]
    ReadBody {
        /// Operation identifier.
        operation: &'static str,
        /// Source HTTP client error.
        source: reqwest::Error,
    },
    /// The control API refused the session cookie.
    #[error("{operation} rejected the session")]
    Forbidden {
        /// Operation identifier.
        operation: &'static str,
    },
    /// The control API returned a status other than 200.
    #[error("{operation} returned status {status}")]
    UnexpectedStatus {
        /// Operation identifier.
        operation: &'static str,
        /// HTTP status code returned by the server.
        status: u16,
        /// Response body, trimmed.
        body: String,
    },
    /// The response body was not the expected JSON document.
    #[error("{operation} returned an invalid payload")]
    Decode {
        /// Operation identifier.
        operation: &'static str,
        /// Source JSON error.
        source: serde_json::Error,
    },
    /// A submission answered 200 with a non-empty body.
    #[error("{operation} was rejected: {body}")]
    Rejected {
        /// Operation identifier.
        operation: &'static str,
        /// Diagnostic body returned by the control API.
        body: String,
    },
}

/// Login failures. Always terminal.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The login request could not be completed.
    #[error("login request failed")]
    Request {
        /// Source wire error.
        source: QbitError,
    },
    /// The login endpoint answered with a status other than 200.
    #[error("login returned status {status}")]
    UnexpectedStatus {
        /// HTTP status code returned by the server.
        status: u16,
    },
    /// The login endpoint answered 200 without the success marker.
    #[error("login rejected by control api")]
    Rejected {
        /// Body returned instead of the success marker.
        body: String,
    },
}

/// Listing active torrents failed.
#[derive(Debug, Error)]
#[error("failed to list active torrents")]
pub struct ScanError {
    /// Source wire error.
    #[source]
    pub source: QbitError,
}

impl ScanError {
    /// Whether the control API rejected the session cookie, meaning a fresh
    /// login may recover.
    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        matches!(self.source, QbitError::Forbidden { .. })
    }
}

/// Inspecting one torrent's swarm failed. Recoverable.
#[derive(Debug, Error)]
#[error("failed to inspect peers of torrent {hash}")]
pub struct InspectError {
    /// Info hash of the torrent.
    pub hash: String,
    /// Source wire error.
    #[source]
    pub source: QbitError,
}

/// A ban or ban-list reset submission failed. Recoverable.
#[derive(Debug, Error)]
#[error("{operation} submission failed")]
pub struct BanError {
    /// Operation identifier.
    pub operation: &'static str,
    /// Source wire error.
    #[source]
    pub source: QbitError,
}

impl BanError {
    /// Diagnostic body returned by the control API, if the submission was
    /// answered but rejected.
    #[must_use]
    pub fn rejection_body(&self) -> Option<&str> {
        match &self.source {
            QbitError::Rejected { body, .. } => Some(body),
            _ => None,
        }
    }
}
