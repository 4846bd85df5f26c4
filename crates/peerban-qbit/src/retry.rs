//! Bounded retry executor for idempotent control API requests.

use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use tokio::time::sleep;
use tracing::debug;

use crate::error::{AttemptFailure, QbitError};

/// Attempt budget and fixed inter-attempt delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub attempts: u32,
    /// Delay slept between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Build a policy from an attempt count and delay.
    #[must_use]
    pub const fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// Send the request produced by `build` until the transport succeeds with a
    /// status below 500, or the attempt budget runs out.
    ///
    /// `build` is invoked once per attempt because a sent request cannot be
    /// replayed.
    ///
    /// # Errors
    ///
    /// Returns [`QbitError::ExhaustedRetries`] carrying the last failure.
    pub async fn execute<F>(&self, operation: &'static str, build: F) -> Result<Response, QbitError>
    where
        F: Fn() -> RequestBuilder,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;
        loop {
            let failure = match build().send().await {
                Ok(response) if response.status().is_server_error() => {
                    AttemptFailure::ServerStatus {
                        status: response.status().as_u16(),
                    }
                }
                Ok(response) => return Ok(response),
                Err(source) => AttemptFailure::Transport { source },
            };

            debug!(
                operation,
                attempt,
                attempts,
                error = %failure,
                "control api request attempt failed"
            );
            if attempt >= attempts {
                return Err(QbitError::ExhaustedRetries {
                    operation,
                    attempts,
                    source: failure,
                });
            }
            attempt += 1;
            sleep(self.delay).await;
        }
    }
}
