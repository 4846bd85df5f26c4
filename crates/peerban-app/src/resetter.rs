//! Background task that periodically clears the control API's ban list.
//!
//! Runs independently of the scan cycle and reports only through logs.

use std::time::Duration;

use peerban_config::defaults::MAX_RESET_INTERVAL_SECS;
use peerban_qbit::{Session, clear_banned_ips};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{Instrument, error, info};

const MIN_PERIOD: Duration = Duration::from_millis(1);
const MAX_PERIOD: Duration = Duration::from_secs(MAX_RESET_INTERVAL_SECS);

/// Clear the ban list once, logging the outcome.
///
/// Returns whether the control API accepted the reset.
pub async fn reset_ban_list(session: &Session) -> bool {
    match clear_banned_ips(session).await {
        Ok(()) => {
            info!("cleared banned peer list");
            true
        }
        Err(err) => {
            error!(
                operation = err.operation,
                error = %err.source,
                body = err.rejection_body(),
                "failed to clear banned peer list"
            );
            false
        }
    }
}

/// Spawn the resetter. The first reset fires one `period` from now; failures
/// never stop the timer. `period` is clamped to the range the configuration
/// accepts.
#[must_use]
pub fn spawn_ban_list_resetter(session: Session, period: Duration) -> JoinHandle<()> {
    let period = period.clamp(MIN_PERIOD, MAX_PERIOD);
    tokio::spawn(
        async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                reset_ban_list(&session).await;
            }
        }
        .in_current_span(),
    )
}
