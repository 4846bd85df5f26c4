//! Ban submission and the periodic ban-list reset.

use serde_json::json;
use tracing::debug;

use crate::error::BanError;
use crate::model::BadPeerBatch;
use crate::session::{Delivery, Session};

const BAN_OPERATION: &str = "transfer.ban_peers";
const BAN_PATH: &str = "api/v2/transfer/banPeers";
const RESET_OPERATION: &str = "app.set_preferences";
const PREFERENCES_PATH: &str = "api/v2/app/setPreferences";

/// Result of one ban submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BanOutcome {
    /// The batch was empty; nothing was sent.
    NothingToBan,
    /// The control API accepted the listed addresses.
    Banned {
        /// Distinct addresses submitted, in first-seen order.
        addresses: Vec<String>,
    },
}

/// Submit every address in `batch` as one ban request.
///
/// Sent at most once per call; the submission is never replayed.
///
/// # Errors
///
/// Returns an error if the request fails, does not answer 200, or answers with
/// a non-empty diagnostic body.
pub async fn ban_peers(session: &Session, batch: &BadPeerBatch) -> Result<BanOutcome, BanError> {
    if batch.is_empty() {
        debug!("no bad peers to ban");
        return Ok(BanOutcome::NothingToBan);
    }

    let peers = batch.ban_list();
    session
        .submit_form(BAN_OPERATION, BAN_PATH, &[("peers", peers.as_str())], Delivery::Once)
        .await
        .map_err(|source| BanError {
            operation: BAN_OPERATION,
            source,
        })?;

    Ok(BanOutcome::Banned {
        addresses: batch.addresses().into_iter().map(str::to_string).collect(),
    })
}

/// Clear the client's banned address list.
///
/// # Errors
///
/// Returns an error if the preferences update fails after retries or is
/// answered with a diagnostic body.
pub async fn clear_banned_ips(session: &Session) -> Result<(), BanError> {
    let preferences = json!({ "banned_IPs": "" }).to_string();
    session
        .submit_form(
            RESET_OPERATION,
            PREFERENCES_PATH,
            &[("json", preferences.as_str())],
            Delivery::Retried,
        )
        .await
        .map_err(|source| BanError {
            operation: RESET_OPERATION,
            source,
        })
}
