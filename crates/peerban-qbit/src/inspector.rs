//! Per-swarm peer inspection and the concurrent fan-out across one cycle.
//!
//! # Design
//! - Every uploading torrent is inspected on its own task; the cycle waits for
//!   all of them before returning.
//! - Matches are appended to one lock-guarded batch, so concurrent inspections
//!   never lose a record.
//! - A failed inspection is logged and contributes nothing; the others carry on.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, error};

use crate::blocklist::Blocklist;
use crate::error::InspectError;
use crate::model::{BadPeerBatch, PeerRecord, TorrentPeers, TorrentSummary};
use crate::session::Session;

const OPERATION: &str = "sync.torrent_peers";
const PEERS_PATH: &str = "api/v2/sync/torrentPeers";

/// Outcome of inspecting every uploading swarm in a cycle.
#[derive(Debug, Default)]
pub struct SwarmReport {
    /// Bad peers found across all swarms.
    pub batch: BadPeerBatch,
    /// Swarms inspected successfully.
    pub inspected: usize,
    /// Swarms whose inspection failed.
    pub failed: usize,
}

/// Fetch one torrent's swarm and keep the peers whose client identifier the
/// blocklist rejects.
///
/// # Errors
///
/// Returns an error if the request fails, does not answer 200, or the body is
/// not a peer listing.
pub async fn inspect(
    session: &Session,
    blocklist: &Blocklist,
    hash: &str,
) -> Result<Vec<PeerRecord>, InspectError> {
    let payload: TorrentPeers = session
        .get_json(OPERATION, PEERS_PATH, &[("hash", hash)])
        .await
        .map_err(|source| InspectError {
            hash: hash.to_string(),
            source,
        })?;

    let records = payload
        .peers
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(address, peer)| {
            let client_id = peer.peer_id_client.unwrap_or_default();
            blocklist.matches(&client_id).then(|| PeerRecord {
                address,
                info_hash: hash.to_string(),
                client_id,
            })
        })
        .collect();
    Ok(records)
}

/// Inspect every torrent concurrently and merge the matches into one batch.
///
/// Returns once every inspection has finished or failed.
pub async fn inspect_swarms<I>(
    session: &Session,
    blocklist: &Arc<Blocklist>,
    torrents: I,
) -> SwarmReport
where
    I: IntoIterator<Item = TorrentSummary>,
{
    let batch = Arc::new(Mutex::new(BadPeerBatch::new()));
    let mut tasks = JoinSet::new();

    for torrent in torrents {
        let session = session.clone();
        let blocklist = Arc::clone(blocklist);
        let batch = Arc::clone(&batch);
        tasks.spawn(
            async move {
                match inspect(&session, &blocklist, &torrent.hash).await {
                    Ok(records) => {
                        if !records.is_empty() {
                            debug!(
                                hash = %torrent.hash,
                                matched = records.len(),
                                "bad peers found in swarm"
                            );
                            batch.lock().await.extend(records);
                        }
                        true
                    }
                    Err(err) => {
                        error!(
                            hash = %err.hash,
                            error = %err.source,
                            "failed to inspect torrent peers"
                        );
                        false
                    }
                }
            }
            .in_current_span(),
        );
    }

    let mut report = SwarmReport::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(true) => report.inspected += 1,
            Ok(false) => report.failed += 1,
            Err(err) => {
                report.failed += 1;
                error!(error = %err, "peer inspection task aborted");
            }
        }
    }

    report.batch = std::mem::take(&mut *batch.lock().await);
    report
}
