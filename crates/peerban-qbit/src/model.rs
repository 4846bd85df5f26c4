//! Wire payloads returned by the control API and the cycle-scoped records
//! built from them.

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

/// Torrent states reported by `torrents/info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TorrentState {
    /// Seeding and sending data to at least one peer.
    #[serde(rename = "uploading")]
    Uploading,
    /// Seeding but no peer is currently downloading.
    #[serde(rename = "stalledUP")]
    StalledUp,
    /// Seeding forced past queue limits.
    #[serde(rename = "forcedUP")]
    ForcedUp,
    /// Queued for seeding.
    #[serde(rename = "queuedUP")]
    QueuedUp,
    /// Seeding paused (`stoppedUP` on newer releases).
    #[serde(rename = "pausedUP", alias = "stoppedUP")]
    PausedUp,
    /// Downloading.
    #[serde(rename = "downloading")]
    Downloading,
    /// Download stalled.
    #[serde(rename = "stalledDL")]
    StalledDl,
    /// Fetching metadata.
    #[serde(rename = "metaDL")]
    MetaDl,
    /// Errored.
    #[serde(rename = "error")]
    Error,
    /// Any state this monitor does not act on.
    #[serde(other)]
    Other,
}

/// One entry of the active torrent list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TorrentSummary {
    /// Info hash, stable for the duration of a cycle.
    pub hash: String,
    /// Current torrent state.
    pub state: TorrentState,
}

impl TorrentSummary {
    /// Whether this torrent is currently sending data to its swarm.
    #[must_use]
    pub fn is_uploading(&self) -> bool {
        self.state == TorrentState::Uploading
    }
}

/// `sync/torrentPeers` payload. Only the fields the monitor reads are kept.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TorrentPeers {
    #[serde(default)]
    pub(crate) peers: Option<BTreeMap<String, PeerEntry>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PeerEntry {
    #[serde(default)]
    pub(crate) peer_id_client: Option<String>,
}

/// A peer whose client identifier matched the blocklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerRecord {
    /// Endpoint in `ip:port` form, unique within one swarm snapshot.
    pub address: String,
    /// Info hash of the torrent the peer was seen on.
    pub info_hash: String,
    /// Client identifier reported by the peer.
    pub client_id: String,
}

/// Bad peers collected during one scan cycle, across every uploading torrent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadPeerBatch {
    records: Vec<PeerRecord>,
}

impl BadPeerBatch {
    /// Empty batch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append one record.
    pub fn push(&mut self, record: PeerRecord) {
        self.records.push(record);
    }

    /// Number of records, duplicates included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing matched this cycle.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[PeerRecord] {
        &self.records
    }

    /// Distinct addresses in first-seen order. The same endpoint seen on two
    /// torrents is listed once.
    #[must_use]
    pub fn addresses(&self) -> Vec<&str> {
        let mut seen = HashSet::with_capacity(self.records.len());
        self.records
            .iter()
            .map(|record| record.address.as_str())
            .filter(|address| seen.insert(*address))
            .collect()
    }

    /// Addresses joined with `|`, the format `transfer/banPeers` expects.
    #[must_use]
    pub fn ban_list(&self) -> String {
        self.addresses().join("|")
    }
}

impl Extend<PeerRecord> for BadPeerBatch {
    fn extend<T: IntoIterator<Item = PeerRecord>>(&mut self, iter: T) {
        self.records.extend(iter);
    }
}

impl FromIterator<PeerRecord> for BadPeerBatch {
    fn from_iter<T: IntoIterator<Item = PeerRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(address: &str, hash: &str) -> PeerRecord {
        PeerRecord {
            address: address.to_string(),
            info_hash: hash.to_string(),
            client_id: "-TS0008-".to_string(),
        }
    }

    #[test]
    fn torrent_states_decode_from_wire_names() -> anyhow::Result<()> {
        let torrents: Vec<TorrentSummary> = serde_json::from_str(
            r#"[
                {"hash": "a", "state": "uploading", "name": "ignored"},
                {"hash": "b", "state": "stoppedUP"},
                {"hash": "c", "state": "checkingResumeData"}
            ]"#,
        )?;
        assert!(torrents[0].is_uploading());
        assert_eq!(torrents[1].state, TorrentState::PausedUp);
        assert_eq!(torrents[2].state, TorrentState::Other);
        Ok(())
    }

    #[test]
    fn peers_payload_tolerates_missing_fields() -> anyhow::Result<()> {
        let payload: TorrentPeers = serde_json::from_str(r#"{"rid": 1, "full_update": true}"#)?;
        assert!(payload.peers.is_none());

        let payload: TorrentPeers =
            serde_json::from_str(r#"{"peers": {"1.2.3.4:55": {"client": "x"}}}"#)?;
        let peers = payload.peers.unwrap_or_default();
        assert!(peers["1.2.3.4:55"].peer_id_client.is_none());
        Ok(())
    }

    #[test]
    fn duplicate_addresses_collapse_in_ban_list() {
        let batch: BadPeerBatch = [
            record("1.2.3.4:55", "h1"),
            record("9.9.9.9:1", "h1"),
            record("1.2.3.4:55", "h2"),
        ]
        .into_iter()
        .collect();

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.ban_list(), "1.2.3.4:55|9.9.9.9:1");
    }

    #[test]
    fn large_batch_keeps_first_seen_order() {
        let batch: BadPeerBatch = (0..2_000)
            .map(|i| record(&format!("10.0.{}.{}:6881", (i % 500) / 250, i % 250), "h"))
            .collect();

        let addresses = batch.addresses();
        assert_eq!(addresses.len(), 500);
        assert_eq!(addresses[0], "10.0.0.0:6881");
        assert_eq!(addresses[249], "10.0.0.249:6881");
        assert_eq!(addresses[250], "10.0.1.0:6881");
        assert_eq!(addresses[499], "10.0.1.249:6881");
    }

    #[test]
    fn empty_batch_has_empty_ban_list() {
        let batch = BadPeerBatch::new();
        assert!(batch.is_empty());
        assert_eq!(batch.ban_list(), "");
    }
}
