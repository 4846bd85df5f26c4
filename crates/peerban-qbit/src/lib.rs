#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Client for the qBittorrent Web API surface the peer-ban monitor relies on.
//!
//! Layout:
//! - `retry.rs`: bounded retry executor shared by every idempotent call
//! - `session.rs`: login, cookie-backed session handle, response helpers
//! - `scanner.rs`: active torrent listing filtered to uploading swarms
//! - `inspector.rs`: per-swarm peer inspection and concurrent fan-out
//! - `blocklist.rs`: client identifier predicate
//! - `ban.rs`: ban submission and ban-list reset
//! - `model.rs`: wire payloads and cycle-scoped records

pub mod ban;
pub mod blocklist;
pub mod error;
pub mod inspector;
pub mod model;
pub mod retry;
pub mod scanner;
pub mod session;
#[cfg(test)]
mod testing;

pub use ban::{BanOutcome, ban_peers, clear_banned_ips};
pub use blocklist::Blocklist;
pub use error::{AttemptFailure, AuthError, BanError, InspectError, QbitError, ScanError};
pub use inspector::{SwarmReport, inspect, inspect_swarms};
pub use model::{BadPeerBatch, PeerRecord, TorrentState, TorrentSummary};
pub use retry::RetryPolicy;
pub use scanner::{UploadingTorrents, list_uploading_torrents};
pub use session::{Authenticator, ClientOptions, Credentials, Session};
