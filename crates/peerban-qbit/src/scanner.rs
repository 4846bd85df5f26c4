//! Active torrent listing, narrowed to swarms we are uploading to.

use std::vec;

use crate::error::ScanError;
use crate::model::TorrentSummary;
use crate::session::Session;

const OPERATION: &str = "torrents.info";
const TORRENTS_PATH: &str = "api/v2/torrents/info";

/// Single-pass iterator over the uploading torrents of one listing.
#[derive(Debug)]
pub struct UploadingTorrents {
    active: usize,
    torrents: vec::IntoIter<TorrentSummary>,
}

impl UploadingTorrents {
    /// Number of active torrents in the listing, uploading or not.
    #[must_use]
    pub const fn active_count(&self) -> usize {
        self.active
    }
}

impl Iterator for UploadingTorrents {
    type Item = TorrentSummary;

    fn next(&mut self) -> Option<Self::Item> {
        self.torrents.find(TorrentSummary::is_uploading)
    }
}

impl From<Vec<TorrentSummary>> for UploadingTorrents {
    fn from(torrents: Vec<TorrentSummary>) -> Self {
        Self {
            active: torrents.len(),
            torrents: torrents.into_iter(),
        }
    }
}

/// List active torrents and yield the ones in the uploading state.
///
/// An empty listing is not an error.
///
/// # Errors
///
/// Returns an error if the request fails, the session is refused, or the body
/// is not a torrent list.
pub async fn list_uploading_torrents(session: &Session) -> Result<UploadingTorrents, ScanError> {
    let torrents: Vec<TorrentSummary> = session
        .get_json(OPERATION, TORRENTS_PATH, &[("filter", "active")])
        .await
        .map_err(|source| ScanError { source })?;
    Ok(UploadingTorrents::from(torrents))
}
