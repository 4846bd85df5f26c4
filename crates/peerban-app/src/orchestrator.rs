//! Scan cycle driver.
//!
//! # Design
//! - One cycle lists active torrents, inspects every uploading swarm
//!   concurrently, then submits a single ban for the merged batch.
//! - Cycles never overlap: the next tick is awaited only after the previous
//!   cycle has fully returned.
//! - Only an unreadable torrent list or a failed session renewal is fatal;
//!   inspection and ban failures are logged and the next cycle retries.

use std::sync::Arc;
use std::time::Duration;

use peerban_qbit::{
    Authenticator, BanOutcome, Blocklist, Session, ban_peers, inspect_swarms,
    list_uploading_torrents,
};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::error::{AppError, AppResult};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// How a single scan cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The client reported no active torrents.
    NoActiveTorrents,
    /// Torrents were active but none was uploading.
    NothingUploading {
        /// Active torrents seen.
        active: usize,
    },
    /// Every uploading swarm was clean, or could not be inspected.
    NoBadPeers {
        /// Swarms inspected successfully.
        inspected: usize,
        /// Swarms whose inspection failed.
        failed: usize,
    },
    /// The control API accepted the ban.
    Banned {
        /// Distinct addresses banned, in first-seen order.
        addresses: Vec<String>,
    },
    /// The ban submission failed; the peers will be rediscovered next cycle.
    BanFailed {
        /// Distinct addresses that were not banned.
        pending: usize,
    },
    /// The session had expired and a fresh login succeeded.
    SessionRenewed,
}

/// Drives scan cycles against one authenticated session.
pub struct ScanOrchestrator {
    session: Session,
    authenticator: Authenticator,
    blocklist: Arc<Blocklist>,
    cycle: u64,
}

impl ScanOrchestrator {
    /// Build an orchestrator. `authenticator` is kept for session renewal.
    #[must_use]
    pub const fn new(
        session: Session,
        authenticator: Authenticator,
        blocklist: Arc<Blocklist>,
    ) -> Self {
        Self {
            session,
            authenticator,
            blocklist,
            cycle: 0,
        }
    }

    /// Run cycles forever, one per `period`; the first starts immediately.
    ///
    /// # Errors
    ///
    /// Returns the first fatal cycle error.
    pub async fn run(mut self, period: Duration) -> AppResult<()> {
        let mut ticker = interval(period.max(MIN_PERIOD));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.cycle += 1;
            let span = info_span!("scan_cycle", cycle = self.cycle);
            self.run_cycle().instrument(span).await?;
        }
    }

    /// Run one full scan cycle.
    ///
    /// # Errors
    ///
    /// Returns an error when the torrent list cannot be read, or when the
    /// session expired and renewing it failed.
    pub async fn run_cycle(&mut self) -> AppResult<CycleOutcome> {
        let uploading = match list_uploading_torrents(&self.session).await {
            Ok(uploading) => uploading,
            Err(err) if err.is_session_expired() => return self.renew_session().await,
            Err(err) => return Err(AppError::scan("torrents.list", err)),
        };

        let active = uploading.active_count();
        if active == 0 {
            debug!("no active torrents");
            return Ok(CycleOutcome::NoActiveTorrents);
        }

        let mut uploading = uploading.peekable();
        if uploading.peek().is_none() {
            debug!(active, "no uploading torrents");
            return Ok(CycleOutcome::NothingUploading { active });
        }

        let report = inspect_swarms(&self.session, &self.blocklist, uploading).await;
        info!(
            inspected = report.inspected,
            failed = report.failed,
            bad_peers = report.batch.len(),
            "inspected uploading swarms"
        );

        match ban_peers(&self.session, &report.batch).await {
            Ok(BanOutcome::Banned { addresses }) => {
                info!(
                    count = addresses.len(),
                    peers = ?addresses,
                    "banned bad peers"
                );
                Ok(CycleOutcome::Banned { addresses })
            }
            Ok(BanOutcome::NothingToBan) => Ok(CycleOutcome::NoBadPeers {
                inspected: report.inspected,
                failed: report.failed,
            }),
            Err(err) => {
                error!(
                    operation = err.operation,
                    error = %err.source,
                    body = err.rejection_body(),
                    "failed to ban peers"
                );
                Ok(CycleOutcome::BanFailed {
                    pending: report.batch.addresses().len(),
                })
            }
        }
    }

    async fn renew_session(&mut self) -> AppResult<CycleOutcome> {
        warn!("control api rejected the session, logging in again");
        self.session = self
            .authenticator
            .authenticate()
            .await
            .map_err(|err| AppError::auth("auth.renew", err))?;
        info!("session renewed");
        Ok(CycleOutcome::SessionRenewed)
    }
}
