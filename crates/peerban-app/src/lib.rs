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

//! Peer-ban monitor wiring.
//!
//! Layout: `bootstrap.rs` (startup and shutdown), `orchestrator.rs` (scan
//! cycle), `resetter.rs` (periodic ban-list reset), `error.rs` (fatal errors).

/// Startup sequence and process lifetime.
pub mod bootstrap;
/// Application-level errors.
pub mod error;
/// Scan cycle driver.
pub mod orchestrator;
/// Periodic ban-list reset task.
pub mod resetter;

pub use bootstrap::{run_app, run_with};
pub use error::{AppError, AppResult};
pub use orchestrator::{CycleOutcome, ScanOrchestrator};
pub use resetter::{reset_ban_list, spawn_ban_list_resetter};
