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
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Binary entrypoint for the peer-ban monitor.

use peerban_app::{AppResult, run_app};

/// Runs the monitor until Ctrl-C or a fatal error.
#[tokio::main]
async fn main() -> AppResult<()> {
    run_app().await
}
