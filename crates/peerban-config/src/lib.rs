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

//! Environment-backed configuration for the peerban monitor.
//!
//! Layout: `model.rs` (typed settings), `validate.rs` (parsing helpers),
//! `loader.rs` (environment lookup), `defaults.rs` (fallback values).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, load_from_env, load_log_settings_from_env};
pub use model::{ApiSettings, LogSettings, PeerbanConfig, RetrySettings, ScheduleSettings};
