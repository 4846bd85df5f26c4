use std::future::{Future, pending};
use std::sync::Arc;

use peerban_config::{PeerbanConfig, load_from_env, load_log_settings_from_env};
use peerban_qbit::{Authenticator, Blocklist, ClientOptions, Credentials, RetryPolicy};
use peerban_telemetry::{GlobalContextGuard, LogFormat, LoggingConfig, record_app_mode};
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};
use crate::orchestrator::ScanOrchestrator;
use crate::resetter::{reset_ban_list, spawn_ban_list_resetter};

/// Entry point for the monitor: installs logging, loads configuration from
/// the environment, and runs until Ctrl-C.
///
/// # Errors
///
/// Returns an error if logging cannot be installed, configuration is missing
/// or invalid, login fails, or the torrent list becomes unreadable.
pub async fn run_app() -> AppResult<()> {
    let log_settings = load_log_settings_from_env();
    let logging = LoggingConfig {
        level: &log_settings.level,
        format: LogFormat::from_name(log_settings.format.as_deref()),
        ..LoggingConfig::default()
    };
    peerban_telemetry::init_logging(&logging)
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let _context = GlobalContextGuard::new("init");

    if let Some(notice) = &log_settings.fallback_notice {
        info!(notice = %notice, "logging defaults applied");
    }
    info!("peerban starting up");

    let result = match load_from_env() {
        Ok(config) => run_with(config, shutdown_signal()).await,
        Err(err) => Err(AppError::config("config.load", err)),
    };
    if let Err(err) = &result {
        error!(operation = err.operation(), error = ?err, "peerban stopped on fatal error");
    }
    result
}

/// Run the monitor with an explicit configuration until `shutdown` resolves
/// or a fatal error occurs.
///
/// # Errors
///
/// Returns an error if the client cannot be built, login fails, or a scan
/// cycle hits a fatal error.
pub async fn run_with<S>(config: PeerbanConfig, shutdown: S) -> AppResult<()>
where
    S: Future<Output = ()> + Send,
{
    let blocklist = Arc::new(
        config
            .bad_client_prefixes
            .map_or_else(Blocklist::default, Blocklist::with_prefixes),
    );
    info!(
        base_url = %config.api.base_url,
        prefixes = ?blocklist.prefixes(),
        scan_interval_secs = config.schedule.scan_interval.as_secs(),
        reset_interval_secs = config.schedule.reset_interval.as_secs(),
        "configuration loaded"
    );

    let authenticator = Authenticator::new(
        config.api.base_url,
        Credentials {
            username: config.api.username,
            password: config.api.password,
        },
        ClientOptions {
            timeout: config.http_timeout,
            retry: RetryPolicy::new(config.retry.attempts, config.retry.delay),
        },
    )
    .map_err(|err| AppError::client("client.build", err))?;

    record_app_mode("authenticating");
    let session = authenticator
        .authenticate()
        .await
        .map_err(|err| AppError::auth("auth.login", err))?;
    info!("authenticated to control api");

    match session.app_version().await {
        Ok(version) => info!(version = %version, "retrieved control api version"),
        Err(err) => warn!(error = %err, "failed to retrieve control api version"),
    }

    reset_ban_list(&session).await;
    let resetter = spawn_ban_list_resetter(session.clone(), config.schedule.reset_interval);

    record_app_mode("monitoring");
    info!("watching for bad peers");
    let orchestrator = ScanOrchestrator::new(session, authenticator, blocklist);

    let result = tokio::select! {
        result = orchestrator.run(config.schedule.scan_interval) => result,
        () = shutdown => {
            info!("shutdown requested");
            Ok(())
        }
    };

    resetter.abort();
    if let Err(err) = resetter.await
        && !err.is_cancelled()
    {
        warn!(error = %err, "ban list resetter join failed");
    }
    result
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c; running until killed");
        pending::<()>().await;
    }
}
