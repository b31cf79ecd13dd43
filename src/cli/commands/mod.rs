pub mod add;
pub mod auto_sync;
pub mod cache;
pub mod clear;
pub mod config;
pub mod db;
pub mod init;
pub mod list;
pub mod log;
pub mod retry;
pub mod stats;
pub mod status;
pub mod sync;
pub mod watch;

use crate::cli::parser::Cli;
use crate::config::Config;
use crate::connectivity::{ConnectivityMonitor, ManualConnectivity, ProbeConnectivity};
use crate::db::OfflineStore;
use crate::errors::{AppError, AppResult};
use crate::models::{EntityKind, SyncStatus};
use crate::remote::HttpRemoteClient;
use crate::sync::{CycleOutcome, SyncCycleResult, SyncEngine};
use crate::ui::messages::{error, item, success, warning};
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Open the configured store, applying pending migrations.
pub(crate) fn open_store(cfg: &Config) -> AppResult<Arc<OfflineStore>> {
    Ok(Arc::new(OfflineStore::open_initialized(&cfg.database)?))
}

/// Open the configured store without write access.
pub(crate) fn open_store_read_only(cfg: &Config) -> AppResult<OfflineStore> {
    OfflineStore::open_read_only(&cfg.database)
}

/// Single-threaded runtime: cycles run cooperatively, one request in flight.
pub(crate) fn runtime() -> AppResult<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AppError::Io)
}

pub(crate) fn connectivity(cli: &Cli, cfg: &Config) -> AppResult<Arc<dyn ConnectivityMonitor>> {
    if cli.offline {
        return Ok(Arc::new(ManualConnectivity::new(false)));
    }
    let probe = ProbeConnectivity::new(&cfg.health_url(), cfg.request_timeout())
        .map_err(|e| AppError::TransientNetworkError(e.to_string()))?;
    Ok(Arc::new(probe))
}

pub(crate) fn build_engine(
    cfg: &Config,
    store: Arc<OfflineStore>,
    connectivity: Arc<dyn ConnectivityMonitor>,
) -> AppResult<Arc<SyncEngine>> {
    let remote = HttpRemoteClient::new(
        &cfg.api_base_url,
        cfg.api_token.clone(),
        cfg.request_timeout(),
    )?;
    Ok(Arc::new(SyncEngine::new(
        store,
        Arc::new(remote),
        connectivity,
        cfg.sync_settings(),
    )))
}

pub(crate) fn parse_kind(code: &Option<String>) -> AppResult<Option<EntityKind>> {
    match code {
        Some(c) => EntityKind::from_code(c)
            .map(Some)
            .ok_or_else(|| AppError::InvalidKind(c.clone())),
        None => Ok(None),
    }
}

pub(crate) fn parse_status(code: &Option<String>) -> AppResult<Option<SyncStatus>> {
    match code {
        Some(c) => SyncStatus::from_code(c)
            .map(Some)
            .ok_or_else(|| AppError::InvalidStatus(c.clone())),
        None => Ok(None),
    }
}

pub(crate) fn print_cycle_result(result: &SyncCycleResult) {
    match result.outcome {
        CycleOutcome::Completed if result.failed == 0 && result.errors.is_empty() => {
            success(format!("Sync completed: {} synced", result.synced));
        }
        CycleOutcome::Completed => {
            warning(format!(
                "Sync completed with errors: {} synced, {} failed",
                result.synced, result.failed
            ));
        }
        CycleOutcome::NetworkUnavailable => {
            warning("Network unavailable: nothing was sent, pending writes are kept.");
        }
        CycleOutcome::AlreadySyncing => warning("A sync is already running."),
        CycleOutcome::StorageUnavailable => error("Sync aborted: local storage unavailable."),
    }

    for e in &result.errors {
        item(e);
    }
}

/// Store, remote client and connectivity wired into one engine.
pub(crate) fn engine(cli: &Cli, cfg: &Config) -> AppResult<Arc<SyncEngine>> {
    let store = open_store(cfg)?;
    let connectivity = connectivity(cli, cfg)?;
    build_engine(cfg, store, connectivity)
}
