//! The reconciliation engine.
//!
//! One cycle = connectivity guard → drain → refresh → stamp `last_sync_time`.
//! Only one cycle runs at a time; a request that arrives while a cycle is
//! running returns `AlreadySyncing` without touching anything.

use crate::connectivity::ConnectivityMonitor;
use crate::db::OfflineStore;
use crate::db::settings::{AUTO_SYNC_ENABLED, LAST_SYNC_TIME};
use crate::errors::{AppError, AppResult};
use crate::models::{CacheEntry, EntityKind, LocalId, StorageStats, SyncStatus};
use crate::remote::RemoteService;
use crate::sync::SyncSettings;
use crate::sync::error_log::RecentErrors;
use crate::sync::result::{CycleOutcome, SyncCycleResult};
use crate::sync::status::SyncStatusReport;
use crate::utils::time::{parse_db_ts, to_db_ts};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{Instrument, debug, error, info, info_span, warn};

pub struct SyncEngine {
    store: Arc<OfflineStore>,
    remote: Arc<dyn RemoteService>,
    pub(crate) connectivity: Arc<dyn ConnectivityMonitor>,
    settings: SyncSettings,
    sync_in_progress: AtomicBool,
    recent_errors: Mutex<RecentErrors>,
}

/// Releases the in-progress flag however the cycle ends.
struct InProgressGuard<'a>(&'a AtomicBool);

impl Drop for InProgressGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SyncEngine {
    pub fn new(
        store: Arc<OfflineStore>,
        remote: Arc<dyn RemoteService>,
        connectivity: Arc<dyn ConnectivityMonitor>,
        settings: SyncSettings,
    ) -> Self {
        let recent_errors = Mutex::new(RecentErrors::new(settings.max_recent_errors));
        Self {
            store,
            remote,
            connectivity,
            settings,
            sync_in_progress: AtomicBool::new(false),
            recent_errors,
        }
    }

    pub fn store(&self) -> &Arc<OfflineStore> {
        &self.store
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub fn is_syncing(&self) -> bool {
        self.sync_in_progress.load(Ordering::Acquire)
    }

    // ---------------------------
    // Manual controls
    // ---------------------------

    /// Cycle over every registered kind.
    pub async fn force_full_sync(&self) -> SyncCycleResult {
        let kinds = self.settings.kinds.clone();
        self.run_cycle(&kinds).await
    }

    /// Cycle over a single kind.
    pub async fn force_sync(&self, kind: EntityKind) -> SyncCycleResult {
        self.run_cycle(&[kind]).await
    }

    /// Reset every `failed` write to `pending`. Returns how many were reset.
    pub fn retry_failed(&self) -> AppResult<usize> {
        let n = self.store.reset_failed()?;
        info!(reset = n, "failed writes queued for retry");
        self.audit("retry_failed", "", &format!("{n} failed write(s) reset to pending"));
        Ok(n)
    }

    pub fn set_auto_sync_enabled(&self, enabled: bool) -> AppResult<()> {
        self.store
            .set_setting(AUTO_SYNC_ENABLED, if enabled { "true" } else { "false" })?;
        self.audit(
            "auto_sync",
            "",
            if enabled { "auto-sync enabled" } else { "auto-sync disabled" },
        );
        Ok(())
    }

    /// Defaults to enabled when never set.
    pub fn is_auto_sync_enabled(&self) -> AppResult<bool> {
        let v = self.store.get_setting(AUTO_SYNC_ENABLED, Some("true"))?;
        Ok(v.as_deref() == Some("true"))
    }

    /// Wipe pending writes and the cache mirror (settings survive).
    pub fn clear_offline_data(&self) -> AppResult<()> {
        self.store.clear_all()?;
        self.clear_errors();
        self.audit("clear", "", "offline data cleared");
        Ok(())
    }

    // ---------------------------
    // Reporting
    // ---------------------------

    pub fn recent_errors(&self) -> Vec<String> {
        self.recent_errors
            .lock()
            .map(|log| log.snapshot())
            .unwrap_or_default()
    }

    pub fn clear_errors(&self) {
        if let Ok(mut log) = self.recent_errors.lock() {
            log.clear();
        }
    }

    pub async fn get_sync_status(&self) -> AppResult<SyncStatusReport> {
        let is_online = self.connectivity.current_state().await.is_online;

        let last_sync_time = match self.store.get_setting(LAST_SYNC_TIME, None)? {
            Some(raw) => Some(parse_db_ts(&raw)?),
            None => None,
        };

        Ok(SyncStatusReport {
            is_online,
            last_sync_time,
            pending_count: self.store.count_by_status(SyncStatus::Pending)?,
            failed_count: self.store.count_by_status(SyncStatus::Failed)?,
            synced_count: self.store.count_by_status(SyncStatus::Synced)?,
            sync_in_progress: self.is_syncing(),
            auto_sync_enabled: self.is_auto_sync_enabled()?,
            recent_errors: self.recent_errors(),
        })
    }

    pub fn get_storage_stats(&self) -> AppResult<StorageStats> {
        self.store.storage_stats()
    }

    // ---------------------------
    // Cycle
    // ---------------------------

    /// Run one cycle over `kinds`. Never fails: see `SyncCycleResult`.
    pub async fn run_cycle(&self, kinds: &[EntityKind]) -> SyncCycleResult {
        if self
            .sync_in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("sync requested while a cycle is running");
            return SyncCycleResult::already_syncing();
        }
        let _guard = InProgressGuard(&self.sync_in_progress);

        let label = kinds
            .iter()
            .map(|k| k.to_db_str())
            .collect::<Vec<_>>()
            .join(",");
        let span = info_span!("sync_cycle", kinds = %label);

        let result = self.cycle(kinds).instrument(span).await;

        if let Ok(mut log) = self.recent_errors.lock() {
            log.replace(&result.errors);
        }

        match result.outcome {
            CycleOutcome::Completed => {
                info!(
                    synced = result.synced,
                    failed = result.failed,
                    errors = result.errors.len(),
                    "sync cycle completed"
                );
                self.audit("sync", &label, &result.summary());
            }
            CycleOutcome::NetworkUnavailable => info!("sync skipped: offline"),
            CycleOutcome::StorageUnavailable => error!("sync aborted: storage unavailable"),
            CycleOutcome::AlreadySyncing => {}
        }

        result
    }

    async fn cycle(&self, kinds: &[EntityKind]) -> SyncCycleResult {
        // 1) connectivity guard
        if !self.connectivity.current_state().await.is_online {
            return SyncCycleResult::network_unavailable();
        }

        let mut result = SyncCycleResult::started();

        // 2) drain
        for &kind in kinds {
            if let Err(e) = self.drain_kind(kind, &mut result).await {
                return abort(result, e);
            }
        }

        // 3) refresh
        for &kind in kinds {
            if let Err(e) = self.refresh_kind(kind, &mut result).await {
                return abort(result, e);
            }
        }

        // 4) completion
        if let Err(e) = self
            .store
            .set_setting(LAST_SYNC_TIME, &to_db_ts(Utc::now()))
        {
            if e.is_fatal() {
                return abort(result, e);
            }
            result.errors.push(format!("last sync time: {e}"));
        }

        result.success = true;
        result
    }

    /// Submit the pending writes of `kind` one at a time, oldest first.
    /// Only fatal store errors are returned; everything else is recorded.
    async fn drain_kind(&self, kind: EntityKind, result: &mut SyncCycleResult) -> AppResult<()> {
        // Snapshot: writes queued after this point wait for the next cycle.
        let snapshot = match self.store.pending_snapshot(kind) {
            Ok(s) => s,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(%kind, error = %e, "cannot read pending writes");
                result.errors.push(format!("drain {kind}: {e}"));
                return Ok(());
            }
        };

        debug!(%kind, count = snapshot.len(), "draining");

        for queued in snapshot {
            let Some(local_id) = queued.local_id() else {
                warn!(%kind, id = %queued.id, "pending write with unreadable id");
                result.errors.push(format!("{kind} {}: invalid local id", queued.id));
                continue;
            };

            // A row that no longer decodes fails alone; the rest still go out.
            let payload = match queued.decode() {
                Ok(p) => p,
                Err(err) => {
                    self.fail_write(kind, &local_id, &err, result)?;
                    continue;
                }
            };

            debug!(%kind, id = %local_id, queued_at = %queued.created_offline_at, "submitting");

            match self.remote.create(kind, &payload).await {
                Ok(remote_id) => match self.store.mark_synced(kind, &local_id, remote_id) {
                    Ok(true) => result.synced += 1,
                    // Row cleared or reset while the request was in flight.
                    Ok(false) => warn!(id = %local_id, "write changed during sync"),
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => result.errors.push(format!("{kind} {local_id}: {e}")),
                },
                Err(remote_err) => {
                    self.fail_write(kind, &local_id, &AppError::from(remote_err), result)?;
                }
            }
        }

        Ok(())
    }

    /// Move one write to `failed` and record why.
    fn fail_write(
        &self,
        kind: EntityKind,
        local_id: &LocalId,
        err: &AppError,
        result: &mut SyncCycleResult,
    ) -> AppResult<()> {
        warn!(%kind, id = %local_id, error = %err, "write failed");

        if let Err(e) = self.store.mark_failed(kind, local_id, &err.to_string())
            && e.is_fatal()
        {
            return Err(e);
        }
        result.failed += 1;
        result.errors.push(format!("{kind} {local_id}: {err}"));
        Ok(())
    }

    /// Replace the mirror of `kind` wholesale with a fresh fetch. On fetch
    /// failure the previous mirror stays in place.
    async fn refresh_kind(&self, kind: EntityKind, result: &mut SyncCycleResult) -> AppResult<()> {
        let records = match self
            .remote
            .fetch_recent(kind, self.settings.refresh_limit)
            .await
        {
            Ok(r) => r,
            Err(remote_err) => {
                let err = AppError::from(remote_err);
                warn!(%kind, error = %err, "refresh failed");
                result.errors.push(format!("refresh {kind}: {err}"));
                return Ok(());
            }
        };

        let now = Utc::now();
        let entries: Vec<CacheEntry> = records
            .into_iter()
            .map(|r| CacheEntry::new(kind, r.id, r.data, now))
            .collect();

        match self.store.replace_cache(kind, &entries) {
            Ok(()) => {
                debug!(%kind, entries = entries.len(), "cache mirror replaced");
                Ok(())
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                result.errors.push(format!("refresh {kind}: {e}"));
                Ok(())
            }
        }
    }

    /// Best-effort audit line; a failure here never affects the caller.
    fn audit(&self, operation: &str, target: &str, message: &str) {
        if let Err(e) = self.store.log_operation(operation, target, message) {
            warn!(operation, error = %e, "failed to write internal log");
        }
    }
}

fn abort(mut result: SyncCycleResult, err: AppError) -> SyncCycleResult {
    result.success = false;
    result.outcome = CycleOutcome::StorageUnavailable;
    result.errors.push(err.to_string());
    result
}
