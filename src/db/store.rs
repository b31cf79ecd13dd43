//! Local persistent store: pending writes, the cache mirror and settings.
//!
//! Low-level, atomic primitives only. Deciding *when* a status changes or the
//! mirror is replaced belongs to the sync engine.

use crate::db::pool::DbPool;
use crate::db::{cache, log, migrate, queries, settings, stats};
use crate::errors::AppResult;
use crate::models::{
    CacheEntry, EntityKind, LocalId, Payload, PendingWrite, QueuedWrite, RemoteId, StorageStats,
    SyncStatus,
};
use chrono::Utc;

pub struct OfflineStore {
    pool: DbPool,
}

impl OfflineStore {
    /// Open the database file. Fails with `StorageUnavailable` when the file
    /// cannot be opened or is not a database.
    pub fn open(path: &str) -> AppResult<Self> {
        Ok(Self {
            pool: DbPool::new(path)?,
        })
    }

    /// Open an already initialized database for inspection only.
    pub fn open_read_only(path: &str) -> AppResult<Self> {
        Ok(Self {
            pool: DbPool::open_read_only(path)?,
        })
    }

    /// Open and run migrations in one go.
    pub fn open_initialized(path: &str) -> AppResult<Self> {
        let store = Self::open(path)?;
        store.initialize()?;
        Ok(store)
    }

    pub fn in_memory() -> AppResult<Self> {
        let store = Self {
            pool: DbPool::in_memory()?,
        };
        store.initialize()?;
        Ok(store)
    }

    pub fn path(&self) -> &str {
        self.pool.path()
    }

    /// Create the schema if absent. Safe to call repeatedly, also from
    /// several processes at once.
    pub fn initialize(&self) -> AppResult<()> {
        self.migrate().map(|_| ())
    }

    /// Apply pending migrations, returning how many ran.
    pub fn migrate(&self) -> AppResult<usize> {
        self.pool.with_conn(|conn| migrate::run_pending_migrations(conn))
    }

    // ---------------------------
    // Pending writes
    // ---------------------------

    /// Queue a record created offline. Validates the payload first.
    pub fn insert_pending_write(&self, payload: &Payload) -> AppResult<LocalId> {
        payload.validate()?;
        self.pool
            .with_conn(|conn| queries::insert_pending_write(conn, payload, Utc::now()))
    }

    /// Writes still waiting for the server, FIFO retry order.
    pub fn list_pending_writes(&self, kind: Option<EntityKind>) -> AppResult<Vec<PendingWrite>> {
        self.list_writes(kind, Some(SyncStatus::Pending))
    }

    /// Every write, whatever its status.
    pub fn list_writes(
        &self,
        kind: Option<EntityKind>,
        status: Option<SyncStatus>,
    ) -> AppResult<Vec<PendingWrite>> {
        self.pool
            .with_conn(|conn| queries::list_writes(conn, kind, status))
    }

    /// Pending writes of `kind` with raw payloads, as the drain reads them.
    pub fn pending_snapshot(&self, kind: EntityKind) -> AppResult<Vec<QueuedWrite>> {
        self.pool.with_conn(|conn| queries::list_queued(conn, kind))
    }

    pub fn get_write(&self, local_id: &LocalId) -> AppResult<Option<PendingWrite>> {
        self.pool.with_conn(|conn| queries::find_write(conn, local_id))
    }

    /// Returns `false` when the row is missing or the transition is not allowed.
    pub fn update_sync_status(
        &self,
        kind: EntityKind,
        local_id: &LocalId,
        status: SyncStatus,
    ) -> AppResult<bool> {
        self.pool
            .with_conn(|conn| queries::update_sync_status(conn, kind, local_id, status))
    }

    pub fn mark_synced(
        &self,
        kind: EntityKind,
        local_id: &LocalId,
        remote_id: RemoteId,
    ) -> AppResult<bool> {
        self.pool
            .with_conn(|conn| queries::mark_synced(conn, kind, local_id, remote_id))
    }

    pub fn mark_failed(
        &self,
        kind: EntityKind,
        local_id: &LocalId,
        error: &str,
    ) -> AppResult<bool> {
        self.pool
            .with_conn(|conn| queries::mark_failed(conn, kind, local_id, error))
    }

    pub fn reset_failed(&self) -> AppResult<usize> {
        self.pool.with_conn(|conn| queries::reset_failed(conn))
    }

    pub fn count_by_status(&self, status: SyncStatus) -> AppResult<u64> {
        self.pool
            .with_conn(|conn| queries::count_by_status(conn, status))
    }

    // ---------------------------
    // Cache mirror
    // ---------------------------

    /// Swap the mirror of `kind` for `entries` in a single transaction.
    pub fn replace_cache(&self, kind: EntityKind, entries: &[CacheEntry]) -> AppResult<()> {
        self.pool
            .with_tx(|tx| cache::replace_cache(tx, kind, entries))
    }

    /// Mirror entries, most recently accessed first.
    pub fn list_cache(&self, kind: Option<EntityKind>) -> AppResult<Vec<CacheEntry>> {
        self.pool.with_conn(|conn| cache::list_cache(conn, kind))
    }

    pub fn get_cached(
        &self,
        kind: EntityKind,
        remote_id: RemoteId,
    ) -> AppResult<Option<CacheEntry>> {
        self.pool
            .with_tx(|tx| cache::touch_and_get(tx, kind, remote_id, Utc::now()))
    }

    // ---------------------------
    // Settings
    // ---------------------------

    pub fn get_setting(&self, key: &str, default: Option<&str>) -> AppResult<Option<String>> {
        let value = self.pool.with_conn(|conn| settings::get_setting(conn, key))?;
        Ok(value.or_else(|| default.map(str::to_string)))
    }

    pub fn set_setting(&self, key: &str, value: &str) -> AppResult<()> {
        self.pool
            .with_conn(|conn| settings::set_setting(conn, key, value, Utc::now()))
    }

    // ---------------------------
    // Maintenance
    // ---------------------------

    /// Wipe pending writes and the cache mirror. Settings are kept.
    pub fn clear_all(&self) -> AppResult<()> {
        self.pool.with_tx(|tx| {
            tx.execute("DELETE FROM pending_writes", [])?;
            tx.execute("DELETE FROM cache_entries", [])?;
            Ok(())
        })
    }

    pub fn storage_stats(&self) -> AppResult<StorageStats> {
        self.pool.with_conn(|conn| stats::storage_stats(conn))
    }

    /// Append a line to the internal audit log.
    pub fn log_operation(&self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        self.pool
            .with_conn(|conn| log::ttlog(conn, operation, target, message))
    }

    pub fn load_log(&self) -> AppResult<Vec<log::LogRow>> {
        self.pool.with_conn(|conn| log::load_log(conn))
    }

    pub fn integrity_check(&self) -> AppResult<String> {
        self.pool.with_conn(|conn| {
            let res: String = conn.query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;
            Ok(res)
        })
    }

    pub fn vacuum(&self) -> AppResult<()> {
        self.pool.with_conn(|conn| {
            conn.execute_batch("VACUUM;")?;
            Ok(())
        })
    }

    pub fn print_info(&self) -> AppResult<()> {
        let path = self.pool.path().to_string();
        self.pool.with_conn(|conn| stats::print_db_info(conn, &path))
    }
}
