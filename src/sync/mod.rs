//! Sync orchestrator: drains pending writes, refreshes the cache mirror and
//! schedules itself.

pub mod engine;
pub mod error_log;
pub mod result;
pub mod scheduler;
pub mod status;

use crate::models::EntityKind;
use std::time::Duration;

pub use engine::SyncEngine;
pub use result::{CycleOutcome, SyncCycleResult};
pub use scheduler::AutoSyncHandle;
pub use status::SyncStatusReport;

/// Engine tuning, usually derived from `Config::sync_settings`.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Period of the auto-sync timer.
    pub sync_interval: Duration,
    /// Wait after an offline → online transition before syncing.
    pub reconnect_debounce: Duration,
    /// `limit` passed to `fetch_recent` during refresh.
    pub refresh_limit: usize,
    /// Cap of the recent-errors log.
    pub max_recent_errors: usize,
    /// Kinds covered by a full sync.
    pub kinds: Vec<EntityKind>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            sync_interval: Duration::from_secs(300),
            reconnect_debounce: Duration::from_millis(2000),
            refresh_limit: 50,
            max_recent_errors: 20,
            kinds: EntityKind::ALL.to_vec(),
        }
    }
}
