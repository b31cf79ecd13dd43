use chrono::{DateTime, Utc};
use serde::Serialize;

/// Status surface for settings/diagnostics views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatusReport {
    pub is_online: bool,
    pub last_sync_time: Option<DateTime<Utc>>,
    pub pending_count: u64,
    pub failed_count: u64,
    pub synced_count: u64,
    pub sync_in_progress: bool,
    pub auto_sync_enabled: bool,
    pub recent_errors: Vec<String>,
}
