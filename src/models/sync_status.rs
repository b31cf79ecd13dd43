use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Pending,
    Synced,
    Failed,
}

impl SyncStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SyncStatus::Pending => "pending",
            SyncStatus::Synced => "synced",
            SyncStatus::Failed => "failed",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(SyncStatus::Pending),
            "synced" => Some(SyncStatus::Synced),
            "failed" => Some(SyncStatus::Failed),
            _ => None,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::from_db_str(&code.trim().to_lowercase())
    }

    /// Statuses a row must currently hold to move into `self`.
    ///
    /// - pending → synced | failed
    /// - failed  → pending (explicit retry only)
    /// - synced is terminal
    pub fn allowed_predecessors(&self) -> &'static [SyncStatus] {
        match self {
            SyncStatus::Synced | SyncStatus::Failed => &[SyncStatus::Pending],
            SyncStatus::Pending => &[SyncStatus::Failed],
        }
    }

    pub fn can_transition_to(&self, next: SyncStatus) -> bool {
        next.allowed_predecessors().contains(self)
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}
