use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleOutcome {
    /// Drain and refresh ran to the end (individual items may have failed).
    Completed,
    /// Offline at cycle start; nothing was touched.
    NetworkUnavailable,
    /// Another cycle holds the lock; nothing was touched.
    AlreadySyncing,
    /// The local store became unusable mid-cycle.
    StorageUnavailable,
}

/// Outcome of one cycle. Cycles never return `Err`; everything lands here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncCycleResult {
    pub success: bool,
    pub synced: usize,
    pub failed: usize,
    pub errors: Vec<String>,
    pub outcome: CycleOutcome,
}

impl SyncCycleResult {
    pub(crate) fn started() -> Self {
        Self {
            success: false,
            synced: 0,
            failed: 0,
            errors: Vec::new(),
            outcome: CycleOutcome::Completed,
        }
    }

    pub fn already_syncing() -> Self {
        Self {
            outcome: CycleOutcome::AlreadySyncing,
            ..Self::started()
        }
    }

    pub fn network_unavailable() -> Self {
        Self {
            errors: vec![crate::errors::AppError::NetworkUnavailable.to_string()],
            outcome: CycleOutcome::NetworkUnavailable,
            ..Self::started()
        }
    }

    pub fn is_already_syncing(&self) -> bool {
        self.outcome == CycleOutcome::AlreadySyncing
    }

    pub fn summary(&self) -> String {
        match self.outcome {
            CycleOutcome::Completed => format!(
                "synced {}, failed {}, errors {}",
                self.synced,
                self.failed,
                self.errors.len()
            ),
            CycleOutcome::NetworkUnavailable => "network unavailable".to_string(),
            CycleOutcome::AlreadySyncing => "already syncing".to_string(),
            CycleOutcome::StorageUnavailable => format!(
                "aborted: storage unavailable (synced {}, failed {})",
                self.synced, self.failed
            ),
        }
    }
}
