use crate::models::kind::EntityKind;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindStats {
    pub pending: u64,
    pub synced: u64,
    pub failed: u64,
    pub cached: u64,
}

impl KindStats {
    pub fn writes(&self) -> u64 {
        self.pending + self.synced + self.failed
    }
}

/// Row counts of the offline-data tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    pub pending_writes: u64,
    pub cache_entries: u64,
    pub by_kind: BTreeMap<EntityKind, KindStats>,
}

impl StorageStats {
    pub fn is_empty(&self) -> bool {
        self.pending_writes == 0 && self.cache_entries == 0
    }
}
