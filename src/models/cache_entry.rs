use crate::models::ids::RemoteId;
use crate::models::kind::EntityKind;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Read-only local copy of a server record.
///
/// The payload is kept as the server returned it; the mirror is for display,
/// never written back.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub remote_id: RemoteId,
    pub kind: EntityKind,
    pub payload: Value,
    pub cached_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(kind: EntityKind, remote_id: RemoteId, payload: Value, now: DateTime<Utc>) -> Self {
        Self {
            remote_id,
            kind,
            payload,
            cached_at: now,
            last_accessed: now,
        }
    }

    /// Display title taken from the usual `name` / `title` fields.
    pub fn title(&self) -> String {
        self.payload
            .get("name")
            .or_else(|| self.payload.get("title"))
            .and_then(Value::as_str)
            .unwrap_or("--")
            .to_string()
    }
}
