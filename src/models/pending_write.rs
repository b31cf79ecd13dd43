use crate::errors::AppResult;
use crate::models::ids::{LocalId, RemoteId};
use crate::models::kind::EntityKind;
use crate::models::payload::Payload;
use crate::models::sync_status::SyncStatus;
use chrono::{DateTime, Utc};

/// A record created on the device that the server has not confirmed yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite {
    pub local_id: LocalId,
    pub kind: EntityKind,
    pub payload: Payload,
    pub created_offline_at: DateTime<Utc>,
    pub sync_status: SyncStatus,
    /// Set once the write reaches `synced`.
    pub remote_id: Option<RemoteId>,
    /// Error recorded by the most recent failed attempt.
    pub last_error: Option<String>,
    pub attempts: u32,
}

impl PendingWrite {
    pub fn is_pending(&self) -> bool {
        self.sync_status == SyncStatus::Pending
    }
}

/// A pending row read as stored, before its payload is decoded.
///
/// The drain snapshot is made of these so that one unreadable row fails on
/// its own instead of failing the whole read.
#[derive(Debug, Clone)]
pub struct QueuedWrite {
    pub id: String,
    pub kind: EntityKind,
    pub raw_payload: String,
    pub created_offline_at: String,
}

impl QueuedWrite {
    pub fn local_id(&self) -> Option<LocalId> {
        LocalId::parse(&self.id)
    }

    pub fn decode(&self) -> AppResult<Payload> {
        Payload::from_db_json(self.kind, &self.raw_payload)
    }
}
