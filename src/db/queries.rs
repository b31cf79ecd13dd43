use crate::errors::{AppError, AppResult};
use crate::models::ids::{LocalId, RemoteId};
use crate::models::kind::EntityKind;
use crate::models::payload::Payload;
use crate::models::pending_write::{PendingWrite, QueuedWrite};
use crate::models::sync_status::SyncStatus;
use crate::utils::time::{parse_db_ts, to_db_ts};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Result, Row, params};

const SELECT_WRITES: &str = "SELECT id, kind, payload, created_offline_at, sync_status,
            remote_id, last_error, attempts
     FROM pending_writes";

fn conversion_err(err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(err))
}

pub fn map_row(row: &Row) -> Result<PendingWrite> {
    let id_str: String = row.get("id")?;
    let local_id = LocalId::parse(&id_str)
        .ok_or_else(|| conversion_err(AppError::Other(format!("Invalid local id: {id_str}"))))?;

    let kind_str: String = row.get("kind")?;
    let kind = EntityKind::from_db_str(&kind_str)
        .ok_or_else(|| conversion_err(AppError::InvalidKind(kind_str.clone())))?;

    let raw_payload: String = row.get("payload")?;
    let payload = Payload::from_db_json(kind, &raw_payload).map_err(conversion_err)?;

    let ts_str: String = row.get("created_offline_at")?;
    let created_offline_at = parse_db_ts(&ts_str).map_err(conversion_err)?;

    let status_str: String = row.get("sync_status")?;
    let sync_status = SyncStatus::from_db_str(&status_str)
        .ok_or_else(|| conversion_err(AppError::InvalidStatus(status_str.clone())))?;

    let remote_id: Option<i64> = row.get("remote_id")?;
    let attempts: i64 = row.get("attempts")?;

    Ok(PendingWrite {
        local_id,
        kind,
        payload,
        created_offline_at,
        sync_status,
        remote_id: remote_id.map(RemoteId::new),
        last_error: row.get("last_error")?,
        attempts: attempts.max(0) as u32,
    })
}

pub fn insert_pending_write(
    conn: &Connection,
    payload: &Payload,
    now: DateTime<Utc>,
) -> AppResult<LocalId> {
    let local_id = LocalId::new();

    conn.execute(
        "INSERT INTO pending_writes (id, kind, payload, created_offline_at, sync_status)
         VALUES (?1, ?2, ?3, ?4, 'pending')",
        params![
            local_id.to_db_string(),
            payload.kind().to_db_str(),
            payload.to_db_json()?,
            to_db_ts(now),
        ],
    )?;

    Ok(local_id)
}

/// Writes filtered by kind and status, FIFO: creation time, then insertion order.
pub fn list_writes(
    conn: &Connection,
    kind: Option<EntityKind>,
    status: Option<SyncStatus>,
) -> AppResult<Vec<PendingWrite>> {
    let mut stmt = conn.prepare_cached(&format!(
        "{SELECT_WRITES}
         WHERE (?1 IS NULL OR kind = ?1)
           AND (?2 IS NULL OR sync_status = ?2)
         ORDER BY created_offline_at ASC, seq ASC"
    ))?;

    let rows = stmt.query_map(
        params![
            kind.map(|k| k.to_db_str()),
            status.map(|s| s.to_db_str())
        ],
        map_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Pending rows of `kind`, FIFO, with payloads left undecoded.
pub fn list_queued(conn: &Connection, kind: EntityKind) -> AppResult<Vec<QueuedWrite>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, payload, created_offline_at
         FROM pending_writes
         WHERE kind = ?1 AND sync_status = 'pending'
         ORDER BY created_offline_at ASC, seq ASC",
    )?;

    let rows = stmt.query_map([kind.to_db_str()], |row| {
        Ok(QueuedWrite {
            id: row.get("id")?,
            kind,
            raw_payload: row.get("payload")?,
            created_offline_at: row.get("created_offline_at")?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_write(conn: &Connection, local_id: &LocalId) -> AppResult<Option<PendingWrite>> {
    let mut stmt = conn.prepare_cached(&format!("{SELECT_WRITES} WHERE id = ?1"))?;
    let mut rows = stmt.query_map([local_id.to_db_string()], map_row)?;
    match rows.next() {
        Some(r) => Ok(Some(r?)),
        None => Ok(None),
    }
}

/// Guarded single-row status update. Returns false when the row does not
/// exist or its current status cannot move to `status`.
pub fn update_sync_status(
    conn: &Connection,
    kind: EntityKind,
    local_id: &LocalId,
    status: SyncStatus,
) -> AppResult<bool> {
    let preds: Vec<&str> = status
        .allowed_predecessors()
        .iter()
        .map(|s| s.to_db_str())
        .collect();

    // At most two predecessors; pad so the statement shape never changes.
    let changed = conn.execute(
        "UPDATE pending_writes
         SET sync_status = ?1
         WHERE id = ?2 AND kind = ?3
           AND sync_status IN (?4, ?5)",
        params![
            status.to_db_str(),
            local_id.to_db_string(),
            kind.to_db_str(),
            preds.first().copied().unwrap_or(""),
            preds.get(1).copied().unwrap_or(""),
        ],
    )?;
    Ok(changed == 1)
}

pub fn mark_synced(
    conn: &Connection,
    kind: EntityKind,
    local_id: &LocalId,
    remote_id: RemoteId,
) -> AppResult<bool> {
    let changed = conn.execute(
        "UPDATE pending_writes
         SET sync_status = 'synced', remote_id = ?1, last_error = NULL,
             attempts = attempts + 1
         WHERE id = ?2 AND kind = ?3 AND sync_status = 'pending'",
        params![remote_id.get(), local_id.to_db_string(), kind.to_db_str()],
    )?;
    Ok(changed == 1)
}

pub fn mark_failed(
    conn: &Connection,
    kind: EntityKind,
    local_id: &LocalId,
    error: &str,
) -> AppResult<bool> {
    let changed = conn.execute(
        "UPDATE pending_writes
         SET sync_status = 'failed', last_error = ?1, attempts = attempts + 1
         WHERE id = ?2 AND kind = ?3 AND sync_status = 'pending'",
        params![error, local_id.to_db_string(), kind.to_db_str()],
    )?;
    Ok(changed == 1)
}

/// failed → pending for every failed row; synced rows are left alone.
pub fn reset_failed(conn: &Connection) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE pending_writes SET sync_status = 'pending' WHERE sync_status = 'failed'",
        [],
    )?;
    Ok(n)
}

pub fn count_by_status(conn: &Connection, status: SyncStatus) -> AppResult<u64> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pending_writes WHERE sync_status = ?1",
        [status.to_db_str()],
        |row| row.get(0),
    )?;
    Ok(n.max(0) as u64)
}
