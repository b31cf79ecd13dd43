use crate::errors::{AppError, AppResult};
use crate::models::cache_entry::CacheEntry;
use crate::models::ids::RemoteId;
use crate::models::kind::EntityKind;
use crate::utils::time::{parse_db_ts, to_db_ts};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn map_cache_row(row: &Row) -> Result<CacheEntry> {
    let conv = |e: AppError| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e));

    let kind_str: String = row.get("kind")?;
    let kind = EntityKind::from_db_str(&kind_str)
        .ok_or_else(|| conv(AppError::InvalidKind(kind_str.clone())))?;

    let raw: String = row.get("payload")?;
    let payload = serde_json::from_str(&raw).map_err(|e| conv(AppError::Json(e)))?;

    let cached_at: String = row.get("cached_at")?;
    let last_accessed: String = row.get("last_accessed")?;

    Ok(CacheEntry {
        remote_id: RemoteId::new(row.get("remote_id")?),
        kind,
        payload,
        cached_at: parse_db_ts(&cached_at).map_err(conv)?,
        last_accessed: parse_db_ts(&last_accessed).map_err(conv)?,
    })
}

/// Replace the mirror of one kind. Must run inside a transaction so readers
/// see either the old or the new snapshot.
pub fn replace_cache(conn: &Connection, kind: EntityKind, entries: &[CacheEntry]) -> AppResult<()> {
    conn.execute(
        "DELETE FROM cache_entries WHERE kind = ?1",
        [kind.to_db_str()],
    )?;

    let mut stmt = conn.prepare_cached(
        "INSERT OR REPLACE INTO cache_entries (kind, remote_id, payload, cached_at, last_accessed)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;

    for e in entries {
        if e.kind != kind {
            return Err(AppError::InvalidKind(format!(
                "cache entry {} is a '{}', expected '{}'",
                e.remote_id, e.kind, kind
            )));
        }
        stmt.execute(params![
            kind.to_db_str(),
            e.remote_id.get(),
            serde_json::to_string(&e.payload)?,
            to_db_ts(e.cached_at),
            to_db_ts(e.last_accessed),
        ])?;
    }

    Ok(())
}

pub fn list_cache(conn: &Connection, kind: Option<EntityKind>) -> AppResult<Vec<CacheEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT kind, remote_id, payload, cached_at, last_accessed
         FROM cache_entries
         WHERE (?1 IS NULL OR kind = ?1)
         ORDER BY last_accessed DESC, remote_id DESC",
    )?;

    let rows = stmt.query_map([kind.map(|k| k.to_db_str())], map_cache_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Read one entry and bump its `last_accessed`.
pub fn touch_and_get(
    conn: &Connection,
    kind: EntityKind,
    remote_id: RemoteId,
    now: DateTime<Utc>,
) -> AppResult<Option<CacheEntry>> {
    conn.execute(
        "UPDATE cache_entries SET last_accessed = ?1 WHERE kind = ?2 AND remote_id = ?3",
        params![to_db_ts(now), kind.to_db_str(), remote_id.get()],
    )?;

    let entry = conn
        .query_row(
            "SELECT kind, remote_id, payload, cached_at, last_accessed
             FROM cache_entries WHERE kind = ?1 AND remote_id = ?2",
            params![kind.to_db_str(), remote_id.get()],
            map_cache_row,
        )
        .optional()?;
    Ok(entry)
}
