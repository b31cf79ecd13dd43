use crate::errors::{AppError, AppResult};
use crate::utils::time::to_db_ts;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior};
use tracing::info;

/// One schema step. Applied steps are recorded in the `log` table as
/// `operation = 'migration_applied'`, `target = version`.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20260301_0001_offline_tables",
        description: "Created pending_writes, cache_entries and settings tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS pending_writes (
            seq                 INTEGER PRIMARY KEY AUTOINCREMENT,
            id                  TEXT NOT NULL UNIQUE,
            kind                TEXT NOT NULL,
            payload             TEXT NOT NULL,
            created_offline_at  TEXT NOT NULL,
            sync_status         TEXT NOT NULL DEFAULT 'pending'
                                CHECK(sync_status IN ('pending','synced','failed'))
        );

        CREATE INDEX IF NOT EXISTS idx_pending_kind_status
            ON pending_writes(kind, sync_status, created_offline_at);

        CREATE TABLE IF NOT EXISTS cache_entries (
            kind           TEXT NOT NULL,
            remote_id      INTEGER NOT NULL,
            payload        TEXT NOT NULL,
            cached_at      TEXT NOT NULL,
            last_accessed  TEXT NOT NULL,
            PRIMARY KEY (kind, remote_id)
        );

        CREATE INDEX IF NOT EXISTS idx_cache_last_accessed
            ON cache_entries(last_accessed);

        CREATE TABLE IF NOT EXISTS settings (
            key         TEXT PRIMARY KEY,
            value       TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20260412_0002_pending_diagnostics",
        description: "Added remote_id, last_error and attempts to pending_writes",
        sql: r#"
        ALTER TABLE pending_writes ADD COLUMN remote_id INTEGER;
        ALTER TABLE pending_writes ADD COLUMN last_error TEXT;
        ALTER TABLE pending_writes ADD COLUMN attempts INTEGER NOT NULL DEFAULT 0;
        "#,
    },
];

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Versions already recorded in the log, oldest first.
pub fn applied_versions(conn: &Connection) -> AppResult<Vec<String>> {
    ensure_log_table(conn)?;
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
///
/// The whole run holds an IMMEDIATE transaction, so concurrent callers
/// serialize and the second one finds nothing left to do.
pub fn run_pending_migrations(conn: &mut Connection) -> AppResult<usize> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    ensure_log_table(&tx)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(&tx, m.version)? {
            continue;
        }

        tx.execute_batch(m.sql)
            .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

        tx.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (?1, 'migration_applied', ?2, ?3)",
            rusqlite::params![to_db_ts(Utc::now()), m.version, m.description],
        )?;

        info!(version = m.version, "migration applied");
        applied += 1;
    }

    tx.commit()?;
    Ok(applied)
}
