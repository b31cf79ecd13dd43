//! SQLite connection handle shared by the store and the sync engine.
//!
//! One connection guarded by a mutex: UI write paths and the orchestrator
//! take turns, and multi-statement work runs inside a transaction while the
//! lock is held, so no reader ever sees half of it.

use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, ErrorCode, OpenFlags, Transaction, TransactionBehavior};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct DbPool {
    conn: Mutex<Connection>,
    path: String,
}

impl DbPool {
    /// Open (creating if needed) the database file.
    ///
    /// Any failure to get a usable database is reported as
    /// `StorageUnavailable`.
    pub fn new(path: &str) -> AppResult<Self> {
        let conn = Connection::open(Path::new(path))
            .map_err(|e| AppError::StorageUnavailable(format!("cannot open '{path}': {e}")))?;

        configure(&conn).map_err(|e| match e {
            AppError::Db(inner) => {
                AppError::StorageUnavailable(format!("cannot use '{path}': {inner}"))
            }
            other => other,
        })?;

        Ok(Self {
            conn: Mutex::new(conn),
            path: path.to_string(),
        })
    }

    /// Open an existing database without write access. Any write through
    /// this handle fails with `StorageUnavailable`.
    pub fn open_read_only(path: &str) -> AppResult<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(Path::new(path), flags)
            .map_err(|e| AppError::StorageUnavailable(format!("cannot open '{path}': {e}")))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| AppError::StorageUnavailable(format!("cannot use '{path}': {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
            path: path.to_string(),
        })
    }

    /// In-memory database, mostly useful for tests and dry runs.
    pub fn in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::StorageUnavailable(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: ":memory:".to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Helper to execute a closure with a mutable connection reference.
    pub fn with_conn<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T>,
    {
        let mut guard = self
            .conn
            .lock()
            .map_err(|_| AppError::StorageUnavailable("connection lock poisoned".into()))?;
        func(&mut guard).map_err(classify)
    }

    /// Run `func` inside an IMMEDIATE transaction; commit on Ok, roll back on Err.
    pub fn with_tx<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> AppResult<T>,
    {
        self.with_conn(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let out = func(&tx)?;
            tx.commit()?;
            Ok(out)
        })
    }
}

fn configure(conn: &Connection) -> AppResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;

    // Touches the file header: a non-database file fails here, not later.
    let _mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(())
}

/// Promote SQLite errors meaning "this file cannot be used" to StorageUnavailable.
fn classify(err: AppError) -> AppError {
    match err {
        AppError::Db(e) if is_unavailable(&e) => AppError::StorageUnavailable(e.to_string()),
        other => other,
    }
}

fn is_unavailable(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(
            ErrorCode::CannotOpen
                | ErrorCode::NotADatabase
                | ErrorCode::DatabaseCorrupt
                | ErrorCode::ReadOnly
                | ErrorCode::SystemIoFailure
                | ErrorCode::DiskFull
        )
    )
}
