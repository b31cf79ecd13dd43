//! Unified application error type.
//! Store, sync engine, remote client and CLI all return AppError so that
//! error handling stays consistent across the crate.

use crate::remote::RemoteError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Local storage
    // ---------------------------
    #[error("Local storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Network / remote service
    // ---------------------------
    #[error("Network unavailable")]
    NetworkUnavailable,

    #[error("Rejected by server ({status}): {message}")]
    RemoteRejected { status: u16, message: String },

    #[error("Transient network error: {0}")]
    TransientNetworkError(String),

    #[error("A sync cycle is already running")]
    AlreadySyncing,

    // ---------------------------
    // Parsing / validation errors
    // ---------------------------
    #[error("Payload encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Unsupported payload schema version: {0}")]
    UnsupportedSchema(u32),

    #[error("Invalid record kind: {0}")]
    InvalidKind(String),

    #[error("Invalid sync status: {0}")]
    InvalidStatus(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Fatal errors halt every store operation and must be shown to the user.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::StorageUnavailable(_))
    }
}

impl From<RemoteError> for AppError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Rejected { status, message } => {
                AppError::RemoteRejected { status, message }
            }
            RemoteError::Transient(msg) => AppError::TransientNetworkError(msg),
            RemoteError::Malformed(msg) => {
                AppError::TransientNetworkError(format!("malformed response: {msg}"))
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
