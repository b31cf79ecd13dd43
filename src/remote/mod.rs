//! Boundary to the remote REST service.
//!
//! The sync engine only depends on [`RemoteService`]; `http` holds the
//! reqwest implementation used by the CLI.

pub mod http;

use crate::models::{EntityKind, Payload, RemoteId};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use http::HttpRemoteClient;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The server refused the record (4xx): not retried automatically.
    #[error("rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Timeout, connection failure or 5xx.
    #[error("transient: {0}")]
    Transient(String),

    /// The server answered but the body could not be understood.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// A server record as returned by a list call.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRecord {
    pub id: RemoteId,
    pub data: Value,
}

impl RemoteRecord {
    /// Pick the `id` out of a JSON object.
    pub fn from_json(data: Value) -> Result<Self, RemoteError> {
        let id = data
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| RemoteError::Malformed("record without integer 'id'".into()))?;
        Ok(Self {
            id: RemoteId::new(id),
            data,
        })
    }
}

/// Remote create/list operations. Implementations bound every call with
/// their own timeout; the engine adds none.
#[async_trait]
pub trait RemoteService: Send + Sync {
    async fn create(&self, kind: EntityKind, payload: &Payload) -> Result<RemoteId, RemoteError>;

    async fn fetch_recent(
        &self,
        kind: EntityKind,
        limit: usize,
    ) -> Result<Vec<RemoteRecord>, RemoteError>;
}
