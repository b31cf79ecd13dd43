//! Local and remote identifiers live in separate id spaces.
//! A `LocalId` is minted on the device when a record is queued; a `RemoteId`
//! is assigned by the server once the record is accepted. Neither converts
//! into the other.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const LOCAL_PREFIX: &str = "local-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalId(Uuid);

impl LocalId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse either the bare UUID (DB form) or the `local-` display form.
    pub fn parse(s: &str) -> Option<Self> {
        let raw = s.strip_prefix(LOCAL_PREFIX).unwrap_or(s);
        Uuid::parse_str(raw).ok().map(Self)
    }

    pub fn to_db_string(&self) -> String {
        self.0.to_string()
    }
}

impl Default for LocalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{LOCAL_PREFIX}{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteId(i64);

impl RemoteId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
