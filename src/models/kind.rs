use serde::{Deserialize, Serialize};
use std::fmt;

/// Record families that can be created offline and mirrored from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Spot,
    Event,
}

impl EntityKind {
    /// Every kind the sync engine drains and refreshes, in drain order.
    pub const ALL: [EntityKind; 2] = [EntityKind::Spot, EntityKind::Event];

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EntityKind::Spot => "spot",
            EntityKind::Event => "event",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "spot" => Some(EntityKind::Spot),
            "event" => Some(EntityKind::Event),
            _ => None,
        }
    }

    /// Helper for CLI input: accepts singular/plural, any case.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "spot" | "spots" => Some(EntityKind::Spot),
            "event" | "events" => Some(EntityKind::Event),
            _ => None,
        }
    }

    /// REST collection segment on the remote service.
    pub fn resource(&self) -> &'static str {
        match self {
            EntityKind::Spot => "spots",
            EntityKind::Event => "events",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}
