//! Typed create payloads for records queued offline.
//!
//! Rows are persisted as a versioned envelope:
//!
//! ```json
//! { "schema_version": 1, "kind": "spot", "data": { "name": "...", ... } }
//! ```
//!
//! Rows written before the envelope existed hold the bare `data` object and
//! are read back as schema version 0.

use crate::errors::{AppError, AppResult};
use crate::models::kind::EntityKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpotType {
    Park,
    Street,
    Bowl,
    Vert,
    MiniRamp,
    Plaza,
    Stairs,
}

impl SpotType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().replace('-', "_").as_str() {
            "park" => Some(SpotType::Park),
            "street" => Some(SpotType::Street),
            "bowl" => Some(SpotType::Bowl),
            "vert" => Some(SpotType::Vert),
            "mini_ramp" => Some(SpotType::MiniRamp),
            "plaza" => Some(SpotType::Plaza),
            "stairs" => Some(SpotType::Stairs),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Session,
    Competition,
    Demo,
    Sale,
    Meet,
}

impl EventType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "session" => Some(EventType::Session),
            "competition" => Some(EventType::Competition),
            "demo" => Some(EventType::Demo),
            "sale" => Some(EventType::Sale),
            "meet" => Some(EventType::Meet),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spot_type: Option<SpotType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<u8>,
    #[serde(default)]
    pub features: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub event_type: EventType,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
    pub shop_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Spot(SpotDraft),
    Event(EventDraft),
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    schema_version: u32,
    kind: String,
    data: Value,
}

impl Payload {
    pub fn kind(&self) -> EntityKind {
        match self {
            Payload::Spot(_) => EntityKind::Spot,
            Payload::Event(_) => EntityKind::Event,
        }
    }

    /// Short human label (spot name / event title).
    pub fn label(&self) -> &str {
        match self {
            Payload::Spot(s) => &s.name,
            Payload::Event(e) => &e.title,
        }
    }

    /// Field checks mirroring the server's create schemas, so obviously
    /// invalid records are refused before they are queued.
    pub fn validate(&self) -> AppResult<()> {
        match self {
            Payload::Spot(s) => {
                check_len("name", &s.name, 2, 255)?;
                if !(-90.0..=90.0).contains(&s.latitude) {
                    return Err(AppError::InvalidPayload(format!(
                        "latitude {} out of range [-90, 90]",
                        s.latitude
                    )));
                }
                if !(-180.0..=180.0).contains(&s.longitude) {
                    return Err(AppError::InvalidPayload(format!(
                        "longitude {} out of range [-180, 180]",
                        s.longitude
                    )));
                }
                if let Some(level) = s.difficulty_level
                    && !(1..=5).contains(&level)
                {
                    return Err(AppError::InvalidPayload(format!(
                        "difficulty_level {level} out of range [1, 5]"
                    )));
                }
            }
            Payload::Event(e) => {
                check_len("title", &e.title, 3, 255)?;
                if e.max_participants == Some(0) {
                    return Err(AppError::InvalidPayload(
                        "max_participants must be greater than 0".into(),
                    ));
                }
                if let Some(end) = e.end_time
                    && end < e.start_time
                {
                    return Err(AppError::InvalidPayload(
                        "end_time is before start_time".into(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// JSON body sent to the remote create endpoint.
    pub fn to_request_body(&self) -> AppResult<Value> {
        let body = match self {
            Payload::Spot(s) => serde_json::to_value(s)?,
            Payload::Event(e) => serde_json::to_value(e)?,
        };
        Ok(body)
    }

    /// Encode into the versioned envelope stored in `pending_writes.payload`.
    pub fn to_db_json(&self) -> AppResult<String> {
        let env = Envelope {
            schema_version: CURRENT_SCHEMA_VERSION,
            kind: self.kind().to_db_str().to_string(),
            data: self.to_request_body()?,
        };
        Ok(serde_json::to_string(&env)?)
    }

    /// Decode a stored payload. `row_kind` is the row's `kind` column and is
    /// authoritative for legacy (pre-envelope) rows.
    pub fn from_db_json(row_kind: EntityKind, raw: &str) -> AppResult<Self> {
        let value: Value = serde_json::from_str(raw)?;

        let (version, kind, data) = match value.get("schema_version") {
            Some(_) => {
                let env: Envelope = serde_json::from_value(value)?;
                let kind = EntityKind::from_db_str(&env.kind)
                    .ok_or_else(|| AppError::InvalidKind(env.kind.clone()))?;
                (env.schema_version, kind, env.data)
            }
            None => (0, row_kind, value),
        };

        if version > CURRENT_SCHEMA_VERSION {
            return Err(AppError::UnsupportedSchema(version));
        }
        if kind != row_kind {
            return Err(AppError::InvalidPayload(format!(
                "payload kind '{kind}' does not match row kind '{row_kind}'"
            )));
        }

        let data = upgrade(version, kind, data);

        let payload = match kind {
            EntityKind::Spot => Payload::Spot(serde_json::from_value(data)?),
            EntityKind::Event => Payload::Event(serde_json::from_value(data)?),
        };
        Ok(payload)
    }
}

/// Bring an older payload body up to `CURRENT_SCHEMA_VERSION`.
fn upgrade(version: u32, kind: EntityKind, mut data: Value) -> Value {
    if version == 0 {
        // v0 spots could carry `features` as a single comma separated string.
        if kind == EntityKind::Spot
            && let Some(obj) = data.as_object_mut()
            && let Some(Value::String(list)) = obj.get("features").cloned()
        {
            let items: Vec<Value> = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_string()))
                .collect();
            obj.insert("features".into(), Value::Array(items));
        }
    }
    data
}

fn check_len(field: &str, value: &str, min: usize, max: usize) -> AppResult<()> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(AppError::InvalidPayload(format!(
            "{field} must be between {min} and {max} characters (got {len})"
        )));
    }
    Ok(())
}
