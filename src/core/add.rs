use crate::cli::parser::AddRecord;
use crate::db::OfflineStore;
use crate::errors::{AppError, AppResult};
use crate::models::{EventDraft, EventType, LocalId, Payload, SpotDraft, SpotType};
use crate::utils::time::parse_user_datetime;
use tracing::warn;

/// High-level logic for the `add` command.
pub struct AddLogic;

fn non_empty(s: &Option<String>) -> Option<String> {
    s.as_ref()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AddLogic {
    /// Build a typed payload from the CLI arguments.
    pub fn payload_from_args(record: &AddRecord) -> AppResult<Payload> {
        let payload = match record {
            AddRecord::Spot {
                name,
                latitude,
                longitude,
                description,
                address,
                spot_type,
                difficulty,
                features,
            } => {
                let spot_type = match spot_type {
                    Some(code) => Some(SpotType::from_code(code).ok_or_else(|| {
                        AppError::InvalidPayload(format!("unknown spot type '{code}'"))
                    })?),
                    None => None,
                };

                Payload::Spot(SpotDraft {
                    name: name.trim().to_string(),
                    description: non_empty(description),
                    address: non_empty(address),
                    spot_type,
                    difficulty_level: *difficulty,
                    features: features
                        .iter()
                        .map(|f| f.trim().to_string())
                        .filter(|f| !f.is_empty())
                        .collect(),
                    latitude: *latitude,
                    longitude: *longitude,
                })
            }
            AddRecord::Event {
                title,
                event_type,
                start,
                end,
                shop_id,
                description,
                location,
                max_participants,
            } => {
                let event_type = EventType::from_code(event_type).ok_or_else(|| {
                    AppError::InvalidPayload(format!("unknown event type '{event_type}'"))
                })?;
                let end_time = match end {
                    Some(e) => Some(parse_user_datetime(e)?),
                    None => None,
                };

                Payload::Event(EventDraft {
                    title: title.trim().to_string(),
                    description: non_empty(description),
                    event_type,
                    start_time: parse_user_datetime(start)?,
                    end_time,
                    location: non_empty(location),
                    max_participants: *max_participants,
                    shop_id: *shop_id,
                })
            }
        };

        payload.validate()?;
        Ok(payload)
    }

    /// Queue the payload and leave a trace in the internal log.
    pub fn apply(store: &OfflineStore, payload: &Payload) -> AppResult<LocalId> {
        let local_id = store.insert_pending_write(payload)?;

        // audit line is best effort
        if let Err(e) = store.log_operation(
            "add",
            payload.kind().to_db_str(),
            &format!("Queued '{}' as {}", payload.label(), local_id),
        ) {
            warn!(error = %e, "failed to write internal log");
        }

        Ok(local_id)
    }
}
