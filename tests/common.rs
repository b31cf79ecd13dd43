#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::json;
use skatesync::models::{
    EntityKind, EventDraft, EventType, Payload, RemoteId, SpotDraft, SpotType,
};
use skatesync::remote::{RemoteError, RemoteRecord, RemoteService};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn sks() -> Command {
    cargo_bin_cmd!("skatesync")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_skatesync.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    fs::remove_file(format!("{db_path}-wal")).ok();
    fs::remove_file(format!("{db_path}-shm")).ok();
    db_path
}

/// Initialize the DB through the CLI (test mode: no config file is written)
pub fn init_db(db_path: &str) {
    sks()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

pub fn spot(name: &str) -> Payload {
    Payload::Spot(SpotDraft {
        name: name.to_string(),
        description: None,
        address: Some("Via Roma 1".to_string()),
        spot_type: Some(SpotType::Plaza),
        difficulty_level: Some(3),
        features: vec!["ledges".to_string(), "rails".to_string()],
        latitude: 45.4642,
        longitude: 9.19,
    })
}

pub fn event(title: &str) -> Payload {
    Payload::Event(EventDraft {
        title: title.to_string(),
        description: Some("Bring your board".to_string()),
        event_type: EventType::Session,
        start_time: Utc.with_ymd_and_hms(2026, 6, 21, 16, 0, 0).unwrap(),
        end_time: Some(Utc.with_ymd_and_hms(2026, 6, 21, 20, 0, 0).unwrap()),
        location: Some("Parco Sempione".to_string()),
        max_participants: Some(40),
        shop_id: 7,
    })
}

pub fn server_record(id: i64, name: &str) -> RemoteRecord {
    RemoteRecord {
        id: RemoteId::new(id),
        data: json!({ "id": id, "name": name }),
    }
}

/// Scripted in-process remote service.
///
/// Creates succeed with increasing ids unless the payload label was scripted
/// to fail. With a gate installed, every create waits for one permit.
#[derive(Default)]
pub struct FakeRemote {
    next_id: AtomicI64,
    failures: Mutex<HashMap<String, RemoteError>>,
    recent: Mutex<HashMap<EntityKind, Result<Vec<RemoteRecord>, RemoteError>>>,
    created: Mutex<Vec<(EntityKind, String)>>,
    fetches: Mutex<Vec<(EntityKind, usize)>>,
    gate: Option<Arc<Notify>>,
    pub entered: Arc<Notify>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(100),
            ..Default::default()
        }
    }

    /// Creates block until `gate.notify_one()`; `entered` fires on arrival.
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new()
        }
    }

    pub fn fail_create(&self, label: &str, err: RemoteError) {
        self.failures
            .lock()
            .unwrap()
            .insert(label.to_string(), err);
    }

    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    pub fn set_recent(&self, kind: EntityKind, result: Result<Vec<RemoteRecord>, RemoteError>) {
        self.recent.lock().unwrap().insert(kind, result);
    }

    /// Labels of every create call, in call order (failed ones included).
    pub fn created_labels(&self) -> Vec<String> {
        self.created
            .lock()
            .unwrap()
            .iter()
            .map(|(_, l)| l.clone())
            .collect()
    }

    pub fn fetches(&self) -> Vec<(EntityKind, usize)> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteService for FakeRemote {
    async fn create(&self, kind: EntityKind, payload: &Payload) -> Result<RemoteId, RemoteError> {
        if let Some(gate) = &self.gate {
            self.entered.notify_one();
            gate.notified().await;
        }

        let label = payload.label().to_string();
        self.created.lock().unwrap().push((kind, label.clone()));

        if let Some(err) = self.failures.lock().unwrap().get(&label) {
            return Err(err.clone());
        }
        Ok(RemoteId::new(self.next_id.fetch_add(1, Ordering::SeqCst)))
    }

    async fn fetch_recent(
        &self,
        kind: EntityKind,
        limit: usize,
    ) -> Result<Vec<RemoteRecord>, RemoteError> {
        self.fetches.lock().unwrap().push((kind, limit));
        self.recent
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .unwrap_or(Ok(Vec::new()))
    }
}
