use rusqlite::Connection;
use skatesync::connectivity::ManualConnectivity;
use skatesync::db::OfflineStore;
use skatesync::models::{EntityKind, SyncStatus};
use skatesync::remote::RemoteError;
use skatesync::sync::{CycleOutcome, SyncEngine, SyncSettings};
use std::sync::Arc;
use tokio::sync::Notify;

mod common;
use common::{FakeRemote, event, server_record, setup_test_db, spot};

struct Harness {
    engine: Arc<SyncEngine>,
    store: Arc<OfflineStore>,
    remote: Arc<FakeRemote>,
    network: Arc<ManualConnectivity>,
}

fn harness_over(
    store: OfflineStore,
    remote: FakeRemote,
    settings: SyncSettings,
    online: bool,
) -> Harness {
    let store = Arc::new(store);
    let remote = Arc::new(remote);
    let network = Arc::new(ManualConnectivity::new(online));
    let engine = Arc::new(SyncEngine::new(
        Arc::clone(&store),
        remote.clone(),
        network.clone(),
        settings,
    ));
    Harness {
        engine,
        store,
        remote,
        network,
    }
}

fn harness_with(remote: FakeRemote, online: bool) -> Harness {
    harness_over(
        OfflineStore::in_memory().unwrap(),
        remote,
        SyncSettings::default(),
        online,
    )
}

fn harness(online: bool) -> Harness {
    harness_with(FakeRemote::new(), online)
}

#[tokio::test]
async fn test_online_cycle_syncs_every_pending_write() {
    let h = harness(true);
    h.store.insert_pending_write(&spot("Plaza Duca")).unwrap();
    h.store.insert_pending_write(&spot("Bowl Nord")).unwrap();
    h.store.insert_pending_write(&event("Go Skate Day")).unwrap();

    let result = h.engine.force_full_sync().await;

    assert!(result.success);
    assert_eq!(result.outcome, CycleOutcome::Completed);
    assert_eq!(result.synced, 3);
    assert_eq!(result.failed, 0);
    assert!(result.errors.is_empty());

    // spots drained before events, oldest first
    assert_eq!(
        h.remote.created_labels(),
        vec!["Plaza Duca", "Bowl Nord", "Go Skate Day"]
    );

    let writes = h.store.list_writes(None, None).unwrap();
    assert!(writes.iter().all(|w| w.sync_status == SyncStatus::Synced));
    assert!(writes.iter().all(|w| w.remote_id.is_some()));

    let status = h.engine.get_sync_status().await.unwrap();
    assert!(status.last_sync_time.is_some());
    assert_eq!(status.pending_count, 0);
    assert_eq!(status.synced_count, 3);
}

#[tokio::test]
async fn test_offline_cycle_touches_nothing() {
    let h = harness(false);
    h.store.insert_pending_write(&spot("Waiting One")).unwrap();
    h.store.insert_pending_write(&spot("Waiting Two")).unwrap();
    let before = h.store.storage_stats().unwrap();

    let result = h.engine.force_full_sync().await;

    assert!(!result.success);
    assert_eq!(result.outcome, CycleOutcome::NetworkUnavailable);
    assert_eq!(result.errors, vec!["Network unavailable".to_string()]);
    assert_eq!((result.synced, result.failed), (0, 0));

    assert!(h.remote.created_labels().is_empty());
    assert!(h.remote.fetches().is_empty());
    assert_eq!(h.store.storage_stats().unwrap(), before);
    assert_eq!(h.store.get_setting("last_sync_time", None).unwrap(), None);
    assert!(h.store.load_log().unwrap().iter().all(|r| r.operation != "sync"));
}

#[tokio::test]
async fn test_rejected_write_is_failed_and_not_resent_automatically() {
    let h = harness(true);
    h.remote.fail_create(
        "Bad Spot",
        RemoteError::Rejected {
            status: 422,
            message: "latitude out of range".into(),
        },
    );
    h.store.insert_pending_write(&spot("Good Spot")).unwrap();
    let bad = h.store.insert_pending_write(&spot("Bad Spot")).unwrap();

    let result = h.engine.force_full_sync().await;
    assert!(result.success);
    assert_eq!((result.synced, result.failed), (1, 1));
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains(&bad.to_string()));
    assert!(result.errors[0].contains("422"));

    let failed = h.store.get_write(&bad).unwrap().unwrap();
    assert_eq!(failed.sync_status, SyncStatus::Failed);
    assert!(failed.last_error.unwrap().contains("latitude out of range"));

    // next cycle leaves the failed write alone
    let again = h.engine.force_full_sync().await;
    assert_eq!((again.synced, again.failed), (0, 0));
    assert_eq!(h.remote.created_labels(), vec!["Good Spot", "Bad Spot"]);
}

#[tokio::test]
async fn test_retry_failed_resubmits_exactly_the_failed_writes() {
    let h = harness(true);
    h.remote
        .fail_create("Flaky", RemoteError::Transient("HTTP 503: busy".into()));
    h.store.insert_pending_write(&spot("Fine")).unwrap();
    let flaky = h.store.insert_pending_write(&spot("Flaky")).unwrap();
    h.engine.force_full_sync().await;

    h.remote.clear_failures();
    assert_eq!(h.engine.retry_failed().unwrap(), 1);
    assert!(h.store.get_write(&flaky).unwrap().unwrap().is_pending());

    let result = h.engine.force_full_sync().await;
    assert_eq!((result.synced, result.failed), (1, 0));
    assert_eq!(h.remote.created_labels(), vec!["Fine", "Flaky", "Flaky"]);

    let w = h.store.get_write(&flaky).unwrap().unwrap();
    assert_eq!(w.sync_status, SyncStatus::Synced);
    assert_eq!(w.attempts, 2);
}

#[tokio::test]
async fn test_second_sync_request_while_running_is_refused() {
    let gate = Arc::new(Notify::new());
    let h = harness_with(FakeRemote::gated(gate.clone()), true);
    h.store.insert_pending_write(&spot("Slow Upload")).unwrap();

    let running = {
        let engine = Arc::clone(&h.engine);
        tokio::spawn(async move { engine.force_full_sync().await })
    };
    h.remote.entered.notified().await;
    assert!(h.engine.is_syncing());

    let refused = h.engine.force_full_sync().await;
    assert!(refused.is_already_syncing());
    assert!(!refused.success);
    assert_eq!((refused.synced, refused.failed), (0, 0));

    gate.notify_one();
    let first = running.await.unwrap();
    assert_eq!(first.synced, 1);
    assert!(!h.engine.is_syncing());
    assert_eq!(h.remote.created_labels(), vec!["Slow Upload"]);
}

#[tokio::test]
async fn test_writes_queued_mid_cycle_wait_for_the_next_one() {
    let gate = Arc::new(Notify::new());
    let h = harness_with(FakeRemote::gated(gate.clone()), true);
    h.store.insert_pending_write(&spot("Before")).unwrap();

    let running = {
        let engine = Arc::clone(&h.engine);
        tokio::spawn(async move { engine.force_full_sync().await })
    };
    h.remote.entered.notified().await;
    let late = h.store.insert_pending_write(&spot("During")).unwrap();
    gate.notify_one();

    let first = running.await.unwrap();
    assert_eq!(first.synced, 1);
    assert!(h.store.get_write(&late).unwrap().unwrap().is_pending());

    gate.notify_one();
    let second = h.engine.force_full_sync().await;
    assert_eq!(second.synced, 1);
    assert_eq!(h.remote.created_labels(), vec!["Before", "During"]);
}

#[tokio::test]
async fn test_refresh_replaces_mirror_and_keeps_it_on_failure() {
    let h = harness(true);
    h.remote.set_recent(
        EntityKind::Spot,
        Ok(vec![server_record(1, "Alpha"), server_record(2, "Beta")]),
    );

    let result = h.engine.force_full_sync().await;
    assert!(result.success);
    assert_eq!(h.store.list_cache(Some(EntityKind::Spot)).unwrap().len(), 2);
    assert!(h.remote.fetches().contains(&(EntityKind::Spot, 50)));
    assert!(h.remote.fetches().contains(&(EntityKind::Event, 50)));

    h.remote.set_recent(
        EntityKind::Spot,
        Err(RemoteError::Transient("request timed out".into())),
    );
    let result = h.engine.force_full_sync().await;
    assert!(result.success);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("refresh spot"));
    assert_eq!(h.store.list_cache(Some(EntityKind::Spot)).unwrap().len(), 2);

    h.remote
        .set_recent(EntityKind::Spot, Ok(vec![server_record(3, "Gamma")]));
    h.engine.force_full_sync().await;
    let mirror = h.store.list_cache(Some(EntityKind::Spot)).unwrap();
    assert_eq!(mirror.len(), 1);
    assert_eq!(mirror[0].title(), "Gamma");
}

#[tokio::test]
async fn test_force_sync_limits_the_cycle_to_one_kind() {
    let h = harness(true);
    h.store.insert_pending_write(&spot("Untouched Spot")).unwrap();
    h.store.insert_pending_write(&event("Shop Demo")).unwrap();

    let result = h.engine.force_sync(EntityKind::Event).await;
    assert_eq!(result.synced, 1);
    assert_eq!(h.remote.created_labels(), vec!["Shop Demo"]);
    assert_eq!(
        h.store.list_pending_writes(Some(EntityKind::Spot)).unwrap().len(),
        1
    );
    assert_eq!(h.remote.fetches(), vec![(EntityKind::Event, 50)]);
}

#[tokio::test]
async fn test_status_report_and_recent_errors() {
    let h = harness(true);
    h.remote.fail_create(
        "Broken",
        RemoteError::Rejected {
            status: 400,
            message: "bad".into(),
        },
    );
    h.store.insert_pending_write(&spot("Broken")).unwrap();
    h.store.insert_pending_write(&spot("Waiting")).unwrap();

    let status = h.engine.get_sync_status().await.unwrap();
    assert!(status.is_online);
    assert!(status.auto_sync_enabled);
    assert!(!status.sync_in_progress);
    assert_eq!(status.pending_count, 2);
    assert!(status.last_sync_time.is_none());
    assert!(status.recent_errors.is_empty());

    h.engine.force_full_sync().await;
    let status = h.engine.get_sync_status().await.unwrap();
    assert_eq!(
        (status.pending_count, status.synced_count, status.failed_count),
        (0, 1, 1)
    );
    assert_eq!(status.recent_errors.len(), 1);

    // an offline cycle replaces the log with its own error
    h.network.set_online(false);
    h.engine.force_full_sync().await;
    let status = h.engine.get_sync_status().await.unwrap();
    assert!(!status.is_online);
    assert_eq!(status.recent_errors, vec!["Network unavailable".to_string()]);

    h.engine.clear_errors();
    assert!(h.engine.recent_errors().is_empty());
}

#[tokio::test]
async fn test_clear_offline_data_keeps_settings() {
    let h = harness(true);
    h.store.insert_pending_write(&spot("Doomed")).unwrap();
    h.remote
        .set_recent(EntityKind::Event, Ok(vec![server_record(8, "Cached")]));
    h.engine.force_full_sync().await;
    h.engine.set_auto_sync_enabled(false).unwrap();

    h.engine.clear_offline_data().unwrap();

    let stats = h.engine.get_storage_stats().unwrap();
    assert_eq!((stats.pending_writes, stats.cache_entries), (0, 0));
    assert!(!h.engine.is_auto_sync_enabled().unwrap());
    assert!(h.store.get_setting("last_sync_time", None).unwrap().is_some());
}

#[tokio::test]
async fn test_undecodable_write_fails_alone() {
    let db_path = setup_test_db("engine_undecodable_write");
    let h = harness_over(
        OfflineStore::open_initialized(&db_path).unwrap(),
        FakeRemote::new(),
        SyncSettings::default(),
        true,
    );
    let broken = h.store.insert_pending_write(&spot("From The Future")).unwrap();
    h.store.insert_pending_write(&spot("Plain Ledge")).unwrap();

    let conn = Connection::open(&db_path).unwrap();
    conn.execute(
        "UPDATE pending_writes SET payload = ?1 WHERE id = ?2",
        rusqlite::params![
            r#"{"schema_version":2,"kind":"spot","data":{"name":"From The Future","latitude":0,"longitude":0}}"#,
            broken.to_db_string(),
        ],
    )
    .unwrap();

    let result = h.engine.force_sync(EntityKind::Spot).await;
    assert!(result.success);
    assert_eq!(result.outcome, CycleOutcome::Completed);
    assert_eq!((result.synced, result.failed), (1, 1));
    assert_eq!(h.remote.created_labels(), vec!["Plain Ledge"]);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with(&format!("spot {broken}")));
    assert!(result.errors[0].contains("schema version: 2"));

    let (status, last_error): (String, Option<String>) = conn
        .query_row(
            "SELECT sync_status, last_error FROM pending_writes WHERE id = ?1",
            [broken.to_db_string()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(status, "failed");
    assert!(last_error.unwrap().contains("schema version: 2"));

    assert_eq!(h.store.count_by_status(SyncStatus::Pending).unwrap(), 0);
    assert_eq!(h.store.count_by_status(SyncStatus::Synced).unwrap(), 1);

    // the broken row is not picked up again
    let again = h.engine.force_sync(EntityKind::Spot).await;
    assert_eq!((again.synced, again.failed), (0, 0));
    assert!(again.errors.is_empty());
    assert_eq!(h.remote.created_labels(), vec!["Plain Ledge"]);
}

#[tokio::test]
async fn test_storage_failure_mid_cycle_aborts_without_panicking() {
    let db_path = setup_test_db("engine_storage_abort");
    let writer = OfflineStore::open_initialized(&db_path).unwrap();
    writer.insert_pending_write(&spot("First Rail")).unwrap();
    writer.insert_pending_write(&spot("Second Rail")).unwrap();

    // Reads succeed, the first status update hits a read-only database.
    let h = harness_over(
        OfflineStore::open_read_only(&db_path).unwrap(),
        FakeRemote::new(),
        SyncSettings::default(),
        true,
    );

    let result = h.engine.force_full_sync().await;

    assert!(!result.success);
    assert_eq!(result.outcome, CycleOutcome::StorageUnavailable);
    assert_eq!((result.synced, result.failed), (0, 0));
    assert!(
        result
            .errors
            .last()
            .unwrap()
            .contains("Local storage unavailable")
    );

    // the cycle stopped at the first write and never reached the refresh
    assert_eq!(h.remote.created_labels(), vec!["First Rail"]);
    assert!(h.remote.fetches().is_empty());
    assert!(!h.engine.is_syncing());
    assert_eq!(h.engine.recent_errors(), result.errors);

    assert_eq!(writer.list_pending_writes(None).unwrap().len(), 2);
    assert_eq!(writer.get_setting("last_sync_time", None).unwrap(), None);
}

#[tokio::test]
async fn test_recent_errors_keep_only_the_newest() {
    let h = harness_over(
        OfflineStore::in_memory().unwrap(),
        FakeRemote::new(),
        SyncSettings {
            max_recent_errors: 2,
            ..SyncSettings::default()
        },
        true,
    );
    for name in ["Nope One", "Nope Two", "Nope Three"] {
        h.remote.fail_create(
            name,
            RemoteError::Rejected {
                status: 422,
                message: format!("{name} refused"),
            },
        );
        h.store.insert_pending_write(&spot(name)).unwrap();
    }

    let result = h.engine.force_full_sync().await;
    assert_eq!(result.failed, 3);
    assert_eq!(result.errors.len(), 3);

    let kept = h.engine.recent_errors();
    assert_eq!(kept, result.errors[1..].to_vec());
    assert!(kept[0].contains("Nope Two refused"));
    assert!(kept[1].contains("Nope Three refused"));

    let status = h.engine.get_sync_status().await.unwrap();
    assert_eq!(status.recent_errors.len(), 2);
}
