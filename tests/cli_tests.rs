use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{init_db, setup_test_db, sks};

fn add_sample_records(db_path: &str) {
    sks()
        .args([
            "--db",
            db_path,
            "add",
            "spot",
            "--name",
            "Piazza Gae Aulenti",
            "--lat",
            "45.4836",
            "--lon",
            "9.1895",
            "--type",
            "plaza",
            "--feature",
            "ledges",
            "--feature",
            "stairs",
        ])
        .assert()
        .success()
        .stdout(contains("Queued spot 'Piazza Gae Aulenti' as local-"));

    sks()
        .args([
            "--db",
            db_path,
            "add",
            "event",
            "--title",
            "Summer Jam",
            "--type",
            "competition",
            "--start",
            "2026-07-01 18:00",
            "--shop",
            "3",
        ])
        .assert()
        .success()
        .stdout(contains("Queued event 'Summer Jam'"));
}

#[test]
fn test_add_and_list_pending_writes() {
    let db_path = setup_test_db("cli_add_list");
    init_db(&db_path);
    add_sample_records(&db_path);

    sks()
        .args(["--db", &db_path, "list"])
        .assert()
        .success()
        .stdout(contains("Piazza Gae Aulenti"))
        .stdout(contains("Summer Jam"))
        .stdout(contains("pending"))
        .stdout(contains("2 write(s)"));

    sks()
        .args(["--db", &db_path, "list", "--kind", "event"])
        .assert()
        .success()
        .stdout(contains("Summer Jam").and(contains("Piazza Gae Aulenti").not()));

    sks()
        .args(["--db", &db_path, "list", "--status", "failed"])
        .assert()
        .success()
        .stdout(contains("No queued writes."));
}

#[test]
fn test_invalid_records_are_refused() {
    let db_path = setup_test_db("cli_invalid_add");
    init_db(&db_path);

    sks()
        .args([
            "--db", &db_path, "add", "spot", "--name", "Moon Base", "--lat", "200", "--lon", "9",
        ])
        .assert()
        .failure()
        .stderr(contains("latitude"));

    sks()
        .args([
            "--db", &db_path, "add", "event", "--title", "Mystery", "--type", "party", "--start",
            "2026-07-01 18:00", "--shop", "1",
        ])
        .assert()
        .failure()
        .stderr(contains("unknown event type"));

    sks()
        .args(["--db", &db_path, "list", "--kind", "skateboards"])
        .assert()
        .failure()
        .stderr(contains("Invalid record kind"));

    sks()
        .args(["--db", &db_path, "stats"])
        .assert()
        .success()
        .stdout(contains("Pending writes:"))
        .stdout(contains("Cache entries:"));
}

#[test]
fn test_offline_sync_keeps_the_queue() {
    let db_path = setup_test_db("cli_offline_sync");
    init_db(&db_path);
    add_sample_records(&db_path);

    sks()
        .args(["--db", &db_path, "--offline", "sync"])
        .assert()
        .success()
        .stdout(contains("Network unavailable"));

    sks()
        .args(["--db", &db_path, "--offline", "status"])
        .assert()
        .success()
        .stdout(contains("offline"))
        .stdout(contains("never"));

    sks()
        .args(["--db", &db_path, "list", "--status", "pending"])
        .assert()
        .success()
        .stdout(contains("2 write(s)"));
}

#[test]
fn test_clear_requires_confirmation() {
    let db_path = setup_test_db("cli_clear");
    init_db(&db_path);
    add_sample_records(&db_path);

    sks()
        .args(["--db", &db_path, "--offline", "clear"])
        .assert()
        .success()
        .stdout(contains("--yes"));

    sks()
        .args(["--db", &db_path, "list"])
        .assert()
        .success()
        .stdout(contains("2 write(s)"));

    sks()
        .args(["--db", &db_path, "--offline", "clear", "--yes"])
        .assert()
        .success()
        .stdout(contains("Offline data cleared"));

    sks()
        .args(["--db", &db_path, "list"])
        .assert()
        .success()
        .stdout(contains("No queued writes."));
}

#[test]
fn test_auto_sync_toggle_retry_and_log() {
    let db_path = setup_test_db("cli_auto_sync");
    init_db(&db_path);
    add_sample_records(&db_path);

    sks()
        .args(["--db", &db_path, "--offline", "auto-sync", "off"])
        .assert()
        .success()
        .stdout(contains("Auto-sync disabled"));

    sks()
        .args(["--db", &db_path, "--offline", "status"])
        .assert()
        .success()
        .stdout(contains("Auto-sync:"))
        .stdout(contains("off"));

    sks()
        .args(["--db", &db_path, "--offline", "retry"])
        .assert()
        .success()
        .stdout(contains("No failed writes to retry."));

    sks()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("init"))
        .stdout(contains("add"))
        .stdout(contains("auto-sync disabled"))
        .stdout(contains("migration_applied"));
}

#[test]
fn test_cache_and_db_maintenance() {
    let db_path = setup_test_db("cli_db_maintenance");
    init_db(&db_path);

    sks()
        .args(["--db", &db_path, "cache"])
        .assert()
        .success()
        .stdout(contains("Cache mirror is empty"));

    sks()
        .args(["--db", &db_path, "cache", "--kind", "spot", "--show", "4"])
        .assert()
        .success()
        .stdout(contains("No cached spot with id 4"));

    sks()
        .args(["--db", &db_path, "db", "--migrate", "--check", "--info"])
        .assert()
        .success()
        .stdout(contains("0 applied"))
        .stdout(contains("Integrity check passed"))
        .stdout(contains("Migrations applied:"));
}

#[test]
fn test_log_print_never_creates_a_database() {
    let db_path = setup_test_db("cli_log_missing_db");

    sks()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .failure()
        .stderr(contains("Local storage unavailable"));

    assert!(!std::path::Path::new(&db_path).exists());
}
