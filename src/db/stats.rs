use crate::db::migrate::applied_versions;
use crate::errors::AppResult;
use crate::models::kind::EntityKind;
use crate::models::stats::{KindStats, StorageStats};
use crate::models::sync_status::SyncStatus;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::{Connection, OptionalExtension};
use std::fs;

/// Counts per table and per kind for the offline-data tables.
pub fn storage_stats(conn: &Connection) -> AppResult<StorageStats> {
    let mut stats = StorageStats::default();

    for kind in EntityKind::ALL {
        stats.by_kind.insert(kind, KindStats::default());
    }

    let mut stmt = conn.prepare_cached(
        "SELECT kind, sync_status, COUNT(*) FROM pending_writes GROUP BY kind, sync_status",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i64>(2)?,
        ))
    })?;

    for r in rows {
        let (kind, status, n) = r?;
        let n = n.max(0) as u64;
        stats.pending_writes += n;

        // Rows of unknown kinds still count in the table total.
        let Some(kind) = EntityKind::from_db_str(&kind) else {
            continue;
        };
        let entry = stats.by_kind.entry(kind).or_default();
        match SyncStatus::from_db_str(&status) {
            Some(SyncStatus::Pending) => entry.pending += n,
            Some(SyncStatus::Synced) => entry.synced += n,
            Some(SyncStatus::Failed) => entry.failed += n,
            None => {}
        }
    }

    let mut stmt =
        conn.prepare_cached("SELECT kind, COUNT(*) FROM cache_entries GROUP BY kind")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    for r in rows {
        let (kind, n) = r?;
        let n = n.max(0) as u64;
        stats.cache_entries += n;
        if let Some(kind) = EntityKind::from_db_str(&kind) {
            stats.by_kind.entry(kind).or_default().cached += n;
        }
    }

    Ok(stats)
}

pub fn print_db_info(conn: &Connection, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) TABLE COUNTS
    //
    let stats = storage_stats(conn)?;
    let settings: i64 = conn.query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))?;

    println!(
        "{}• Pending writes:{} {}{}{}",
        CYAN, RESET, GREEN, stats.pending_writes, RESET
    );
    println!(
        "{}• Cache entries:{} {}{}{}",
        CYAN, RESET, GREEN, stats.cache_entries, RESET
    );
    println!("{}• Settings:{} {}", CYAN, RESET, settings);

    //
    // 3) OFFLINE WRITE RANGE
    //
    let first: Option<String> = conn
        .query_row(
            "SELECT created_offline_at FROM pending_writes ORDER BY created_offline_at ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    let last: Option<String> = conn
        .query_row(
            "SELECT created_offline_at FROM pending_writes
             ORDER BY created_offline_at DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    println!("{}• Offline writes range:{}", CYAN, RESET);
    println!(
        "    from: {}",
        first.unwrap_or_else(|| format!("{GREY}--{RESET}"))
    );
    println!(
        "    to:   {}",
        last.unwrap_or_else(|| format!("{GREY}--{RESET}"))
    );

    //
    // 4) SCHEMA
    //
    let versions = applied_versions(conn)?;
    println!("{}• Migrations applied:{} {}", CYAN, RESET, versions.len());
    if let Some(v) = versions.last() {
        println!("    latest: {}", v);
    }

    println!();
    Ok(())
}
