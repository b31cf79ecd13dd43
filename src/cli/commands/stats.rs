use crate::cli::commands::open_store;
use crate::config::Config;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET, YELLOW, colorize_count};
use crate::utils::table::{Column, Table};

pub fn handle(cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg)?;
    let stats = store.storage_stats()?;

    println!("{CYAN}• Pending writes:{RESET} {}", stats.pending_writes);
    println!("{CYAN}• Cache entries:{RESET}  {}", stats.cache_entries);

    if stats.is_empty() {
        return Ok(());
    }

    let mut table = Table::new(vec![
        Column::new("KIND", 6),
        Column::new("PENDING", 8),
        Column::new("FAILED", 8),
        Column::new("SYNCED", 8),
        Column::new("CACHED", 8),
    ]);
    for (kind, s) in &stats.by_kind {
        table.add_row(vec![
            kind.to_string(),
            s.pending.to_string(),
            s.failed.to_string(),
            s.synced.to_string(),
            s.cached.to_string(),
        ]);
    }
    println!();
    print!("{}", table.render());

    let failed: u64 = stats.by_kind.values().map(|s| s.failed).sum();
    if failed > 0 {
        println!(
            "\n{} failed write(s): run `skatesync retry` to queue them again",
            colorize_count(failed, RED)
        );
    } else {
        let pending: u64 = stats.by_kind.values().map(|s| s.pending).sum();
        println!(
            "\n{} waiting, {GREEN}no failures{RESET}",
            colorize_count(pending, YELLOW)
        );
    }
    Ok(())
}
