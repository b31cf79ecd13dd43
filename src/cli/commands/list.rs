use crate::cli::commands::{open_store, parse_kind, parse_status};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::PendingWrite;
use crate::utils::colors::{GREY, RESET, colorize_status};
use crate::utils::table::{Column, Table};
use crate::utils::time::format_local;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { kind, status } = cmd {
        let kind = parse_kind(kind)?;
        let status = parse_status(status)?;

        let store = open_store(cfg)?;
        let writes = store.list_writes(kind, status)?;

        if writes.is_empty() {
            println!("No queued writes.");
            return Ok(());
        }

        print_writes(&writes);
    }
    Ok(())
}

fn print_writes(writes: &[PendingWrite]) {
    let mut table = Table::new(vec![
        Column::new("ID", 44),
        Column::new("KIND", 6),
        Column::new("LABEL", 28),
        Column::new("CREATED", 19),
        Column::new("SERVER", 8),
        Column::new("TRIES", 5),
    ]);

    for w in writes {
        table.add_row(vec![
            w.local_id.to_string(),
            w.kind.to_string(),
            w.payload.label().to_string(),
            format_local(&w.created_offline_at),
            w.remote_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "--".to_string()),
            w.attempts.to_string(),
        ]);
    }

    // Status goes last, colored after layout: escape codes have no display width.
    let rendered = table.render();
    let mut lines = rendered.lines();
    if let Some(header) = lines.next() {
        println!("{}STATUS", header);
    }
    for (line, w) in lines.zip(writes) {
        println!("{}{}", line, colorize_status(w.sync_status));
        if let Some(err) = &w.last_error {
            println!("    {GREY}↳ {}{RESET}", err);
        }
    }

    println!("\n{} write(s)", writes.len());
}
