use crate::cli::commands::{open_store, parse_kind};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::RemoteId;
use crate::ui::messages::warning;
use crate::utils::table::{Column, Table};
use crate::utils::time::{format_ago, format_local};
use chrono::Utc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Cache { kind, show } = cmd {
        let kind = parse_kind(kind)?;
        let store = open_store(cfg)?;

        // --show needs --kind (enforced by clap)
        if let (Some(id), Some(kind)) = (show, kind) {
            match store.get_cached(kind, RemoteId::new(*id))? {
                Some(entry) => {
                    println!(
                        "{} {} (cached {})\n",
                        entry.kind,
                        entry.remote_id,
                        format_local(&entry.cached_at)
                    );
                    println!("{}", serde_json::to_string_pretty(&entry.payload)?);
                }
                None => warning(format!("No cached {} with id {}", kind, id)),
            }
            return Ok(());
        }

        let entries = store.list_cache(kind)?;
        if entries.is_empty() {
            println!("Cache mirror is empty. Run `skatesync sync` while online.");
            return Ok(());
        }

        let now = Utc::now();
        let mut table = Table::new(vec![
            Column::new("SERVER", 8),
            Column::new("KIND", 6),
            Column::new("TITLE", 36),
            Column::new("CACHED", 12),
            Column::new("ACCESSED", 12),
        ]);
        for e in &entries {
            table.add_row(vec![
                e.remote_id.to_string(),
                e.kind.to_string(),
                e.title(),
                format_ago(&e.cached_at, now),
                format_ago(&e.last_accessed, now),
            ]);
        }
        print!("{}", table.render());
        println!("\n{} cached record(s)", entries.len());
    }

    Ok(())
}
