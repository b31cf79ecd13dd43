use crate::cli::commands::engine;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{hint, success, warning};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Clear { yes } = &cli.command {
        if !*yes {
            warning("This deletes every queued write, synced or not, and the cache mirror.");
            hint("Run again with --yes to confirm.");
            return Ok(());
        }

        let engine = engine(cli, cfg)?;
        let before = engine.get_storage_stats()?;
        engine.clear_offline_data()?;

        success(format!(
            "Offline data cleared ({} write(s), {} cache entr(ies))",
            before.pending_writes, before.cache_entries
        ));
    }
    Ok(())
}
