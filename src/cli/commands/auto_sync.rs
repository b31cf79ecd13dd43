use crate::cli::commands::engine;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::AutoSync { state } = &cli.command {
        let enabled = state == "on";
        engine(cli, cfg)?.set_auto_sync_enabled(enabled)?;

        if enabled {
            success(
                "Auto-sync enabled: `skatesync watch` will sync on its timer and on reconnect.",
            );
        } else {
            success("Auto-sync disabled: only manual `skatesync sync` runs will sync.");
        }
    }
    Ok(())
}
