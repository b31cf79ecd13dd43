use crate::cli::commands::{engine, parse_kind, print_cycle_result, runtime};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::AppResult;

/// Run one cycle and report it. An offline or busy cycle is not an error.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Sync { kind } = &cli.command {
        let kind = parse_kind(kind)?;
        let engine = engine(cli, cfg)?;

        let result = runtime()?.block_on(async {
            match kind {
                Some(k) => engine.force_sync(k).await,
                None => engine.force_full_sync().await,
            }
        });

        print_cycle_result(&result);
    }
    Ok(())
}
