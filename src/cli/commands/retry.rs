use crate::cli::commands::{engine, print_cycle_result, runtime};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Retry { now } = &cli.command {
        let engine = engine(cli, cfg)?;
        let n = engine.retry_failed()?;

        if n == 0 {
            info("No failed writes to retry.");
        } else {
            success(format!("{} failed write(s) queued again", n));
        }

        if *now {
            let result = runtime()?.block_on(engine.force_full_sync());
            print_cycle_result(&result);
        }
    }
    Ok(())
}
