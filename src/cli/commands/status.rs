use crate::cli::commands::{engine, runtime};
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RED, RESET, YELLOW, colorize_count};
use crate::utils::time::{format_ago, format_local};
use chrono::Utc;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let engine = engine(cli, cfg)?;
    let report = runtime()?.block_on(engine.get_sync_status())?;

    let online = if report.is_online {
        format!("{GREEN}online{RESET}")
    } else {
        format!("{RED}offline{RESET}")
    };
    let last = match &report.last_sync_time {
        Some(ts) => format!("{} ({})", format_local(ts), format_ago(ts, Utc::now())),
        None => format!("{GREY}never{RESET}"),
    };
    let auto = if report.auto_sync_enabled { "on" } else { "off" };

    println!("{CYAN}• Network:{RESET}    {}", online);
    println!("{CYAN}• Last sync:{RESET}  {}", last);
    println!("{CYAN}• Auto-sync:{RESET}  {}", auto);
    println!(
        "{CYAN}• Writes:{RESET}     pending {} | failed {} | synced {}",
        colorize_count(report.pending_count, YELLOW),
        colorize_count(report.failed_count, RED),
        colorize_count(report.synced_count, GREEN)
    );

    if !report.recent_errors.is_empty() {
        println!("{CYAN}• Recent errors:{RESET}");
        for e in &report.recent_errors {
            println!("    {RED}✘{RESET} {}", e);
        }
    }
    Ok(())
}
