//! skatesync library root.
//! Exposes the CLI parser, the high-level run() function, the offline store
//! and the sync engine.

pub mod cli;
pub mod config;
pub mod connectivity;
pub mod core;
pub mod db;
pub mod errors;
pub mod logging;
pub mod models;
pub mod remote;
pub mod sync;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Add { .. } => cli::commands::add::handle(&cli.command, cfg),
        Commands::List { .. } => cli::commands::list::handle(&cli.command, cfg),
        Commands::Cache { .. } => cli::commands::cache::handle(&cli.command, cfg),
        Commands::Sync { .. } => cli::commands::sync::handle(cli, cfg),
        Commands::Retry { .. } => cli::commands::retry::handle(cli, cfg),
        Commands::Status => cli::commands::status::handle(cli, cfg),
        Commands::Stats => cli::commands::stats::handle(cfg),
        Commands::Clear { .. } => cli::commands::clear::handle(cli, cfg),
        Commands::AutoSync { .. } => cli::commands::auto_sync::handle(cli, cfg),
        Commands::Watch => cli::commands::watch::handle(cli, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    logging::init(cli.verbose);

    // 2️⃣ load config once
    let mut cfg = Config::load()?;

    // 3️⃣ command-line DB override
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    // 4️⃣ hand everything to the dispatcher
    dispatch(&cli, &cfg)
}
