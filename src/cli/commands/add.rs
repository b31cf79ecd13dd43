use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::add::AddLogic;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Queue a spot or an event created offline.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add { record } = cmd {
        // Validate before touching the database.
        let payload = AddLogic::payload_from_args(record)?;

        let store = open_store(cfg)?;
        let local_id = AddLogic::apply(&store, &payload)?;

        success(format!(
            "Queued {} '{}' as {}",
            payload.kind(),
            payload.label(),
            local_id
        ));
    }

    Ok(())
}
