/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

use crate::models::SyncStatus;

/// pending → yellow, synced → green, failed → red.
pub fn color_for_status(status: SyncStatus) -> &'static str {
    match status {
        SyncStatus::Pending => YELLOW,
        SyncStatus::Synced => GREEN,
        SyncStatus::Failed => RED,
    }
}

pub fn colorize_status(status: SyncStatus) -> String {
    format!("{}{}{}", color_for_status(status), status, RESET)
}

/// GREY for zero, `color` otherwise.
pub fn colorize_count(n: u64, color: &str) -> String {
    if n == 0 {
        format!("{GREY}{n}{RESET}")
    } else {
        format!("{color}{n}{RESET}")
    }
}
