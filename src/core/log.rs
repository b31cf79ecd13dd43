use crate::db::OfflineStore;
use crate::db::log::LogRow;
use crate::errors::AppResult;
use crate::utils::time::{format_local, parse_db_ts};
use ansi_term::Colour;
use regex::Regex;
use std::sync::OnceLock;

const MAX_OP_WIDTH: usize = 60;

fn strip_ansi(s: &str) -> String {
    static ANSI: OnceLock<Option<Regex>> = OnceLock::new();
    match ANSI.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok()) {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" => Colour::Green,
        "clear" => Colour::Red,
        "retry_failed" => Colour::Yellow,
        "sync" => Colour::Cyan,
        "auto_sync" => Colour::Blue,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51), // arancione
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(store: &OfflineStore) -> AppResult<()> {
        let rows = store.load_log()?;

        if rows.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let entries: Vec<(LogRow, String, String)> = rows
            .into_iter()
            .map(|row| {
                let date = parse_db_ts(&row.date)
                    .map(|ts| format_local(&ts))
                    .unwrap_or_else(|_| row.date.clone());

                let op_target = if row.target.is_empty() {
                    row.operation.clone()
                } else {
                    format!("{} ({})", row.operation, row.target)
                };
                (row, date, op_target)
            })
            .collect();

        let op_w = entries
            .iter()
            .map(|(_, _, op_target)| op_target.len())
            .max()
            .unwrap_or(10)
            .min(MAX_OP_WIDTH);
        let id_w = entries
            .iter()
            .map(|(row, _, _)| row.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries
            .iter()
            .map(|(_, date, _)| date.len())
            .max()
            .unwrap_or(10);

        println!("📜 Internal log:\n");

        for (row, date, op_target) in entries {
            let color = color_for_operation(&row.operation);

            // truncate before coloring
            let visible = if op_target.chars().count() > MAX_OP_WIDTH {
                let mut s = op_target.chars().take(MAX_OP_WIDTH - 3).collect::<String>();
                s.push_str("...");
                s
            } else {
                op_target
            };

            // only the operation word is colored
            let recolored = match visible.split_once(' ') {
                Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
                None => color.paint(visible.as_str()).to_string(),
            };

            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&recolored).len()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                row.id,
                date,
                recolored,
                padding,
                row.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
