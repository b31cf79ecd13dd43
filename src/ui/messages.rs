//! One-line colored messages for command output.
//! Errors go to stderr, everything else to stdout.

use crate::utils::colors::{BOLD, CYAN, GREEN, GREY, RED, RESET, YELLOW};
use std::fmt;

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{CYAN}{BOLD}{ICON_INFO}{RESET} {msg}");
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{GREEN}{BOLD}{ICON_OK}{RESET} {msg}");
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{YELLOW}{BOLD}{ICON_WARN}{RESET} {msg}");
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{RED}{BOLD}{ICON_ERR}{RESET} {msg}");
}

/// Indented detail line under a message (e.g. one error of a sync cycle).
pub fn item<T: fmt::Display>(msg: T) {
    println!("   {RED}•{RESET} {msg}");
}

/// Dimmed follow-up suggestion.
pub fn hint<T: fmt::Display>(msg: T) {
    println!("   {GREY}{msg}{RESET}");
}
