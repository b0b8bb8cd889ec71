//! Terminal output helpers shared by the commands

use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use serde::Serialize;
use userstate_core::LoadStatus;

pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Errors go to stderr so `--json` output stays parseable
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Pretty-print any serializable report on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Load status colored by outcome
pub fn status_cell(status: LoadStatus) -> String {
    let label = status.as_str();
    match status {
        LoadStatus::Succeeded => label.green().to_string(),
        LoadStatus::Failed => label.red().to_string(),
        LoadStatus::Loading => label.yellow().to_string(),
        LoadStatus::Idle => label.dimmed().to_string(),
    }
}

/// Table with the house style: condensed borders, wrapped to the terminal
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Byte count as KB/MB, for the log database size
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_status_cell_keeps_label() {
        colored::control::set_override(false);
        assert_eq!(status_cell(LoadStatus::Failed), "failed");
        assert_eq!(status_cell(LoadStatus::Idle), "idle");
    }
}
