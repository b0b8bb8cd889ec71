//! Config command - show the effective configuration

use anyhow::Result;
use colored::Colorize;

use super::get_userstate_dir;
use crate::output;
use userstate_core::config::{
    Config, DEMO_MODE_ENV, DIRECTORY_URL_ENV, REGISTRATION_URL_ENV, TIMEOUT_SECS_ENV,
};

fn source(env_name: &str) -> String {
    if std::env::var(env_name).map(|v| !v.trim().is_empty()).unwrap_or(false) {
        format!("env {}", env_name).cyan().to_string()
    } else {
        "settings/default".dimmed().to_string()
    }
}

pub fn run(json: bool) -> Result<()> {
    let userstate_dir = get_userstate_dir()?;
    let config = Config::load(&userstate_dir)?;
    let directory = &config.directory;

    if json {
        output::print_json(&serde_json::json!({
            "userstate_dir": userstate_dir.to_string_lossy(),
            "demo_mode": config.demo_mode,
            "directory": directory,
        }))?;
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Setting", "Value", "Source"]);
    table.add_row(vec![
        "Directory".to_string(),
        userstate_dir.display().to_string(),
        "USERSTATE_DIR".dimmed().to_string(),
    ]);
    table.add_row(vec![
        "Demo mode".to_string(),
        config.demo_mode.to_string(),
        source(DEMO_MODE_ENV),
    ]);
    table.add_row(vec![
        "Directory URL".to_string(),
        directory.base_url.clone(),
        source(DIRECTORY_URL_ENV),
    ]);
    table.add_row(vec![
        "Registration URL".to_string(),
        directory
            .registration_url
            .clone()
            .unwrap_or_else(|| "(not set)".to_string()),
        source(REGISTRATION_URL_ENV),
    ]);
    table.add_row(vec![
        "Timeout".to_string(),
        format!("{}s", directory.timeout_secs),
        source(TIMEOUT_SECS_ENV),
    ]);
    println!("{}", table);

    if config.demo_mode {
        output::warning("Demo mode is on: lookups use the built-in sample users.");
    } else if directory.registration_url.is_none() {
        output::info("No registration URL configured; 'us register' will fail.");
    }

    Ok(())
}
