//! CLI command implementations

pub mod config;
pub mod demo;
pub mod fetch;
pub mod logs;
pub mod register;

use std::path::PathBuf;

use anyhow::{Context, Result};
use userstate_core::{EntryPoint, UserStateContext};

/// Get the userstate directory from environment or default
pub fn get_userstate_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("USERSTATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".userstate"))
        .context("Could not find home directory; set USERSTATE_DIR")
}

/// Create the userstate directory if needed and return it
pub fn ensure_userstate_dir() -> Result<PathBuf> {
    let userstate_dir = get_userstate_dir()?;
    std::fs::create_dir_all(&userstate_dir)
        .with_context(|| format!("Failed to create userstate directory: {:?}", userstate_dir))?;
    Ok(userstate_dir)
}

/// Build a session context for one CLI invocation
pub fn get_context(command: &str) -> Result<UserStateContext> {
    let userstate_dir = ensure_userstate_dir()?;
    let ctx = UserStateContext::new(&userstate_dir, EntryPoint::Cli)
        .context("Failed to initialize userstate context")?;

    // Logging should never break the command
    let _ = ctx.logging_service.log_command(command);

    Ok(ctx)
}
