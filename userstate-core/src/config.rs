//! Configuration management
//!
//! Settings live in `settings.json` inside the userstate directory:
//! ```json
//! {
//!   "app": { "demoMode": false },
//!   "directory": {
//!     "baseUrl": "https://jsonplaceholder.typicode.com",
//!     "registrationUrl": "https://example.com/api/user/register",
//!     "timeoutSecs": 30
//!   }
//! }
//! ```
//! Keys we don't manage are preserved when saving, and a file that does not
//! parse is reported rather than overwritten.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::adapters::http_directory::{DEFAULT_DIRECTORY_URL, DEFAULT_TIMEOUT_SECS};

/// Overrides the directory base URL
pub const DIRECTORY_URL_ENV: &str = "USERSTATE_DIRECTORY_URL";
/// Overrides the registration endpoint
pub const REGISTRATION_URL_ENV: &str = "USERSTATE_REGISTRATION_URL";
/// Overrides the request timeout (seconds)
pub const TIMEOUT_SECS_ENV: &str = "USERSTATE_TIMEOUT_SECS";
/// Overrides demo mode (for CI/testing)
pub const DEMO_MODE_ENV: &str = "USERSTATE_DEMO_MODE";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    directory: DirectorySettingsFile,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectorySettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    registration_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Where the user directory lives and how long to wait for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectorySettings {
    pub base_url: String,
    pub registration_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DIRECTORY_URL.to_string(),
            registration_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Effective configuration (settings file + environment)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub demo_mode: bool,
    pub directory: DirectorySettings,
}

fn parse_bool_env(name: &str) -> Option<bool> {
    match std::env::var(name).ok().as_deref() {
        Some("true" | "1" | "yes" | "TRUE" | "YES") => Some(true),
        Some("false" | "0" | "no" | "FALSE" | "NO") => Some(false),
        _ => None,
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read settings.json; a file that does not parse is an error, never defaults
fn read_settings(settings_path: &Path) -> Result<SettingsFile> {
    if settings_path.exists() {
        let content = std::fs::read_to_string(settings_path)
            .with_context(|| format!("Failed to read {}", settings_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid settings file {}", settings_path.display()))
    } else {
        Ok(SettingsFile::default())
    }
}

impl Config {
    /// Load config from the userstate directory
    ///
    /// Environment variables win over the settings file; the file wins over
    /// built-in defaults.
    pub fn load(userstate_dir: &Path) -> Result<Self> {
        let raw = read_settings(&userstate_dir.join("settings.json"))?;
        let defaults = DirectorySettings::default();

        let base_url = non_empty_env(DIRECTORY_URL_ENV)
            .or(raw.directory.base_url)
            .unwrap_or(defaults.base_url);

        let registration_url = non_empty_env(REGISTRATION_URL_ENV).or(raw.directory.registration_url);

        // Zero is "unset" at every layer
        let timeout_secs = std::env::var(TIMEOUT_SECS_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|t| *t > 0)
            .or(raw.directory.timeout_secs.filter(|t| *t > 0))
            .unwrap_or(defaults.timeout_secs);

        let demo_mode = parse_bool_env(DEMO_MODE_ENV).unwrap_or(raw.app.demo_mode);

        Ok(Self {
            demo_mode,
            directory: DirectorySettings {
                base_url,
                registration_url,
                timeout_secs,
            },
        })
    }

    /// Persist the demo flag
    ///
    /// Only `app.demoMode` is rewritten; environment overrides never reach
    /// the file.
    pub fn save_demo_mode(userstate_dir: &Path, enabled: bool) -> Result<()> {
        let settings_path = userstate_dir.join("settings.json");
        let mut settings = read_settings(&settings_path)?;
        settings.app.demo_mode = enabled;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }
}
