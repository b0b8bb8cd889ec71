//! userstate core - session user state backed by a remote user directory
//!
//! This crate follows hexagonal architecture:
//!
//! - **domain**: User profile, load status, state reducer, errors
//! - **ports**: Trait definitions for external dependencies (UserDirectory, EventSink)
//! - **services**: The user store and the event log
//! - **adapters**: Concrete implementations (HTTP directory, demo directory, in-memory sink)

pub mod adapters;
pub mod config;
pub mod domain;
mod log_migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::demo::DemoDirectory;
use adapters::http_directory::HttpUserDirectory;
use config::Config;
use ports::UserDirectory;

// Re-export commonly used types at crate root
pub use domain::result::{OperationResult, UserError};
pub use domain::{Address, Geo, LoadStatus, UserAction, UserProfile, UserState};
pub use services::{EntryPoint, LogEntry, LogEvent, LoggingService, UserStore, FETCH_CANCELLED};

/// Main context for a userstate session
///
/// Wires configuration, the event log and the user store together. One
/// context is one session: dropping it drops the session state.
pub struct UserStateContext {
    pub config: Config,
    pub logging_service: Arc<LoggingService>,
    pub user_store: UserStore,
}

impl UserStateContext {
    /// Create a new context rooted at `userstate_dir`
    pub fn new(userstate_dir: &Path, entry_point: EntryPoint) -> Result<Self> {
        let config = Config::load(userstate_dir)?;

        let directory: Arc<dyn UserDirectory> = if config.demo_mode {
            Arc::new(DemoDirectory::new())
        } else {
            Arc::new(HttpUserDirectory::from_settings(&config.directory)?)
        };

        let logging_service = Arc::new(LoggingService::new(
            userstate_dir,
            entry_point,
            env!("CARGO_PKG_VERSION"),
        )?);

        let user_store = UserStore::new(directory).with_sink(logging_service.clone());

        Ok(Self {
            config,
            logging_service,
            user_store,
        })
    }
}
