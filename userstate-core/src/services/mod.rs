//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions.

pub mod logging;
mod user_store;

pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use user_store::{UserStore, FETCH_CANCELLED};
