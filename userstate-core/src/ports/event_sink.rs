//! Event sink port
//!
//! Where the user store reports what happened. Implementations must not
//! record profile contents, only event names and error messages.

use anyhow::Result;

use crate::services::LogEvent;

/// Destination for structured log events
pub trait EventSink: Send + Sync {
    fn record(&self, event: LogEvent) -> Result<()>;
}
