//! In-memory event sink
//!
//! Keeps events in a vector. Used by tests and by embedders that want to
//! inspect what the store reported without a logs database.

use std::sync::Mutex;

use anyhow::{anyhow, Result};

use crate::ports::EventSink;
use crate::services::LogEvent;

#[derive(Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events, oldest first
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Names of recorded events, oldest first
    pub fn event_names(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.event).collect()
    }
}

impl EventSink for MemoryEventSink {
    fn record(&self, event: LogEvent) -> Result<()> {
        self.events
            .lock()
            .map_err(|e| anyhow!("Lock poisoned: {}", e))?
            .push(event);
        Ok(())
    }
}
