//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - HTTP client for the UserDirectory port
//! - Demo in-memory directory for offline use
//! - In-memory EventSink for tests and embedding

pub mod demo;
pub mod http_directory;
pub mod memory_sink;

#[cfg(test)]
pub mod directory_mock;
