//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The user store
//! depends only on these traits, not on concrete implementations.

mod event_sink;
mod user_directory;

pub use event_sink::EventSink;
pub use user_directory::UserDirectory;
