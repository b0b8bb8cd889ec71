//! Core domain entities
//!
//! Pure data structures and the state reducer - no I/O or external
//! dependencies.

mod user;
pub mod action;
pub mod result;

pub use action::{reduce, UserAction};
pub use user::{Address, Geo, LoadStatus, UserProfile, UserState};
