//! State transitions for the session user
//!
//! Every mutation of `UserState` is one of these actions applied by
//! `reduce`. The store decides *whether* an action is applied (stale fetch
//! results are dropped before they get here); `reduce` decides *what* it does.

use super::user::{LoadStatus, UserProfile, UserState};

/// A state transition
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    /// A directory lookup started
    FetchPending,
    /// The lookup returned a matching record
    FetchFulfilled(UserProfile),
    /// The lookup failed; the message is kept for observers
    FetchRejected(String),
    /// Clear the session user
    Logout,
    /// Overwrite the whole state
    Replace(UserState),
}

/// Apply an action to the state
pub fn reduce(state: &mut UserState, action: UserAction) {
    match action {
        UserAction::FetchPending => {
            state.status = LoadStatus::Loading;
            state.last_error = None;
        }
        UserAction::FetchFulfilled(profile) => {
            state.profile = profile;
            state.status = LoadStatus::Succeeded;
            state.last_error = None;
        }
        UserAction::FetchRejected(message) => {
            // Profile is left as it was
            state.status = LoadStatus::Failed;
            state.last_error = Some(message);
        }
        UserAction::Logout => {
            *state = UserState::default();
        }
        UserAction::Replace(next) => {
            *state = next;
        }
    }
}
