//! User store - the session's user state container
//!
//! Holds the current user's profile and load status in a watch channel so
//! UI layers can observe every change. All mutation goes through
//! `fetch_user`, `logout` and `replace`.
//!
//! OVERLAPPING FETCHES
//! ===================
//! Each fetch takes a request token. Logout and replace also advance the
//! token. When a lookup resolves, its result is applied only if its token is
//! still the latest; otherwise it is dropped and the call returns
//! `UserError::Superseded`. The token is read and written only while the
//! watch channel's lock is held, so check-and-apply is atomic even on a
//! multi-threaded runtime.
//!
//! A fetch whose future is dropped before the lookup resolves (timeout,
//! `select!`, aborted task) is rejected with `FETCH_CANCELLED` if it is still
//! the latest request, so the status never stays `Loading` with nothing in
//! flight.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::result::{Result, UserError};
use crate::domain::{reduce, LoadStatus, UserAction, UserProfile, UserState};
use crate::ports::{EventSink, UserDirectory};
use crate::services::LogEvent;

/// `last_error` of a fetch dropped before it resolved
pub const FETCH_CANCELLED: &str = "Fetch cancelled";

/// State container for the session user
pub struct UserStore {
    directory: Arc<dyn UserDirectory>,
    sink: Option<Arc<dyn EventSink>>,
    state: watch::Sender<UserState>,
    latest_token: AtomicU64,
}

impl UserStore {
    /// Create a store with default state (anonymous, idle)
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        let (state, _) = watch::channel(UserState::default());
        Self {
            directory,
            sink: None,
            state,
            latest_token: AtomicU64::new(0),
        }
    }

    /// Report events to the given sink
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Name of the directory this store talks to
    pub fn directory_name(&self) -> &str {
        self.directory.name()
    }

    // === Selectors ===

    /// Observe state changes
    pub fn subscribe(&self) -> watch::Receiver<UserState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> UserState {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> LoadStatus {
        self.state.borrow().status
    }

    /// Current user id (0 when nobody is logged in)
    pub fn select_user_id(&self) -> i64 {
        self.state.borrow().id()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.borrow().is_logged_in()
    }

    // === Operations ===

    /// Look up a user by email and make them the session user
    ///
    /// Status becomes `Loading` as soon as the future is first polled.
    /// Zero matches is `NotFound`; transport and decoding failures are
    /// returned as-is. On any failure the status becomes `Failed` and the
    /// previous profile is kept. Dropping the future before it resolves
    /// counts as a failure with `FETCH_CANCELLED`.
    pub async fn fetch_user(&self, email: &str) -> Result<UserProfile> {
        let pending = self.begin_fetch();

        let result = self
            .directory
            .find_by_email(email)
            .await
            .and_then(|users| {
                users
                    .into_iter()
                    .next()
                    .ok_or_else(|| UserError::not_found(email))
            });

        let action = match &result {
            Ok(profile) => UserAction::FetchFulfilled(profile.clone()),
            Err(e) => UserAction::FetchRejected(e.to_string()),
        };

        if !pending.settle(action) {
            self.record(LogEvent::new("user_fetch_superseded"));
            return Err(UserError::Superseded);
        }

        match result {
            Ok(profile) => {
                self.record(LogEvent::new("user_fetch_succeeded"));
                Ok(profile)
            }
            Err(e) => {
                self.record(
                    LogEvent::new("user_fetch_failed")
                        .with_error(e.log_message())
                        .with_error_details(e.kind()),
                );
                Err(e)
            }
        }
    }

    /// Clear the session user and return to `Idle`
    ///
    /// Any fetch still in flight is superseded.
    pub fn logout(&self) {
        self.apply_and_advance(UserAction::Logout);
        self.record(LogEvent::new("user_logout"));
    }

    /// Overwrite the whole state
    ///
    /// Any fetch still in flight is superseded.
    pub fn replace(&self, next: UserState) {
        self.apply_and_advance(UserAction::Replace(next));
    }

    /// Submit a profile to the registration endpoint
    ///
    /// Never touches the session state. Failures are logged and returned.
    pub async fn register(&self, profile: &UserProfile) -> Result<()> {
        match self.directory.register(profile).await {
            Ok(()) => {
                self.record(LogEvent::new("user_register_succeeded"));
                Ok(())
            }
            Err(e) => {
                self.record(
                    LogEvent::new("user_register_failed")
                        .with_error(e.log_message())
                        .with_error_details(e.kind()),
                );
                Err(e)
            }
        }
    }

    // === Internals ===

    /// Take a new token and mark the state as loading
    fn begin_fetch(&self) -> PendingFetch<'_> {
        let mut token = 0;
        self.state.send_modify(|state| {
            token = self.latest_token.fetch_add(1, Ordering::SeqCst) + 1;
            reduce(state, UserAction::FetchPending);
        });
        PendingFetch {
            store: self,
            token,
            settled: false,
        }
    }

    /// Apply `action` only if `token` is still the latest
    fn apply_if_current(&self, token: u64, action: UserAction) -> bool {
        self.state.send_if_modified(|state| {
            if self.latest_token.load(Ordering::SeqCst) != token {
                return false;
            }
            reduce(state, action);
            true
        })
    }

    /// Apply `action` and invalidate every outstanding token
    fn apply_and_advance(&self, action: UserAction) {
        self.state.send_modify(|state| {
            self.latest_token.fetch_add(1, Ordering::SeqCst);
            reduce(state, action);
        });
    }

    /// Record an event; sink failures never break an operation
    ///
    /// The sink runs inline on the calling task. `LoggingService` writes to
    /// DuckDB synchronously, so each event briefly occupies the executor
    /// thread; events stay in operation order.
    fn record(&self, event: LogEvent) {
        if let Some(sink) = &self.sink {
            let _ = sink.record(event.with_directory(self.directory.name()));
        }
    }
}

/// An issued fetch token that has not been settled yet
///
/// Dropping it unsettled rejects the fetch, provided no newer request has
/// taken over in the meantime.
struct PendingFetch<'a> {
    store: &'a UserStore,
    token: u64,
    settled: bool,
}

impl PendingFetch<'_> {
    /// Apply the lookup outcome; false if the fetch was superseded
    fn settle(mut self, action: UserAction) -> bool {
        self.settled = true;
        self.store.apply_if_current(self.token, action)
    }
}

impl Drop for PendingFetch<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let rejected = UserAction::FetchRejected(FETCH_CANCELLED.to_string());
        if self.store.apply_if_current(self.token, rejected) {
            self.store.record(LogEvent::new("user_fetch_cancelled"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::demo::DemoDirectory;
    use crate::adapters::memory_sink::MemoryEventSink;

    fn demo_store() -> (UserStore, Arc<MemoryEventSink>) {
        let sink = Arc::new(MemoryEventSink::new());
        let store = UserStore::new(Arc::new(DemoDirectory::new())).with_sink(sink.clone());
        (store, sink)
    }

    #[test]
    fn test_new_store_is_idle_and_anonymous() {
        let (store, _) = demo_store();
        assert_eq!(store.status(), LoadStatus::Idle);
        assert_eq!(store.select_user_id(), 0);
        assert!(!store.is_logged_in());
        assert_eq!(store.directory_name(), "demo");
    }

    #[tokio::test]
    async fn test_fetch_success_populates_profile() {
        let (store, sink) = demo_store();

        let profile = store.fetch_user("ann@example.com").await.unwrap();

        let state = store.state();
        assert_eq!(state.status, LoadStatus::Succeeded);
        assert_eq!(state.profile, profile);
        assert_eq!(store.select_user_id(), 1);
        assert!(store.is_logged_in());
        assert_eq!(sink.event_names(), vec!["user_fetch_succeeded"]);
        assert_eq!(sink.events()[0].directory.as_deref(), Some("demo"));
    }

    #[tokio::test]
    async fn test_fetch_unknown_email_fails_and_keeps_profile() {
        let (store, sink) = demo_store();
        store.fetch_user("ann@example.com").await.unwrap();
        let before = store.state().profile;

        let err = store.fetch_user("nobody@x.com").await.unwrap_err();

        assert!(matches!(err, UserError::NotFound(ref e) if e == "nobody@x.com"));
        let state = store.state();
        assert_eq!(state.status, LoadStatus::Failed);
        assert_eq!(state.profile, before);
        assert!(state.last_error.unwrap().contains("nobody@x.com"));
        let failed = &sink.events()[1];
        assert_eq!(failed.event, "user_fetch_failed");
        assert_eq!(failed.error_details.as_deref(), Some("not_found"));
    }

    #[tokio::test]
    async fn test_logout_after_fetch_resets() {
        let (store, _) = demo_store();
        store.fetch_user("ben@example.com").await.unwrap();

        store.logout();

        assert_eq!(store.status(), LoadStatus::Idle);
        assert_eq!(store.select_user_id(), 0);
        assert_eq!(store.state(), UserState::default());
    }

    #[test]
    fn test_replace_sets_whole_state() {
        let (store, _) = demo_store();
        let next = UserState::new(
            UserProfile::new(42, "Zed", "zed", "zed@example.com"),
            LoadStatus::Succeeded,
        );

        store.replace(next.clone());

        assert_eq!(store.state(), next);
        assert_eq!(store.select_user_id(), 42);
    }

    #[tokio::test]
    async fn test_register_leaves_state_untouched() {
        let (store, sink) = demo_store();
        let before = store.state();

        store
            .register(&UserProfile::new(0, "Dee", "dee", "dee@example.com"))
            .await
            .unwrap();

        assert_eq!(store.state(), before);
        assert_eq!(sink.event_names(), vec!["user_register_succeeded"]);

        // The demo directory makes the new user visible to lookups
        let profile = store.fetch_user("dee@example.com").await.unwrap();
        assert_eq!(profile.username, "dee");
    }
}
