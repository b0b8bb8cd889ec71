//! User directory port
//!
//! Defines the interface for looking up and registering users with a
//! remote directory (HTTP service, demo data, test doubles).

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::UserProfile;

/// Remote user directory
///
/// The `UserStore` drives this trait without knowing whether it talks to a
/// real HTTP service or to in-memory data.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Directory name (e.g., "http", "demo")
    fn name(&self) -> &str;

    /// Look up users whose email matches exactly
    ///
    /// Zero matches is not an error at this level; an empty vector is
    /// returned and the caller decides what it means.
    async fn find_by_email(&self, email: &str) -> Result<Vec<UserProfile>>;

    /// Submit a new user for registration
    async fn register(&self, profile: &UserProfile) -> Result<()>;
}
