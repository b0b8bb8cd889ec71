//! Demo user directory
//!
//! In-memory directory seeded with a handful of users, so the CLI and tests
//! can run without network access. Registrations are appended to the
//! in-memory list and become visible to later lookups.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::result::{Result, UserError};
use crate::domain::{Address, Geo, UserProfile};
use crate::ports::UserDirectory;

/// Generate the demo users
pub fn generate_demo_users() -> Vec<UserProfile> {
    vec![
        UserProfile::new(1, "Ann Example", "ann", "ann@example.com").with_address(Address {
            street: "Kulas Light".to_string(),
            suite: "Apt. 556".to_string(),
            city: "Gwenborough".to_string(),
            zipcode: "92998-3874".to_string(),
            geo: Geo {
                lat: -37.3159,
                lng: 81.1496,
            },
        }),
        UserProfile::new(2, "Ben Example", "ben", "ben@example.com").with_address(Address {
            street: "Victor Plains".to_string(),
            suite: "Suite 879".to_string(),
            city: "Wisokyburgh".to_string(),
            zipcode: "90566-7771".to_string(),
            geo: Geo {
                lat: -43.9509,
                lng: -34.4618,
            },
        }),
        UserProfile::new(3, "Cleo Example", "cleo", "cleo@example.com").with_address(Address {
            street: "Douglas Extension".to_string(),
            suite: "Suite 847".to_string(),
            city: "McKenziehaven".to_string(),
            zipcode: "59590-4157".to_string(),
            geo: Geo {
                lat: -68.6102,
                lng: -47.0653,
            },
        }),
    ]
}

/// Demo directory backed by a vector of users
pub struct DemoDirectory {
    users: Mutex<Vec<UserProfile>>,
}

impl DemoDirectory {
    /// Directory with the demo users
    pub fn new() -> Self {
        Self::with_users(generate_demo_users())
    }

    /// Directory with an explicit user list
    pub fn with_users(users: Vec<UserProfile>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }

    pub fn len(&self) -> usize {
        self.users.lock().map(|u| u.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DemoDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectory for DemoDirectory {
    fn name(&self) -> &str {
        "demo"
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<UserProfile>> {
        let users = self
            .users
            .lock()
            .map_err(|e| UserError::network(format!("Lock poisoned: {}", e)))?;
        Ok(users.iter().filter(|u| u.email == email).cloned().collect())
    }

    async fn register(&self, profile: &UserProfile) -> Result<()> {
        let mut users = self
            .users
            .lock()
            .map_err(|e| UserError::network(format!("Lock poisoned: {}", e)))?;

        let mut profile = profile.clone();
        if profile.id == 0 {
            profile.id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        }
        users.push(profile);
        Ok(())
    }
}
