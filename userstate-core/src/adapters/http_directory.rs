//! HTTP user directory client
//!
//! Talks to a JSON user directory:
//! - GET {base}/users/?email={email} returns an array of user records
//! - POST {registration_url} with `{"user": {...}}` registers a user
//!
//! The default base is the public jsonplaceholder service, whose records
//! carry more fields than we model; those are ignored.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use url::Url;

use crate::config::DirectorySettings;
use crate::domain::result::{Result, UserError};
use crate::domain::UserProfile;
use crate::ports::UserDirectory;

/// Default production directory URL
pub const DEFAULT_DIRECTORY_URL: &str = "https://jsonplaceholder.typicode.com";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Body of a registration request
#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    user: &'a UserProfile,
}

/// HTTP user directory client
#[derive(Debug, Clone)]
pub struct HttpUserDirectory {
    client: Client,
    base_url: String,
    registration_url: Option<String>,
    timeout_secs: u64,
}

impl HttpUserDirectory {
    /// Create a client for the given directory base URL with no
    /// registration endpoint
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, None, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a client from directory settings
    pub fn from_settings(settings: &DirectorySettings) -> Result<Self> {
        Self::with_timeout(
            &settings.base_url,
            settings.registration_url.as_deref(),
            settings.timeout_secs,
        )
    }

    /// Create a client with an explicit registration URL and timeout
    pub fn with_timeout(
        base_url: &str,
        registration_url: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let base_url = validate_url(base_url, "directory base URL")?;
        let registration_url = registration_url
            .filter(|u| !u.trim().is_empty())
            .map(|u| validate_url(u, "registration URL"))
            .transpose()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| UserError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            registration_url,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn registration_url(&self) -> Option<&str> {
        self.registration_url.as_deref()
    }

    /// Endpoint for email lookups (the query string is added per request)
    fn users_endpoint(&self) -> String {
        format!("{}/users/", self.base_url)
    }

    /// Fetch every record matching the email
    pub async fn get_users_by_email(&self, email: &str) -> Result<Vec<UserProfile>> {
        let response = self
            .client
            .get(self.users_endpoint())
            .query(&[("email", email)])
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let response = self.check_response_status(response)?;

        response
            .json::<Vec<UserProfile>>()
            .await
            .map_err(|e| UserError::serialization(format!("Failed to parse users response: {}", e)))
    }

    /// POST a registration request
    pub async fn post_registration(&self, profile: &UserProfile) -> Result<()> {
        let url = self
            .registration_url
            .as_deref()
            .ok_or_else(|| UserError::config("No registration URL configured"))?;

        // .json() sets Content-Type: application/json
        let response = self
            .client
            .post(url)
            .json(&RegisterRequest { user: profile })
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        self.check_response_status(response)?;
        Ok(())
    }

    /// Map request errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> UserError {
        if error.is_timeout() {
            UserError::network(format!(
                "Connection timed out after {} seconds",
                self.timeout_secs
            ))
        } else if error.is_connect() {
            UserError::network("Unable to connect to the user directory")
        } else if error.is_decode() {
            UserError::serialization(error.to_string())
        } else {
            UserError::network(format!("User directory request failed: {}", error))
        }
    }

    /// Check response status and return appropriate errors
    fn check_response_status(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                UserError::network(format!("User directory refused access (HTTP {})", status.as_u16()))
            }
            StatusCode::NOT_FOUND => UserError::network("User directory endpoint not found (HTTP 404)"),
            StatusCode::TOO_MANY_REQUESTS => {
                UserError::network("User directory rate limit exceeded. Please wait a moment and try again.")
            }
            other => UserError::network(format!("User directory error: HTTP {}", other.as_u16())),
        })
    }
}

fn validate_url(raw: &str, what: &str) -> Result<String> {
    let parsed =
        Url::parse(raw.trim()).map_err(|e| UserError::config(format!("Invalid {} '{}': {}", what, raw, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(raw.trim().to_string()),
        scheme => Err(UserError::config(format!(
            "{} must use http or https, got '{}'",
            what, scheme
        ))),
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    fn name(&self) -> &str {
        "http"
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<UserProfile>> {
        self.get_users_by_email(email).await
    }

    async fn register(&self, profile: &UserProfile) -> Result<()> {
        self.post_registration(profile).await
    }
}
