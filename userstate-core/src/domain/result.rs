//! Result and error types for the core library

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by user state operations
///
/// None of these are fatal: every one is recovered from by retrying the
/// operation that produced it.
#[derive(Error, Debug)]
pub enum UserError {
    /// Directory unreachable, timed out, or answered with a non-2xx status
    #[error("Network error: {0}")]
    Network(String),

    /// Email lookup matched zero records
    #[error("No user found for email '{0}'")]
    NotFound(String),

    /// Response body could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A newer request (or a logout/replace) took over while this fetch was in flight
    #[error("Fetch superseded by a newer request")]
    Superseded,
}

impl UserError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a not found error
    pub fn not_found(email: impl Into<String>) -> Self {
        Self::NotFound(email.into())
    }

    /// Create a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Message safe to write to the event log (no email addresses)
    pub fn log_message(&self) -> String {
        match self {
            Self::NotFound(_) => "No user found for email".to_string(),
            other => other.to_string(),
        }
    }

    /// Short machine-readable kind, used as log context
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::NotFound(_) => "not_found",
            Self::Serialization(_) => "serialization",
            Self::Config(_) => "config",
            Self::Superseded => "superseded",
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, UserError>;

/// Operation result with optional context (for JSON output)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            context: None,
        }
    }

    /// Create a failed result
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: None,
        }
    }

    /// Attach a context value
    pub fn with_context(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.context
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }
}

impl<T> From<&UserError> for OperationResult<T> {
    /// Failed result carrying the error's kind as context
    fn from(error: &UserError) -> Self {
        Self::fail(error.to_string()).with_context("kind", serde_json::json!(error.kind()))
    }
}
