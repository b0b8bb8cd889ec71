//! User domain model

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// Public profile of a user as served by the user directory
///
/// Every field has an "unset" default: `id == 0` is the anonymous user,
/// empty strings are unset text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub address: Address,
}

/// Postal address attached to a profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Geo,
}

/// Coordinates of an address
///
/// The public directory serves these as strings (`"-37.3159"`), other
/// backends as numbers. Both are accepted; output is always numeric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geo {
    #[serde(deserialize_with = "deserialize_coordinate")]
    pub lat: f64,
    #[serde(deserialize_with = "deserialize_coordinate")]
    pub lng: f64,
}

/// Deserialize a coordinate that can be number, numeric string or null
fn deserialize_coordinate<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: JsonValue = Deserialize::deserialize(deserializer)?;
    match value {
        JsonValue::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom("coordinate out of range")),
        JsonValue::String(s) if s.trim().is_empty() => Ok(0.0),
        JsonValue::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| D::Error::custom(format!("invalid coordinate '{}': {}", s, e))),
        JsonValue::Null => Ok(0.0),
        _ => Err(D::Error::custom("expected number or string for coordinate")),
    }
}

impl UserProfile {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            username: username.into(),
            email: email.into(),
            address: Address::default(),
        }
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    /// True for the all-default profile
    pub fn is_anonymous(&self) -> bool {
        self.id == 0
    }
}

/// Coarse state of the remote fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl LoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStatus::Idle => "idle",
            LoadStatus::Loading => "loading",
            LoadStatus::Succeeded => "succeeded",
            LoadStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session user state: the current profile plus its load status
///
/// The profile is flattened so the serialized form matches the
/// directory's record shape with an extra `status` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(default)]
    pub status: LoadStatus,
    /// Message of the most recent failed fetch, cleared when a new one starts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl UserState {
    pub fn new(profile: UserProfile, status: LoadStatus) -> Self {
        Self {
            profile,
            status,
            last_error: None,
        }
    }

    pub fn id(&self) -> i64 {
        self.profile.id
    }

    pub fn is_logged_in(&self) -> bool {
        self.status == LoadStatus::Succeeded && !self.profile.is_anonymous()
    }
}
