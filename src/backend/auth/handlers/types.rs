/**
 * Account Handler Types
 *
 * This module defines the request and response types used by the account
 * handlers. Profile images travel as standard base64 strings.
 */

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::backend::auth::users::Account;

/// Registration request
#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    /// Chosen username (letters, digits and @/./+/-/_)
    pub username: String,
    pub email: String,
    /// Plain password, hashed before storage
    pub password: String,
}

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub refresh: String,
    pub access: String,
    pub username: String,
}

/// Token pair response of `/account/token`
#[derive(Serialize, Deserialize, Debug)]
pub struct TokenPairResponse {
    pub refresh: String,
    pub access: String,
}

/// Body carrying a refresh token (logout, token refresh)
///
/// The field is optional so a missing token can be reported by the handler
/// instead of failing deserialization.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh: Option<String>,
}

/// New access token
#[derive(Serialize, Deserialize, Debug)]
pub struct AccessResponse {
    pub access: String,
}

/// Password reset request
#[derive(Deserialize, Serialize, Debug)]
pub struct PasswordResetRequest {
    pub email: String,
}

/// Password reset confirmation
#[derive(Deserialize, Serialize, Debug)]
pub struct PasswordResetConfirmRequest {
    pub new_password: String,
}

/// Generic `{"message": ...}` body
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Public profile
///
/// Safe to return to clients and to cache: no password hash.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Base64 encoded image bytes
    pub profile_image: Option<String>,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

impl From<&Account> for UserResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            profile_image: account.profile_image.as_ref().map(|bytes| STANDARD.encode(bytes)),
            is_active: account.is_active,
            date_joined: account.date_joined,
        }
    }
}

/// Partial profile update; absent fields are left unchanged
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// `null` clears the image
    #[serde(default, deserialize_with = "deserialize_some")]
    pub profile_image: Option<Option<String>>,
}

/// Distinguish an explicit `null` from an absent field
///
/// Use with `#[serde(default)]`: absent gives `None`, `null` gives
/// `Some(None)`.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
