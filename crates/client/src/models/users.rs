//! User models for the provider's user management API.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// A user account as returned by the provider.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    #[serde(deserialize_with = "crate::serde_helpers::u64_from_string_or_number")]
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_helpers::bool_from_any")]
    pub is_suspended: bool,
}

/// Body of `POST /users/{id}/suspension`.
#[derive(Debug, Serialize, Clone)]
pub struct SuspensionRequest {
    pub suspended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Reply to a suspension change.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SuspensionResponse {
    #[serde(default, deserialize_with = "crate::serde_helpers::bool_from_any")]
    pub success: bool,
    /// The account was already in the requested state; nothing changed.
    #[serde(default, deserialize_with = "crate::serde_helpers::bool_from_any")]
    pub already_in_state: bool,
}

/// Parameters for creating a user.
#[derive(Debug, Serialize, Clone)]
pub struct CreateUserParams {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// When absent the provider generates one and returns it once.
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "crate::serde_helpers::opt_secret_string"
    )]
    pub password: Option<SecretString>,
    pub roles: Vec<String>,
}

/// Reply to `POST /users`.
#[derive(Debug, Deserialize, Clone)]
pub struct CreateUserResponse {
    #[serde(default, deserialize_with = "crate::serde_helpers::bool_from_any")]
    pub success: bool,
    #[serde(default, deserialize_with = "crate::serde_helpers::opt_u64_from_string_or_number")]
    pub id: Option<u64>,
    #[serde(default, with = "crate::serde_helpers::opt_secret_string")]
    pub generated_password: Option<SecretString>,
}
