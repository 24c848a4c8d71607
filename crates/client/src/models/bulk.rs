//! Models for the provider's array-accepting custom endpoints.
//!
//! These endpoints are not transactional: each id succeeds or fails on its
//! own and the reply lists one result per id. Depending on the plugin build
//! the list is either the bare body or wrapped in an object field
//! (`results` or `items`); both shapes are accepted.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::users::CreateUserParams;

/// Body of `POST /users/bulk/suspension`.
#[derive(Debug, Serialize, Clone)]
pub struct BulkSuspensionRequest {
    pub ids: Vec<u64>,
    pub suspended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Body of `POST /users/bulk/delete`.
#[derive(Debug, Serialize, Clone)]
pub struct BulkDeleteRequest {
    pub ids: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reassign: Option<u64>,
}

/// Body of `POST /users/bulk/create`.
#[derive(Debug, Serialize, Clone)]
pub struct BulkCreateRequest {
    pub users: Vec<CreateUserParams>,
}

/// Outcome of one id inside an array-endpoint reply.
#[derive(Debug, Deserialize, Clone)]
pub struct BulkItemResult {
    /// Target id; for creations, the id of the new account if one was made.
    #[serde(default, deserialize_with = "crate::serde_helpers::opt_u64_from_string_or_number")]
    pub id: Option<u64>,
    /// Echoed username, present on creation replies.
    pub username: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_helpers::bool_from_any")]
    pub success: bool,
    #[serde(default, deserialize_with = "crate::serde_helpers::bool_from_any")]
    pub already_in_state: bool,
    pub code: Option<String>,
    pub message: Option<String>,
    #[serde(default, with = "crate::serde_helpers::opt_secret_string")]
    pub generated_password: Option<SecretString>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BulkReplyShape {
    List(Vec<BulkItemResult>),
    Wrapped {
        #[serde(alias = "items")]
        results: Vec<BulkItemResult>,
    },
}

/// Parse an array-endpoint reply in either accepted shape.
pub fn parse_bulk_reply(body: &str) -> Result<Vec<BulkItemResult>, serde_json::Error> {
    let shape: BulkReplyShape = serde_json::from_str(body)?;
    Ok(match shape {
        BulkReplyShape::List(items) => items,
        BulkReplyShape::Wrapped { results } => results,
    })
}
