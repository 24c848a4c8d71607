//! Authentication types for Roster configuration.
//!
//! Responsibilities:
//! - Define authentication strategies (bearer API token, application password).
//! - Handle serialization of secret values.
//!
//! Does NOT handle:
//! - Attaching credentials to requests (see client crate).
//!
//! Invariants:
//! - All secret values use `secrecy::SecretString` to prevent accidental logging.
//! - Serialization includes secrets for config file persistence; secrecy is for runtime safety.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::secret_string;

/// Strategy for authenticating with the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuthStrategy {
    /// Static API token sent as a bearer token.
    #[serde(rename = "token")]
    ApiToken {
        #[serde(with = "secret_string")]
        token: SecretString,
    },
    /// Username plus an application password, sent as HTTP basic auth.
    #[serde(rename = "app_password")]
    ApplicationPassword {
        username: String,
        #[serde(with = "secret_string")]
        password: SecretString,
    },
}

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// The authentication strategy to use.
    #[serde(flatten)]
    pub strategy: AuthStrategy,
}
