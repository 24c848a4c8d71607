//! Authentication strategies for the provider REST API.
//!
//! The provider accepts either a bearer API token or a WordPress-style
//! application password sent as HTTP basic credentials. Neither needs a
//! login round-trip, so the client holds no session state.

use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};

/// Strategy for authenticating with the provider.
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// Static API token sent as `Authorization: Bearer`.
    ApiToken { token: SecretString },
    /// Username plus application password sent as HTTP basic credentials.
    ApplicationPassword {
        username: String,
        password: SecretString,
    },
}

impl AuthStrategy {
    /// Attach credentials to an outgoing request.
    pub fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            AuthStrategy::ApiToken { token } => builder.bearer_auth(token.expose_secret()),
            AuthStrategy::ApplicationPassword { username, password } => {
                builder.basic_auth(username, Some(password.expose_secret()))
            }
        }
    }

    /// Whether this strategy uses a bearer token.
    pub fn is_api_token(&self) -> bool {
        matches!(self, AuthStrategy::ApiToken { .. })
    }
}

impl From<&roster_config::AuthStrategy> for AuthStrategy {
    fn from(strategy: &roster_config::AuthStrategy) -> Self {
        match strategy {
            roster_config::AuthStrategy::ApiToken { token } => AuthStrategy::ApiToken {
                token: token.clone(),
            },
            roster_config::AuthStrategy::ApplicationPassword { username, password } => {
                AuthStrategy::ApplicationPassword {
                    username: username.clone(),
                    password: password.clone(),
                }
            }
        }
    }
}
