//! Main provider REST API client.
//!
//! This module provides the primary [`ProviderClient`] for interacting with the
//! identity-and-enrollment provider.
//!
//! # Submodules
//! - [`builder`]: Client construction and configuration
//! - `users`: User search, suspension, deletion and creation methods
//! - `courses`: Course search and enrollment methods
//! - `bulk`: Array-accepting custom endpoint methods
//!
//! # What this module does NOT handle:
//! - Direct HTTP request implementation (delegated to [`crate::endpoints`])
//! - Batch orchestration (see the engine crate)
//!
//! # Invariants
//! - Every method takes `&self`; one client is shared by concurrent batch workers.
//! - Credentials are stateless (bearer token or application password), so no
//!   method ever re-authenticates.

pub mod builder;

mod bulk;
mod courses;
mod users;

use crate::auth::AuthStrategy;
use crate::metrics::MetricsCollector;

/// Provider REST API client.
///
/// # Creating a Client
///
/// ```rust,ignore
/// use roster_client::{AuthStrategy, ProviderClient};
/// use secrecy::SecretString;
///
/// let client = ProviderClient::builder()
///     .base_url("https://academy.example.com".to_string())
///     .auth_strategy(AuthStrategy::ApiToken {
///         token: SecretString::new("my-token".to_string().into()),
///     })
///     .build()?;
/// ```
#[derive(Debug)]
pub struct ProviderClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) api_root: String,
    pub(crate) auth: AuthStrategy,
    pub(crate) max_retries: usize,
    pub(crate) metrics: Option<MetricsCollector>,
}

impl ProviderClient {
    /// Create a new client builder.
    pub fn builder() -> builder::ProviderClientBuilder {
        builder::ProviderClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL joined with the API prefix; every endpoint path hangs off this.
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Check if using API token authentication.
    pub fn is_api_token_auth(&self) -> bool {
        self.auth.is_api_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use secrecy::SecretString;

    fn token() -> AuthStrategy {
        AuthStrategy::ApiToken {
            token: SecretString::new("test-token".to_string().into()),
        }
    }

    #[test]
    fn test_client_builder_with_api_token() {
        let client = ProviderClient::builder()
            .base_url("https://academy.example.com".to_string())
            .auth_strategy(token())
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "https://academy.example.com");
        assert_eq!(
            client.api_root(),
            "https://academy.example.com/wp-json/roster/v1"
        );
        assert!(client.is_api_token_auth());
    }

    #[test]
    fn test_client_builder_missing_base_url() {
        let client = ProviderClient::builder().auth_strategy(token()).build();
        assert!(matches!(client.unwrap_err(), ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_client_builder_missing_auth() {
        let client = ProviderClient::builder()
            .base_url("https://academy.example.com".to_string())
            .build();
        assert!(matches!(client.unwrap_err(), ClientError::AuthFailed(_)));
    }

    #[test]
    fn test_client_builder_custom_prefix() {
        let client = ProviderClient::builder()
            .base_url("https://academy.example.com/".to_string())
            .api_prefix("custom/v2/".to_string())
            .auth_strategy(token())
            .build()
            .unwrap();
        assert_eq!(client.api_root(), "https://academy.example.com/custom/v2");
    }

    #[test]
    fn test_skip_verify_with_http_url() {
        // Succeeds but logs that skip_verify has no effect.
        let client = ProviderClient::builder()
            .base_url("http://localhost:8080".to_string())
            .auth_strategy(token())
            .skip_verify(true)
            .build();
        assert!(client.is_ok());
    }
}
