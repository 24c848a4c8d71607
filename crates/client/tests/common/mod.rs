//! Common test utilities for integration tests.
//!
//! This module provides shared helper functions and re-exports commonly used
//! types for testing the provider client.
//!
//! # Invariants
//! - Fixtures are loaded from the `fixtures/` directory relative to the crate root
//! - Endpoint functions are called with `{mock_server.uri()}{API_PREFIX}` as the API root
//!
//! # What this does NOT handle
//! - Mock server setup (use wiremock directly in tests)

use std::time::Duration;

#[allow(unused_imports)]
pub use roster_client::testing::load_fixture;

#[allow(unused_imports)]
pub use reqwest::Client;
#[allow(unused_imports)]
pub use roster_client::endpoints;
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

use roster_client::AuthStrategy;
use secrecy::SecretString;

/// REST namespace the provider serves under.
#[allow(dead_code)]
pub const API_PREFIX: &str = "/wp-json/roster/v1";

/// API root for endpoint functions pointed at a mock server.
#[allow(dead_code)]
pub fn api_root(server: &MockServer) -> String {
    format!("{}{}", server.uri(), API_PREFIX)
}

/// Full request path under the API prefix, for wiremock `path` matchers.
#[allow(dead_code)]
pub fn api_path(suffix: &str) -> String {
    format!("{}{}", API_PREFIX, suffix)
}

#[allow(dead_code)]
pub fn token_auth() -> AuthStrategy {
    AuthStrategy::ApiToken {
        token: SecretString::new("test-token".to_string().into()),
    }
}

/// Advance Tokio's paused clock and yield so sleepers can observe the change.
#[allow(dead_code)]
pub async fn advance_and_yield(duration: Duration) {
    tokio::time::advance(duration).await;
    tokio::task::yield_now().await;
}

/// Assert that a task has not completed after yielding to the scheduler.
#[allow(dead_code)]
pub async fn assert_pending<T>(handle: &tokio::task::JoinHandle<T>, context: &str) {
    tokio::task::yield_now().await;
    assert!(!handle.is_finished(), "Expected pending task: {}", context);
}
