//! Shared test utilities for roster CLI integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic command factory that prevents dotenv loading and host
//!   `ROSTER_*` leakage.
//! - Mount the provider endpoints most tests need on a wiremock server.
//!
//! Invariants / Assumptions:
//! - `ROSTER_API_TOKEN` is set to "test-token" unless overridden.
//! - Commands never prompt: stdin is not a terminal under assert_cmd.

use assert_cmd::Command;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(dead_code)]
pub const API_PREFIX: &str = "/wp-json/roster/v1";

/// Hermetic `roster` command.
pub fn roster_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("roster");

    cmd.env("DOTENV_DISABLED", "1");
    cmd.env("ROSTER_API_TOKEN", "test-token");

    for var in [
        "ROSTER_BASE_URL",
        "ROSTER_USERNAME",
        "ROSTER_APP_PASSWORD",
        "ROSTER_PROFILE",
        "ROSTER_CONFIG_PATH",
        "ROSTER_BATCH_CONCURRENCY",
        "ROSTER_USE_BULK_ENDPOINTS",
        "ROSTER_CONFIRM_PHRASE",
        "ROSTER_ORDER_RESOLUTION_URL",
        "ROSTER_MAX_RETRIES",
        "ROSTER_METRICS_FILE",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("ROSTER_MAX_RETRIES", "0");

    cmd
}

/// Hermetic `roster` command pointed at `server`.
#[allow(dead_code)]
pub fn roster_cmd_for(server: &MockServer) -> Command {
    let mut cmd = roster_cmd();
    cmd.env("ROSTER_BASE_URL", server.uri());
    cmd
}

#[allow(dead_code)]
pub fn api(suffix: &str) -> String {
    format!("{API_PREFIX}{suffix}")
}

/// Answer `POST /users/{id}/suspension` for `id` with `body`.
#[allow(dead_code)]
pub async fn mount_suspension(server: &MockServer, id: u64, status: u16, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(api(&format!("/users/{id}/suspension"))))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Answer the `GET /users?include=...` lookup with `(id, suspended)` users.
#[allow(dead_code)]
pub async fn mount_user_lookup(server: &MockServer, users: &[(u64, bool)]) {
    let items: Vec<serde_json::Value> = users
        .iter()
        .map(|&(id, suspended)| {
            json!({
                "id": id,
                "username": format!("user{id}"),
                "display_name": format!("User {id}"),
                "email": format!("user{id}@example.com"),
                "is_suspended": suspended
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path(api("/users")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": items,
            "has_more": false,
            "total_filtered": users.len(),
            "total_global": users.len()
        })))
        .mount(server)
        .await;
}
