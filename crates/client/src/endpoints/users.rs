//! User management endpoints.

use reqwest::Client;

use crate::auth::AuthStrategy;
use crate::endpoints::{decode_json, send_request_with_retry, send_write_request};
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::models::{
    CreateUserParams, CreateUserResponse, OperationResponse, Page, SearchQuery,
    SuspensionRequest, SuspensionResponse, User,
};

/// Search users, one page at a time.
pub async fn search_users(
    client: &Client,
    api_root: &str,
    auth: &AuthStrategy,
    query: &SearchQuery,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<Page<User>> {
    let url = format!("{}/users", api_root);

    let builder = auth.apply(client.get(&url).query(&query.to_query_params()));
    let response = send_request_with_retry(builder, max_retries, "/users", "GET", metrics).await?;

    decode_json(response, "/users", "Page<User>", metrics).await
}

/// Suspend or reactivate a single user.
#[allow(clippy::too_many_arguments)]
pub async fn set_user_suspension(
    client: &Client,
    api_root: &str,
    auth: &AuthStrategy,
    user_id: u64,
    suspended: bool,
    reason: Option<&str>,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<SuspensionResponse> {
    let url = format!("{}/users/{}/suspension", api_root, user_id);
    let body = SuspensionRequest {
        suspended,
        reason: reason.map(str::to_string),
    };

    let builder = auth.apply(client.post(&url).json(&body));
    let response = send_write_request(
        builder,
        max_retries,
        "/users/{id}/suspension",
        "POST",
        metrics,
    )
    .await?;

    decode_json(
        response,
        "/users/{id}/suspension",
        "SuspensionResponse",
        metrics,
    )
    .await
}

/// Permanently delete a user, optionally reassigning their content.
pub async fn delete_user(
    client: &Client,
    api_root: &str,
    auth: &AuthStrategy,
    user_id: u64,
    reassign_to: Option<u64>,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<OperationResponse> {
    let url = format!("{}/users/{}", api_root, user_id);

    let mut query_params: Vec<(&str, String)> = vec![("force", "true".to_string())];
    if let Some(target) = reassign_to {
        query_params.push(("reassign", target.to_string()));
    }

    let builder = auth.apply(client.delete(&url).query(&query_params));
    let response =
        send_write_request(builder, max_retries, "/users/{id}", "DELETE", metrics).await?;

    decode_json(response, "/users/{id}", "OperationResponse", metrics).await
}

/// Create a new user.
pub async fn create_user(
    client: &Client,
    api_root: &str,
    auth: &AuthStrategy,
    params: &CreateUserParams,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<CreateUserResponse> {
    let url = format!("{}/users", api_root);

    let builder = auth.apply(client.post(&url).json(params));
    let response = send_write_request(builder, max_retries, "/users", "POST", metrics).await?;

    decode_json(response, "/users", "CreateUserResponse", metrics).await
}
