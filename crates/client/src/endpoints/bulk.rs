//! Array-accepting custom endpoints.
//!
//! Replies are normalized into a flat `Vec<BulkItemResult>` whichever of the
//! accepted shapes the provider sends. Matching results back to targets is
//! the caller's job.

use reqwest::{Client, Response};

use crate::auth::AuthStrategy;
use crate::endpoints::send_write_request;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::{
    BulkCreateRequest, BulkDeleteRequest, BulkItemResult, BulkSuspensionRequest,
    CreateUserParams, parse_bulk_reply,
};

/// Suspend or reactivate many users in one call.
#[allow(clippy::too_many_arguments)]
pub async fn bulk_set_suspension(
    client: &Client,
    api_root: &str,
    auth: &AuthStrategy,
    user_ids: &[u64],
    suspended: bool,
    reason: Option<&str>,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<Vec<BulkItemResult>> {
    let url = format!("{}/users/bulk/suspension", api_root);
    let body = BulkSuspensionRequest {
        ids: user_ids.to_vec(),
        suspended,
        reason: reason.map(str::to_string),
    };

    let builder = auth.apply(client.post(&url).json(&body));
    let response = send_write_request(
        builder,
        max_retries,
        "/users/bulk/suspension",
        "POST",
        metrics,
    )
    .await?;

    read_bulk_reply(response, "/users/bulk/suspension", metrics).await
}

/// Delete many users in one call.
pub async fn bulk_delete_users(
    client: &Client,
    api_root: &str,
    auth: &AuthStrategy,
    user_ids: &[u64],
    reassign_to: Option<u64>,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<Vec<BulkItemResult>> {
    let url = format!("{}/users/bulk/delete", api_root);
    let body = BulkDeleteRequest {
        ids: user_ids.to_vec(),
        reassign: reassign_to,
    };

    let builder = auth.apply(client.post(&url).json(&body));
    let response = send_write_request(
        builder,
        max_retries,
        "/users/bulk/delete",
        "POST",
        metrics,
    )
    .await?;

    read_bulk_reply(response, "/users/bulk/delete", metrics).await
}

/// Create many users in one call.
pub async fn bulk_create_users(
    client: &Client,
    api_root: &str,
    auth: &AuthStrategy,
    users: &[CreateUserParams],
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<Vec<BulkItemResult>> {
    let url = format!("{}/users/bulk/create", api_root);
    let body = BulkCreateRequest {
        users: users.to_vec(),
    };

    let builder = auth.apply(client.post(&url).json(&body));
    let response = send_write_request(
        builder,
        max_retries,
        "/users/bulk/create",
        "POST",
        metrics,
    )
    .await?;

    read_bulk_reply(response, "/users/bulk/create", metrics).await
}

async fn read_bulk_reply(
    response: Response,
    endpoint: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<Vec<BulkItemResult>> {
    let body = response.text().await?;
    parse_bulk_reply(&body).map_err(|e| {
        if let Some(m) = metrics {
            m.record_deserialization_failure(endpoint, "Vec<BulkItemResult>");
        }
        ClientError::InvalidResponse(format!("Unrecognized bulk reply: {e}"))
    })
}
