//! Retry helper for HTTP requests with exponential backoff.
//!
//! Responsibilities:
//! - Retry transient failures of reads (HTTP 429/502/503/504, connection
//!   errors) with exponential backoff (1s, 2s, 4s = 2^attempt), honouring
//!   `Retry-After`.
//! - Send writes at most once as far as the provider can tell: only
//!   connection failures, where no request reached the server, are retried.
//! - Convert non-success responses into typed `ClientError`s, keeping the
//!   provider's error `code`.
//! - Record per-attempt request metrics.
//!
//! Does NOT handle:
//! - Per-item batch timeouts (the engine wraps whole calls in its own timeout).
//! - Deserializing success bodies (see `decode_json`).

use std::time::{Duration, Instant};

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::ProviderErrorBody;

/// Upper bound applied to a server-supplied `Retry-After`.
const MAX_RETRY_AFTER_SECS: u64 = 60;

/// Error bodies longer than this are truncated before being kept in a message.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Sends an HTTP request with automatic retry logic for transient failures.
///
/// # Arguments
///
/// * `builder` - The `reqwest::RequestBuilder` to execute
/// * `max_retries` - Maximum number of retry attempts after the first request
/// * `endpoint` - Path template used as the metrics label (e.g. `/users/{id}`)
/// * `method` - HTTP method used as the metrics label
/// * `metrics` - Optional metrics collector
///
/// # Errors
///
/// Returns `ClientError::MaxRetriesExceeded` when a request is still rate
/// limited after every attempt. A retryable 5xx that persists is returned as
/// the `ApiError` of the last response.
pub async fn send_request_with_retry(
    builder: RequestBuilder,
    max_retries: usize,
    endpoint: &str,
    method: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    send_recorded(builder, RetryOn::Transient, max_retries, endpoint, method, metrics).await
}

/// Sends a mutating request (suspend, delete, create, enroll, array endpoints).
///
/// Any response the provider produced is final, including 429 and 5xx, since
/// the write may already have been applied. Only connection failures are
/// retried, up to `max_retries` times.
///
/// # Errors
///
/// A 429 surfaces as `ClientError::RateLimited`; other non-success statuses
/// as the typed error of that response.
pub async fn send_write_request(
    builder: RequestBuilder,
    max_retries: usize,
    endpoint: &str,
    method: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    send_recorded(builder, RetryOn::ConnectOnly, max_retries, endpoint, method, metrics).await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryOn {
    /// Transient statuses and connection failures.
    Transient,
    /// Connection failures only.
    ConnectOnly,
}

async fn send_recorded(
    builder: RequestBuilder,
    retry_on: RetryOn,
    max_retries: usize,
    endpoint: &str,
    method: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    let result = send_inner(builder, retry_on, max_retries, endpoint, method, metrics).await;
    if let (Err(e), Some(m)) = (&result, metrics) {
        m.record_client_error(endpoint, method, e);
    }
    result
}

async fn send_inner(
    builder: RequestBuilder,
    retry_on: RetryOn,
    max_retries: usize,
    endpoint: &str,
    method: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    for attempt in 0..=max_retries {
        let attempt_builder = match builder.try_clone() {
            Some(cloned) => cloned,
            None if attempt == 0 => {
                debug!("Request builder cannot be cloned, single attempt only");
                if let Some(m) = metrics {
                    m.record_request(endpoint, method);
                }
                let response = builder.send().await?;
                return check_status(response).await;
            }
            None => {
                debug!("Cannot clone request builder for retry");
                return Err(ClientError::MaxRetriesExceeded(attempt));
            }
        };

        if let Some(m) = metrics {
            m.record_request(endpoint, method);
            if attempt > 0 {
                m.record_retry(endpoint, method, attempt);
            }
        }

        let started = Instant::now();
        let sent = attempt_builder.send().await;
        if let Some(m) = metrics {
            let status = sent.as_ref().ok().map(|r| r.status().as_u16());
            m.record_request_duration(endpoint, method, started.elapsed(), status);
        }

        let has_retries_left = attempt < max_retries;
        match sent {
            Ok(response)
                if retry_on == RetryOn::ConnectOnly && response.status().as_u16() == 429 =>
            {
                return Err(ClientError::RateLimited(retry_after(&response)));
            }
            Ok(response)
                if retry_on == RetryOn::Transient
                    && ClientError::is_retryable_status(response.status().as_u16()) =>
            {
                let status = response.status().as_u16();
                if has_retries_left {
                    let backoff = retry_after(&response).unwrap_or_else(|| backoff_for(attempt));
                    debug!(
                        attempt = attempt + 1,
                        max_retries = max_retries + 1,
                        status,
                        backoff_ms = backoff.as_millis() as u64,
                        "Transient provider response, retrying with backoff"
                    );
                    tokio::time::sleep(backoff).await;
                } else if status == 429 {
                    debug!(
                        attempts = attempt + 1,
                        "Max retries exhausted for rate-limited request"
                    );
                    if max_retries == 0 {
                        return Err(ClientError::RateLimited(retry_after(&response)));
                    }
                    return Err(ClientError::MaxRetriesExceeded(max_retries + 1));
                } else {
                    return Err(error_from_response(response).await);
                }
            }
            Ok(response) => {
                if attempt > 0 && response.status().is_success() {
                    debug!(attempt = attempt + 1, "Request succeeded after retry");
                }
                return check_status(response).await;
            }
            Err(e) if e.is_connect() && has_retries_left => {
                let backoff = backoff_for(attempt);
                debug!(
                    attempt = attempt + 1,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %e,
                    "Connection failed, retrying with backoff"
                );
                tokio::time::sleep(backoff).await;
            }
            Err(e) => return Err(ClientError::from(e)),
        }
    }

    Err(ClientError::MaxRetriesExceeded(max_retries + 1))
}

fn backoff_for(attempt: usize) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt as u32))
}

fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(|secs| Duration::from_secs(secs.min(MAX_RETRY_AFTER_SECS)))
}

async fn check_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(error_from_response(response).await)
    }
}

/// Build a typed error from a non-success response.
async fn error_from_response(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let url = response.url().to_string();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response body".to_string());

    let parsed = serde_json::from_str::<ProviderErrorBody>(&body).ok();
    let code = parsed.as_ref().and_then(|b| b.code.clone());
    let message = parsed
        .and_then(|b| b.message)
        .unwrap_or_else(|| truncate(&body));

    match status {
        401 => ClientError::Unauthorized(if message.is_empty() {
            url
        } else {
            message
        }),
        404 if body.trim().is_empty() => ClientError::NotFound(url),
        _ => ClientError::ApiError {
            status,
            url,
            code,
            message,
        },
    }
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

/// Decode a success body, recording a metric when it does not match `T`.
pub async fn decode_json<T: DeserializeOwned>(
    response: Response,
    endpoint: &str,
    model_type: &'static str,
    metrics: Option<&MetricsCollector>,
) -> Result<T> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        if let Some(m) = metrics {
            m.record_deserialization_failure(endpoint, model_type);
        }
        ClientError::InvalidResponse(format!("Failed to parse {model_type}: {e}"))
    })
}
