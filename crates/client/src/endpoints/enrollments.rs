//! Enrollment endpoints.

use reqwest::Client;

use crate::auth::AuthStrategy;
use crate::endpoints::{decode_json, send_write_request};
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::models::{EnrollmentRequest, EnrollmentResponse};

/// Enroll one user into one course.
///
/// A purchase-gated course answers with `precondition_required` instead of an
/// error status; callers decide how to surface it.
pub async fn enroll_user(
    client: &Client,
    api_root: &str,
    auth: &AuthStrategy,
    user_id: u64,
    course_id: u64,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<EnrollmentResponse> {
    let url = format!("{}/users/{}/enrollments", api_root, user_id);

    let builder = auth.apply(client.post(&url).json(&EnrollmentRequest { course_id }));
    let response = send_write_request(
        builder,
        max_retries,
        "/users/{id}/enrollments",
        "POST",
        metrics,
    )
    .await?;

    decode_json(
        response,
        "/users/{id}/enrollments",
        "EnrollmentResponse",
        metrics,
    )
    .await
}
