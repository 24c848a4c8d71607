//! Course catalog endpoints.

use reqwest::Client;

use crate::auth::AuthStrategy;
use crate::endpoints::{decode_json, send_request_with_retry};
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::models::{Course, Page, SearchQuery};

/// Search courses, one page at a time.
pub async fn search_courses(
    client: &Client,
    api_root: &str,
    auth: &AuthStrategy,
    query: &SearchQuery,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<Page<Course>> {
    let url = format!("{}/courses", api_root);

    let builder = auth.apply(client.get(&url).query(&query.to_query_params()));
    let response =
        send_request_with_retry(builder, max_retries, "/courses", "GET", metrics).await?;

    decode_json(response, "/courses", "Page<Course>", metrics).await
}
