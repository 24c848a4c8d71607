//! Batch execution settings.
//!
//! Responsibilities:
//! - Hold the tunables of the batch engine: concurrency, per-item timeout,
//!   page size, array-endpoint usage, confirmation phrase and report preview size.
//!
//! Does NOT handle:
//! - Validation of bounds (see `loader::builder`).
//! - Executing batches (see engine crate).

use crate::constants::{
    DEFAULT_BATCH_CONCURRENCY, DEFAULT_BULK_CHUNK_SIZE, DEFAULT_CONFIRM_PHRASE,
    DEFAULT_FAILURE_PREVIEW, DEFAULT_ITEM_TIMEOUT_SECS, DEFAULT_PER_PAGE,
};
use crate::types::duration_seconds;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Batch engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum number of provider calls in flight for one batch.
    pub concurrency: usize,
    /// Timeout applied to each individual item call (serialized as seconds).
    #[serde(with = "duration_seconds")]
    pub item_timeout: Duration,
    /// Page size used by remote searches.
    pub per_page: u32,
    /// Route suspend/unsuspend/delete/create through the array-accepting endpoints.
    pub use_bulk_endpoints: bool,
    /// Number of targets per array-endpoint call.
    pub bulk_chunk_size: usize,
    /// Exact phrase required before a destructive batch is submitted.
    pub confirm_phrase: String,
    /// Number of failed items listed in a rendered summary.
    pub failure_preview: usize,
    /// Where an operator resolves enrollments blocked on a purchase.
    pub order_resolution_url: Option<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_BATCH_CONCURRENCY,
            item_timeout: Duration::from_secs(DEFAULT_ITEM_TIMEOUT_SECS),
            per_page: DEFAULT_PER_PAGE,
            use_bulk_endpoints: false,
            bulk_chunk_size: DEFAULT_BULK_CHUNK_SIZE,
            confirm_phrase: DEFAULT_CONFIRM_PHRASE.to_string(),
            failure_preview: DEFAULT_FAILURE_PREVIEW,
            order_resolution_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_batch_section_fills_defaults() {
        let config: BatchConfig =
            serde_json::from_str(r#"{"concurrency": 2, "confirm_phrase": "ELIMINAR"}"#).unwrap();
        assert_eq!(config.concurrency, 2);
        assert_eq!(config.confirm_phrase, "ELIMINAR");
        assert_eq!(config.per_page, DEFAULT_PER_PAGE);
        assert_eq!(
            config.item_timeout,
            Duration::from_secs(DEFAULT_ITEM_TIMEOUT_SECS)
        );
    }
}
