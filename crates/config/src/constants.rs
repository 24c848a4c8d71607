//! Centralized constants for the Roster workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication and improve maintainability.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum allowed connection timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Default maximum number of retries for rate-limited or transient failures.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Maximum allowed value for `max_retries`.
pub const MAX_MAX_RETRIES: usize = 10;

/// Base path of the provider's REST namespace, appended to the base URL.
pub const DEFAULT_API_PREFIX: &str = "/wp-json/roster/v1";

// =============================================================================
// Search & Pagination Defaults
// =============================================================================

/// Default number of remote resources requested per search page.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Largest page size the provider accepts.
pub const MAX_PER_PAGE: u32 = 100;

// =============================================================================
// Batch Execution Defaults
// =============================================================================

/// Default number of in-flight provider calls per batch.
///
/// Kept small so a single batch stays under the provider's implicit rate limit.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 4;

/// Upper bound for the batch concurrency setting.
pub const MAX_BATCH_CONCURRENCY: usize = 16;

/// Default timeout for a single batch item call in seconds.
pub const DEFAULT_ITEM_TIMEOUT_SECS: u64 = 15;

/// Default number of ids sent per call to an array-accepting endpoint.
pub const DEFAULT_BULK_CHUNK_SIZE: usize = 50;

/// Largest chunk accepted by the array-accepting endpoints.
pub const MAX_BULK_CHUNK_SIZE: usize = 500;

/// Default number of failed items listed in a rendered report summary.
pub const DEFAULT_FAILURE_PREVIEW: usize = 5;

/// Default phrase an operator must type before a destructive batch runs.
pub const DEFAULT_CONFIRM_PHRASE: &str = "DELETE";
