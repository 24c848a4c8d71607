//! Provider REST API client.
//!
//! This crate provides a type-safe async client for the identity-and-enrollment
//! provider's REST surface: paginated user/course search, single-resource
//! mutations and the array-accepting custom endpoints. It supports bearer API
//! tokens and application passwords.

mod auth;
pub mod client;
pub mod error;
pub mod metrics;
pub mod metrics_exporter;
pub mod models;
mod serde_helpers;

pub mod endpoints;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use auth::AuthStrategy;
pub use client::ProviderClient;
pub use client::builder::ProviderClientBuilder;
pub use error::{ClientError, Result};
pub use metrics::{ErrorCategory, MetricsCollector};
pub use metrics_exporter::{MetricsExporter, MetricsExporterError};
pub use models::{
    BulkItemResult, Course, CreateUserParams, CreateUserResponse, EnrollmentResponse,
    OperationResponse, Page, SearchQuery, SortOrder, SuspensionResponse, User,
};
