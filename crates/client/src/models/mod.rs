//! Data models for provider API requests and responses.
//!
//! Types are organized by resource in submodules and re-exported here
//! for convenient access.

pub mod bulk;
pub mod common;
pub mod courses;
pub mod enrollments;
pub mod users;

pub use bulk::{
    BulkCreateRequest, BulkDeleteRequest, BulkItemResult, BulkSuspensionRequest, parse_bulk_reply,
};
pub use common::{OperationResponse, Page, ProviderErrorBody, SearchQuery, SortOrder};
pub use courses::Course;
pub use enrollments::{EnrollmentRequest, EnrollmentResponse};
pub use users::{
    CreateUserParams, CreateUserResponse, SuspensionRequest, SuspensionResponse, User,
};
