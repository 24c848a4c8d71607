//! REST API endpoint implementations.
//!
//! Each function performs one provider call. They take the HTTP client, the
//! API root (`{base_url}{api_prefix}`), the auth strategy, the call's
//! parameters, the retry budget and an optional metrics collector, so they can
//! be exercised directly against a mock server without building a client.

mod bulk;
mod courses;
mod enrollments;
mod request;
mod users;

pub use bulk::{bulk_create_users, bulk_delete_users, bulk_set_suspension};
pub use courses::search_courses;
pub use enrollments::enroll_user;
pub use request::{decode_json, send_request_with_retry, send_write_request};
pub use users::{create_user, delete_user, search_users, set_user_suspension};
