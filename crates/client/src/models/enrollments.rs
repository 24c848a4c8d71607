//! Enrollment models.

use serde::{Deserialize, Serialize};

/// Body of `POST /users/{subject}/enrollments`.
#[derive(Debug, Serialize, Clone, Copy)]
pub struct EnrollmentRequest {
    pub course_id: u64,
}

/// Reply to an enrollment request.
#[derive(Debug, Deserialize, Clone)]
pub struct EnrollmentResponse {
    #[serde(default, deserialize_with = "crate::serde_helpers::bool_from_any")]
    pub success: bool,
    #[serde(default, deserialize_with = "crate::serde_helpers::bool_from_any")]
    pub already_enrolled: bool,
    /// The course needs a purchase before the user can be enrolled.
    #[serde(default, deserialize_with = "crate::serde_helpers::bool_from_any")]
    pub precondition_required: bool,
    pub order_url: Option<String>,
}
