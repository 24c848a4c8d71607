//! Course models for the provider's catalog API.

use serde::{Deserialize, Serialize};

/// A course as returned by `GET /courses`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Course {
    #[serde(deserialize_with = "crate::serde_helpers::u64_from_string_or_number")]
    pub id: u64,
    #[serde(default, alias = "name")]
    pub title: String,
    /// Enrollment is blocked until an order for the course exists.
    #[serde(default, deserialize_with = "crate::serde_helpers::bool_from_any")]
    pub requires_purchase: bool,
}
