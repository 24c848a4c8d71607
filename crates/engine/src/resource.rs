//! Remote resources as the engine sees them.
//!
//! Responsibilities:
//! - `ResourceId`: a provider-assigned, strictly positive integer id.
//! - `ResourceKind`: which searchable collection a resource belongs to.
//! - `RemoteResource`: the read-only projection shown in result pages, with
//!   the derived per-action eligibility used by the selection.
//!
//! Does NOT handle:
//! - Fetching resources (see `cursor` and `gateway`).
//!
//! Invariants:
//! - A `ResourceId` is never zero; construction from untrusted input goes
//!   through `TryFrom`/`FromStr`.
//! - Resources are never created or destroyed locally.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::action::ActionKind;

/// Provider-assigned positive integer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ResourceId(u64);

/// Rejected id input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid resource id '{0}': ids are positive integers")]
pub struct InvalidResourceId(pub String);

impl ResourceId {
    /// Returns `None` for zero.
    pub const fn new(value: u64) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for ResourceId {
    type Error = InvalidResourceId;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| InvalidResourceId(value.to_string()))
    }
}

impl TryFrom<i64> for ResourceId {
    type Error = InvalidResourceId;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| InvalidResourceId(value.to_string()))
    }
}

impl From<ResourceId> for u64 {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

impl FromStr for ResourceId {
    type Err = InvalidResourceId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .parse::<i64>()
            .map_err(|_| InvalidResourceId(trimmed.to_string()))
            .and_then(Self::try_from)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Searchable remote collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Users,
    Courses,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Users => write!(f, "users"),
            Self::Courses => write!(f, "courses"),
        }
    }
}

/// One row of a search result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteResource {
    pub id: ResourceId,
    pub display_name: String,
    pub email: Option<String>,
    pub is_suspended: bool,
}

impl RemoteResource {
    /// Whether `action` is meaningful for this resource right now.
    ///
    /// Suspending a suspended account or reactivating an active one is
    /// pointless, so those rows are ineligible. Every other action is always
    /// eligible.
    pub fn eligible_for(&self, action: ActionKind) -> bool {
        match action {
            ActionKind::Suspend => !self.is_suspended,
            ActionKind::Unsuspend => self.is_suspended,
            ActionKind::Delete | ActionKind::Create | ActionKind::Enroll => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(suspended: bool) -> RemoteResource {
        RemoteResource {
            id: ResourceId::new(1).unwrap(),
            display_name: "Ana".to_string(),
            email: None,
            is_suspended: suspended,
        }
    }

    #[test]
    fn test_resource_id_rejects_zero_and_negative() {
        assert!(ResourceId::new(0).is_none());
        assert!(ResourceId::try_from(0u64).is_err());
        assert!(ResourceId::try_from(-3i64).is_err());
        assert_eq!(ResourceId::try_from(7i64).unwrap().get(), 7);
    }

    #[test]
    fn test_resource_id_from_str() {
        assert_eq!(" 42 ".parse::<ResourceId>().unwrap().get(), 42);
        assert!("0".parse::<ResourceId>().is_err());
        assert!("-1".parse::<ResourceId>().is_err());
        assert!("abc".parse::<ResourceId>().is_err());
    }

    #[test]
    fn test_resource_id_serde_transparent() {
        let id: ResourceId = serde_json::from_str("12").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "12");
        assert!(serde_json::from_str::<ResourceId>("0").is_err());
    }

    #[test]
    fn test_eligibility() {
        assert!(resource(false).eligible_for(ActionKind::Suspend));
        assert!(!resource(true).eligible_for(ActionKind::Suspend));
        assert!(resource(true).eligible_for(ActionKind::Unsuspend));
        assert!(!resource(false).eligible_for(ActionKind::Unsuspend));
        assert!(resource(true).eligible_for(ActionKind::Delete));
        assert!(resource(false).eligible_for(ActionKind::Enroll));
    }
}
