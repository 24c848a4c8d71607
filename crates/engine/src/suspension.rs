//! Per-account suspension lifecycle.
//!
//! Two states, `Active` and `Suspended`, with idempotent transitions:
//! repeating a transition is a successful no-op rather than an error. The
//! provider enforces the same law server-side; this type is what the engine
//! (and the fake provider used in tests) reason about.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Suspension state of one account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuspensionState {
    #[default]
    Active,
    Suspended {
        reason: Option<String>,
        suspended_at: DateTime<Utc>,
    },
}

/// Result of applying a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Changed,
    AlreadyInState,
}

impl Transition {
    pub const fn is_noop(self) -> bool {
        matches!(self, Self::AlreadyInState)
    }
}

impl SuspensionState {
    pub const fn is_suspended(&self) -> bool {
        matches!(self, Self::Suspended { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Suspended { reason, .. } => reason.as_deref(),
            Self::Active => None,
        }
    }

    pub fn suspended_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Suspended { suspended_at, .. } => Some(*suspended_at),
            Self::Active => None,
        }
    }

    /// Suspend, stamping the current time.
    pub fn suspend(&mut self, reason: Option<String>) -> Transition {
        self.suspend_at(reason, Utc::now())
    }

    /// Suspend at an explicit instant.
    ///
    /// Already suspended: the timestamp is kept, and the reason is replaced
    /// only when a new one is supplied.
    pub fn suspend_at(&mut self, reason: Option<String>, at: DateTime<Utc>) -> Transition {
        match self {
            Self::Active => {
                *self = Self::Suspended {
                    reason,
                    suspended_at: at,
                };
                Transition::Changed
            }
            Self::Suspended {
                reason: current, ..
            } => {
                if reason.is_some() {
                    *current = reason;
                }
                Transition::AlreadyInState
            }
        }
    }

    /// Reactivate, dropping reason and timestamp.
    pub fn unsuspend(&mut self) -> Transition {
        match self {
            Self::Active => Transition::AlreadyInState,
            Self::Suspended { .. } => {
                *self = Self::Active;
                Transition::Changed
            }
        }
    }

    /// Apply `suspended` as a target state.
    pub fn set(&mut self, suspended: bool, reason: Option<String>) -> Transition {
        if suspended {
            self.suspend(reason)
        } else {
            self.unsuspend()
        }
    }
}
