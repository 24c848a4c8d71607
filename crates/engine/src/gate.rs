//! Confirmation barrier in front of the coordinator.
//!
//! Responsibilities:
//! - Track `Idle -> AwaitingConfirm -> (Confirmed | Cancelled)` for one
//!   pending action; `reset` (or opening a new action) leaves `Cancelled`.
//! - For destructive actions, require the operator to type the configured
//!   phrase exactly (case-sensitive, no trimming) before submission.
//! - Build the `BatchJob` snapshot at the moment of confirmation.
//!
//! Does NOT handle:
//! - Executing the job or any business rule about targets.
//!
//! Invariants:
//! - A job is only produced from `AwaitingConfirm` with `can_submit()` true.
//! - A phrase mismatch leaves the gate in `AwaitingConfirm`.
//! - Cancelling discards typed text and the pending action.

use serde::Serialize;

use crate::action::{BatchAction, BatchJob, Target};
use crate::error::GateError;
use crate::selection::SelectionSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateState {
    Idle,
    AwaitingConfirm,
    Confirmed,
    /// The operator backed out; nothing pending, nothing typed.
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct ConfirmationGate {
    phrase: String,
    state: GateState,
    pending: Option<BatchAction>,
    typed: String,
}

impl ConfirmationGate {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            state: GateState::Idle,
            pending: None,
            typed: String::new(),
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn pending(&self) -> Option<&BatchAction> {
        self.pending.as_ref()
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    /// Whether the pending action needs the typed phrase.
    pub fn requires_phrase(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|a| a.kind().is_destructive())
    }

    /// Start confirming `action`. Reopening while awaiting replaces the
    /// pending action and clears typed text.
    pub fn open(&mut self, action: BatchAction) -> Result<(), GateError> {
        if self.state == GateState::Confirmed {
            return Err(GateError::AlreadyConfirmed);
        }
        self.pending = Some(action);
        self.typed.clear();
        self.state = GateState::AwaitingConfirm;
        Ok(())
    }

    /// Replace the typed confirmation text.
    pub fn set_typed(&mut self, text: impl Into<String>) -> Result<(), GateError> {
        if self.state != GateState::AwaitingConfirm {
            return Err(GateError::NotAwaiting);
        }
        self.typed = text.into();
        Ok(())
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.state == GateState::AwaitingConfirm
            && (!self.requires_phrase() || self.typed == self.phrase)
    }

    /// Confirm using the current selection as targets.
    pub fn confirm(&mut self, selection: &SelectionSet) -> Result<BatchJob, GateError> {
        self.confirm_targets(
            selection
                .snapshot()
                .into_iter()
                .map(Target::Resource)
                .collect(),
        )
    }

    /// Confirm with explicit targets (e.g. account specs for creation).
    pub fn confirm_targets(&mut self, targets: Vec<Target>) -> Result<BatchJob, GateError> {
        if self.state != GateState::AwaitingConfirm {
            return Err(GateError::NotAwaiting);
        }
        if !self.can_submit() {
            return Err(GateError::PhraseMismatch);
        }
        let action = self.pending.take().ok_or(GateError::NotAwaiting)?;
        self.typed.clear();
        self.state = GateState::Confirmed;
        Ok(BatchJob::new(action, targets))
    }

    /// Abandon the pending action. No-op unless awaiting confirmation.
    pub fn cancel(&mut self) {
        if self.state != GateState::AwaitingConfirm {
            return;
        }
        self.pending = None;
        self.typed.clear();
        self.state = GateState::Cancelled;
    }

    /// Return to `Idle` after a confirmed job was handed off or a
    /// cancellation was acknowledged.
    pub fn reset(&mut self) {
        self.pending = None;
        self.typed.clear();
        self.state = GateState::Idle;
    }
}
