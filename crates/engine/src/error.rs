//! Error types for the batch engine.
//!
//! Item-level failures are never errors here: they are results inside a
//! `PartialFailureReport`. The types below cover what rejects a whole
//! request before any item runs, a failed search, and gate misuse.

use roster_client::ClientError;
use thiserror::Error;

use crate::action::{ActionKind, TargetKey};
use crate::resource::ResourceId;

/// Request-level rejection; no provider call has been made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("No targets selected for {0}")]
    EmptyTargets(ActionKind),

    #[error("Target {0} appears more than once")]
    DuplicateTarget(TargetKey),

    #[error("Target kind does not match action {action}: {reason}")]
    TargetKindMismatch {
        action: ActionKind,
        reason: &'static str,
    },

    #[error("Reassignment target {0} is itself selected for deletion")]
    ReassignTargetSelected(ResourceId),

    #[error("New user at position {0} has a blank username")]
    BlankUsername(usize),

    #[error("New user '{username}' has an invalid email address")]
    InvalidEmail { username: String },
}

impl BatchError {
    /// HTTP-style status for the UI layer.
    pub const fn http_status(&self) -> u16 {
        400
    }
}

/// A search request that did not produce a page.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Page numbers start at 1")]
    InvalidPage,

    #[error("Search for '{term}' (page {page}) failed: {source}")]
    Failed {
        term: String,
        page: u32,
        #[source]
        source: ClientError,
    },

    #[error("Provider returned an inconsistent page: {0}")]
    Inconsistent(String),

    #[error("Lookup of {count} id(s) failed: {source}")]
    LookupFailed {
        count: usize,
        #[source]
        source: ClientError,
    },
}

impl SearchError {
    /// Underlying client error, when the provider call itself failed.
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Failed { source, .. } | Self::LookupFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Misuse of the confirmation gate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("No action is awaiting confirmation")]
    NotAwaiting,

    #[error("Confirmation phrase does not match")]
    PhraseMismatch,

    #[error("Confirmation already consumed; reset before opening a new action")]
    AlreadyConfirmed,
}

/// Errors surfaced by the interactive workflow.
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error(transparent)]
    Gate(#[from] GateError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("Resource {0} is not on the current page")]
    NotVisible(ResourceId),
}
