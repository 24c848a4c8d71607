//! Batch operation engine for bulk user and enrollment administration.
//!
//! The engine drives one unit of work end to end: a paginated remote search
//! ([`RemoteResultCursor`]), a selection that survives page and term changes
//! ([`SelectionSet`]), a confirmation barrier ([`ConfirmationGate`]), bounded
//! concurrent execution ([`BatchActionCoordinator`]) and an item-level report
//! ([`PartialFailureReport`]). The provider is reached through the
//! [`ProviderGateway`] seam so the engine can run against the real REST client
//! or the in-memory fake used by tests.

pub mod action;
mod classify;
pub mod coordinator;
pub mod cursor;
pub mod error;
pub mod gate;
pub mod gateway;
pub mod metrics;
pub mod report;
pub mod resource;
pub mod selection;
pub mod suspension;
pub mod validation;
pub mod workflow;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use action::{ActionKind, BatchAction, BatchJob, NewUser, Target, TargetKey};
pub use coordinator::{BatchActionCoordinator, CoordinatorConfig};
pub use cursor::{RemoteResultCursor, SearchCursor, SearchPage};
pub use error::{BatchError, ConsoleError, GateError, SearchError};
pub use gate::{ConfirmationGate, GateState};
pub use gateway::ProviderGateway;
pub use report::{
    BatchItemResult, CreatedAccount, Escalation, ItemErrorCode, PartialFailureReport,
    ReportStatus, StatusHint,
};
pub use resource::{InvalidResourceId, RemoteResource, ResourceId, ResourceKind};
pub use selection::{SelectionSet, ToggleOutcome};
pub use suspension::{SuspensionState, Transition};
pub use workflow::BatchConsole;
