//! Search, select, confirm, execute: the operator workflow.
//!
//! `BatchConsole` is the single owner of the cursor, the selection and the
//! gate for one action, and drives the coordinator on submit. UI layers talk
//! to it instead of wiring the components together themselves.
//!
//! Invariants:
//! - Failed searches never touch the selection.
//! - The coordinator only runs on a job produced by the gate.
//! - After a batch executes (whatever its outcome) the selection is cleared
//!   and the gate returns to `Idle`. A request-level rejection leaves the
//!   selection as it was.

use std::sync::Arc;

use roster_config::BatchConfig;
use tracing::{debug, info};

use crate::action::{ActionKind, BatchAction, BatchJob, Target};
use crate::coordinator::{BatchActionCoordinator, CoordinatorConfig};
use crate::cursor::{RemoteResultCursor, SearchPage};
use crate::error::{BatchError, ConsoleError};
use crate::gate::ConfirmationGate;
use crate::gateway::ProviderGateway;
use crate::report::PartialFailureReport;
use crate::resource::{ResourceId, ResourceKind};
use crate::selection::{SelectionSet, ToggleOutcome};

pub struct BatchConsole<G: ProviderGateway + ?Sized> {
    cursor: RemoteResultCursor<G>,
    selection: SelectionSet,
    gate: ConfirmationGate,
    coordinator: BatchActionCoordinator<G>,
}

impl<G: ProviderGateway + ?Sized> BatchConsole<G> {
    /// Console for `action`, searching the collection that action targets.
    pub fn new(gateway: Arc<G>, action: ActionKind, config: &BatchConfig) -> Self {
        let kind = action.target_kind().unwrap_or(ResourceKind::Users);
        Self {
            cursor: RemoteResultCursor::new(Arc::clone(&gateway), kind, config.per_page),
            selection: SelectionSet::new(action),
            gate: ConfirmationGate::new(config.confirm_phrase.clone()),
            coordinator: BatchActionCoordinator::new(gateway, CoordinatorConfig::from(config)),
        }
    }

    /// Replace the coordinator settings (e.g. to enable a dry run).
    pub fn with_coordinator_config(mut self, config: CoordinatorConfig) -> Self {
        self.coordinator = BatchActionCoordinator::new(self.cursor.gateway(), config);
        self
    }

    pub fn action(&self) -> ActionKind {
        self.selection.action()
    }

    pub fn cursor(&self) -> &RemoteResultCursor<G> {
        &self.cursor
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn gate(&self) -> &ConfirmationGate {
        &self.gate
    }

    pub async fn search(&mut self, term: &str, page: u32) -> Result<SearchPage, ConsoleError> {
        Ok(self.cursor.search(term, page).await?)
    }

    pub async fn next_page(&mut self) -> Result<Option<SearchPage>, ConsoleError> {
        Ok(self.cursor.next_page().await?)
    }

    pub async fn prev_page(&mut self) -> Result<Option<SearchPage>, ConsoleError> {
        Ok(self.cursor.prev_page().await?)
    }

    /// Toggle a resource on the current page.
    pub fn toggle(&mut self, id: ResourceId) -> Result<ToggleOutcome, ConsoleError> {
        let resource = self
            .cursor
            .visible()
            .iter()
            .find(|r| r.id == id)
            .ok_or(ConsoleError::NotVisible(id))?;
        Ok(self.selection.toggle(resource))
    }

    /// Toggle-all over the current page.
    pub fn select_visible(&mut self) -> isize {
        self.selection.select_visible(self.cursor.visible())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Open the gate for `action`, which must match the console's action.
    pub fn open(&mut self, action: BatchAction) -> Result<(), ConsoleError> {
        if action.kind() != self.selection.action() {
            return Err(BatchError::TargetKindMismatch {
                action: action.kind(),
                reason: "selection was made for a different action",
            }
            .into());
        }
        Ok(self.gate.open(action)?)
    }

    pub fn type_confirmation(&mut self, text: impl Into<String>) -> Result<(), ConsoleError> {
        Ok(self.gate.set_typed(text)?)
    }

    pub fn can_submit(&self) -> bool {
        self.gate.can_submit()
    }

    pub fn cancel(&mut self) {
        self.gate.cancel();
    }

    /// Confirm with the current selection and execute.
    pub async fn submit(&mut self) -> Result<PartialFailureReport, ConsoleError> {
        let job = self.gate.confirm(&self.selection)?;
        self.run(job).await
    }

    /// Confirm with explicit targets (creation specs) and execute.
    pub async fn submit_targets(
        &mut self,
        targets: Vec<Target>,
    ) -> Result<PartialFailureReport, ConsoleError> {
        let job = self.gate.confirm_targets(targets)?;
        self.run(job).await
    }

    async fn run(&mut self, job: BatchJob) -> Result<PartialFailureReport, ConsoleError> {
        debug!(job_id = %job.id, targets = job.targets.len(), "Submitting confirmed job");
        let outcome = self.coordinator.execute(&job).await;
        self.gate.reset();
        let report = outcome?;
        self.selection.clear();
        info!(job_id = %job.id, http_status = report.http_status(), "Selection cleared after batch");
        Ok(report)
    }
}
