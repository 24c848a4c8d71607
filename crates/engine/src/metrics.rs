//! Metrics for batch execution.
//!
//! # What this module handles:
//! - Per-item outcome counters, labelled by action and outcome
//! - Batch run counters and duration histogram
//!
//! # What this module does NOT handle:
//! - Per-request HTTP metrics (see `roster_client::metrics`)
//! - Exporting (no recorder is installed by the library)

use std::time::Duration;

use crate::action::ActionKind;
use crate::report::{BatchItemResult, PartialFailureReport, StatusHint};

/// Counter of settled batch items.
pub const METRIC_BATCH_ITEMS_TOTAL: &str = "roster_batch_items_total";

/// Counter of executed batches.
pub const METRIC_BATCH_RUNS_TOTAL: &str = "roster_batch_runs_total";

/// Histogram of wall-clock batch duration.
pub const METRIC_BATCH_DURATION: &str = "roster_batch_duration_seconds";

/// Label value describing how one item settled.
pub fn outcome_label(item: &BatchItemResult) -> &'static str {
    match (item.success, item.status_hint) {
        (true, Some(StatusHint::AlreadyInState)) => "already_in_state",
        (true, _) => "success",
        (false, Some(StatusHint::PreconditionRequired)) => "precondition_required",
        (false, Some(StatusHint::NotFound)) => "not_found",
        (false, _) => "provider_error",
    }
}

/// Recorder for batch metrics; disabled collectors record nothing.
#[derive(Debug, Clone, Default)]
pub struct BatchMetrics {
    enabled: bool,
}

impl BatchMetrics {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record_item(&self, action: ActionKind, item: &BatchItemResult) {
        if !self.enabled {
            return;
        }
        metrics::counter!(METRIC_BATCH_ITEMS_TOTAL,
            "action" => action.as_str(),
            "outcome" => outcome_label(item),
        )
        .increment(1);
    }

    pub fn record_run(&self, report: &PartialFailureReport, elapsed: Duration) {
        if !self.enabled {
            return;
        }
        let status = match report.status {
            crate::report::ReportStatus::Success => "success",
            crate::report::ReportStatus::Partial => "partial",
            crate::report::ReportStatus::Failure => "failure",
        };
        metrics::counter!(METRIC_BATCH_RUNS_TOTAL,
            "action" => report.action.as_str(),
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(METRIC_BATCH_DURATION,
            "action" => report.action.as_str(),
        )
        .record(elapsed.as_secs_f64());
    }
}
