//! Bounded-concurrency execution of a `BatchJob`.
//!
//! Responsibilities:
//! - Validate the job, then issue one provider call per target with at most
//!   `concurrency` calls in flight, each under its own timeout.
//! - Optionally route suspend/unsuspend/delete/create through the provider's
//!   array endpoints and normalize each reply back into per-item results.
//! - Aggregate results into a `PartialFailureReport` in target order.
//!
//! Does NOT handle:
//! - Retrying failed items (the job runs exactly once).
//! - Mid-batch cancellation.
//! - Reading live selection state; the job carries its own snapshot.
//!
//! Invariants:
//! - Exactly one result per target; `items[i]` belongs to `job.targets[i]`
//!   whatever the completion order.
//! - One item's failure or timeout never cancels or delays the others.
//! - A request-level error is returned before any provider call.

mod bulk;
mod single;

use std::sync::Arc;
use std::time::{Duration, Instant};

use roster_config::BatchConfig;
use roster_config::constants::{
    DEFAULT_BATCH_CONCURRENCY, DEFAULT_BULK_CHUNK_SIZE, DEFAULT_ITEM_TIMEOUT_SECS,
};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::action::{ActionKind, BatchJob};
use crate::error::BatchError;
use crate::gateway::ProviderGateway;
use crate::metrics::BatchMetrics;
use crate::report::{BatchItemResult, PartialFailureReport};
use crate::validation::validate_job;

/// Coordinator tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Maximum provider calls in flight.
    pub concurrency: usize,
    /// Timeout for one item call (or one array-endpoint chunk).
    pub item_timeout: Duration,
    pub use_bulk_endpoints: bool,
    pub bulk_chunk_size: usize,
    /// Escalation pointer used when the provider supplies none.
    pub order_resolution_url: Option<String>,
    /// Validate and report without calling the provider.
    pub dry_run: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_BATCH_CONCURRENCY,
            item_timeout: Duration::from_secs(DEFAULT_ITEM_TIMEOUT_SECS),
            use_bulk_endpoints: false,
            bulk_chunk_size: DEFAULT_BULK_CHUNK_SIZE,
            order_resolution_url: None,
            dry_run: false,
        }
    }
}

impl From<&BatchConfig> for CoordinatorConfig {
    fn from(config: &BatchConfig) -> Self {
        Self {
            concurrency: config.concurrency,
            item_timeout: config.item_timeout,
            use_bulk_endpoints: config.use_bulk_endpoints,
            bulk_chunk_size: config.bulk_chunk_size,
            order_resolution_url: config.order_resolution_url.clone(),
            dry_run: false,
        }
    }
}

/// Executes batch jobs against a provider gateway.
pub struct BatchActionCoordinator<G: ProviderGateway + ?Sized> {
    gateway: Arc<G>,
    config: CoordinatorConfig,
    metrics: BatchMetrics,
}

impl<G: ProviderGateway + ?Sized> BatchActionCoordinator<G> {
    pub fn new(gateway: Arc<G>, config: CoordinatorConfig) -> Self {
        Self {
            gateway,
            config,
            metrics: BatchMetrics::disabled(),
        }
    }

    pub fn with_metrics(mut self, metrics: BatchMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    fn concurrency(&self) -> usize {
        self.config.concurrency.max(1)
    }

    fn uses_bulk_for(&self, action: ActionKind) -> bool {
        self.config.use_bulk_endpoints
            && matches!(
                action,
                ActionKind::Suspend | ActionKind::Unsuspend | ActionKind::Delete | ActionKind::Create
            )
    }

    /// Run `job` to completion.
    ///
    /// # Errors
    ///
    /// Returns a `BatchError` when the job is rejected before execution.
    /// Item-level failures are reported inside the returned report.
    pub async fn execute(&self, job: &BatchJob) -> Result<PartialFailureReport, BatchError> {
        validate_job(job)?;

        let kind = job.kind();
        let span = info_span!(
            "batch",
            job_id = %job.id,
            action = %kind,
            requested = job.targets.len(),
            dry_run = self.config.dry_run,
        );

        async move {
            let started = Instant::now();

            let items = if self.config.dry_run {
                dry_run_items(job)
            } else if self.uses_bulk_for(kind) {
                self.run_bulk(job).await
            } else {
                self.run_single(job).await
            };

            let report = PartialFailureReport::from_items(
                job,
                items,
                self.config.order_resolution_url.as_deref(),
            );
            let report = if self.config.dry_run {
                report.mark_dry_run()
            } else {
                for item in &report.items {
                    self.metrics.record_item(kind, item);
                    if !item.success {
                        warn!(
                            target_id = %item.target,
                            error_code = ?item.error_code,
                            status_hint = ?item.status_hint,
                            message = %item.message,
                            "Batch item failed"
                        );
                    }
                }
                self.metrics.record_run(&report, started.elapsed());
                report
            };

            info!(
                successful = report.successful,
                failed = report.failed,
                escalated = report.escalation.is_some(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Batch finished"
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }
}

fn dry_run_items(job: &BatchJob) -> Vec<BatchItemResult> {
    let kind = job.kind();
    job.targets
        .iter()
        .map(|target| {
            debug!(target_id = %target.key(), "Dry run, skipping provider call");
            BatchItemResult::succeeded(target.key(), format!("Would {kind}"))
        })
        .collect()
}
