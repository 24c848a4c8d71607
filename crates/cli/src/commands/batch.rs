//! Batch commands: suspend, unsuspend, delete, create, enroll.
//!
//! Responsibilities:
//! - For suspend and unsuspend, look the ids up and keep only the eligible
//!   ones through `SelectionSet`, reporting the rest on stderr.
//! - Walk the operator through `ConfirmationGate`: a yes/no prompt for
//!   non-destructive actions (skipped by `--yes`), the typed phrase for DELETE
//!   (prompted, or taken from `--confirm`).
//! - Execute the confirmed job through `BatchActionCoordinator` and print the
//!   report.
//!
//! Does NOT handle:
//! - Per-item outcome rules (see the engine's coordinator and report).
//!
//! Invariants:
//! - No provider write is made unless the gate produced a job.
//! - A wrong phrase is a request-level rejection (exit 5), never a partial run.
//! - Once submitted, a job runs to completion; Ctrl+C after that point only
//!   stops the spinner, and the report is still printed.
//! - The exit code reflects the report: 0 all succeeded, 10 partial, 11 none.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use roster_client::ProviderClient;
use roster_config::Config;
use roster_config::constants::{MAX_BATCH_CONCURRENCY, MAX_PER_PAGE};
use roster_engine::metrics::BatchMetrics;
use roster_engine::validation::validate_job;
use roster_engine::{
    ActionKind, BatchAction, BatchActionCoordinator, BatchJob, ConfirmationGate,
    CoordinatorConfig, RemoteResource, RemoteResultCursor, ResourceId, ResourceKind, SearchError,
    SelectionSet, Target, ToggleOutcome,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::args::RunArgs;
use crate::cancellation::{CancellationToken, Cancelled};
use crate::commands::build_client_from_config;
use crate::error::ExitCode;
use crate::formatters::{OutputFormat, get_formatter};
use crate::interactive;
use crate::progress::Spinner;

/// A parsed batch command, ready for confirmation.
pub struct BatchRequest {
    pub action: BatchAction,
    pub targets: Vec<Target>,
    /// Phrase passed with `--confirm`.
    pub confirm: Option<String>,
    pub run: RunArgs,
}

pub async fn run(
    config: Config,
    request: BatchRequest,
    output_format: OutputFormat,
    quiet: bool,
    metrics: bool,
    cancel: &CancellationToken,
) -> Result<ExitCode> {
    let BatchRequest {
        action,
        mut targets,
        confirm,
        run,
    } = request;
    let kind = action.kind();
    let client = Arc::new(build_client_from_config(&config, metrics)?);

    if matches!(kind, ActionKind::Suspend | ActionKind::Unsuspend) {
        validate_job(&BatchJob::new(action.clone(), targets.clone()))?;
        let ids: Vec<ResourceId> = targets.iter().filter_map(Target::resource_id).collect();

        let spinner = Spinner::new(!quiet, format!("Looking up {} user(s)", ids.len()));
        let eligibility = tokio::select! {
            res = select_eligible(&client, kind, &ids) => res?,
            _ = cancel.cancelled() => return Err(Cancelled.into()),
        };
        spinner.finish();

        if !eligibility.skipped.is_empty() {
            eprintln!(
                "Skipping {} target(s) not eligible for {kind}: {}",
                eligibility.skipped.len(),
                join_ids(&eligibility.skipped)
            );
        }
        if eligibility.selected.is_empty() {
            eprintln!("Nothing to {kind}; nothing was sent.");
            return Ok(ExitCode::Success);
        }
        targets = eligibility
            .selected
            .into_iter()
            .map(Target::Resource)
            .collect();
    }
    let count = targets.len();

    let mut gate = ConfirmationGate::new(config.batch.confirm_phrase.clone());
    gate.open(action)?;

    if gate.requires_phrase() {
        let typed = match confirm {
            Some(phrase) => phrase,
            None => interactive::prompt_phrase(
                gate.phrase(),
                &format!("About to {kind} {count} account(s). This cannot be undone."),
            )?,
        };
        gate.set_typed(typed)?;
    } else if !run.yes
        && !run.dry_run
        && !interactive::confirm_action(&format!("{kind} {count} target(s)?"))?
    {
        gate.cancel();
        eprintln!("Cancelled; nothing was sent.");
        return Ok(ExitCode::Success);
    }

    if cancel.is_cancelled() {
        gate.cancel();
        return Err(Cancelled.into());
    }

    let job = gate
        .confirm_targets(targets)
        .with_context(|| format!("{kind} was not confirmed"))?;

    let mut coordinator_config = CoordinatorConfig::from(&config.batch);
    if let Some(concurrency) = run.concurrency {
        coordinator_config.concurrency = concurrency.clamp(1, MAX_BATCH_CONCURRENCY);
    }
    coordinator_config.use_bulk_endpoints |= run.bulk;
    coordinator_config.dry_run = run.dry_run;

    info!(
        job_id = %job.id,
        action = %kind,
        targets = count,
        concurrency = coordinator_config.concurrency,
        bulk = coordinator_config.use_bulk_endpoints,
        dry_run = run.dry_run,
        "Running batch"
    );

    let mut coordinator = BatchActionCoordinator::new(client, coordinator_config);
    if metrics {
        coordinator = coordinator.with_metrics(BatchMetrics::new());
    }

    let spinner = Spinner::new(!quiet, format!("Running {kind} on {count} target(s)"));
    let report = run_to_completion(coordinator.execute(&job), cancel, job.id).await?;
    spinner.finish();
    gate.reset();

    let output =
        get_formatter(output_format).format_report(&report, config.batch.failure_preview)?;
    print!("{output}");

    Ok(ExitCode::from_report(&report))
}

/// Ids kept for the batch and ids dropped as ineligible, in request order.
#[derive(Debug, Default)]
struct Eligibility {
    selected: Vec<ResourceId>,
    skipped: Vec<ResourceId>,
}

/// Look `ids` up and pass each through a `SelectionSet` for `kind`.
///
/// Ids the provider did not list stay selected; the provider reports them
/// per item when the batch runs.
async fn select_eligible(
    client: &Arc<ProviderClient>,
    kind: ActionKind,
    ids: &[ResourceId],
) -> Result<Eligibility, SearchError> {
    let cursor = RemoteResultCursor::new(Arc::clone(client), ResourceKind::Users, MAX_PER_PAGE);
    let listed: HashMap<ResourceId, RemoteResource> = cursor
        .lookup(ids)
        .await?
        .into_iter()
        .map(|resource| (resource.id, resource))
        .collect();

    let mut selection = SelectionSet::new(kind);
    let mut skipped = Vec::new();
    for &id in ids {
        match listed.get(&id) {
            Some(resource) => {
                if selection.toggle(resource) == ToggleOutcome::RejectedIneligible {
                    skipped.push(id);
                }
            }
            None => {
                selection.add_unlisted(id);
            }
        }
    }

    Ok(Eligibility {
        selected: selection.snapshot(),
        skipped,
    })
}

/// Drive `execution` to the end even if the operator interrupts.
async fn run_to_completion<F: Future>(
    execution: F,
    cancel: &CancellationToken,
    job_id: Uuid,
) -> F::Output {
    tokio::pin!(execution);
    tokio::select! {
        output = &mut execution => return output,
        _ = cancel.cancelled() => {}
    }
    warn!(%job_id, "Interrupt received; finishing items already in flight");
    eprintln!("Interrupt received; finishing items already sent, then printing the report.");
    execution.await
}

fn join_ids(ids: &[ResourceId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
