//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to the search or batch handlers.
//! - Turn operator input (id lists, create files) into engine targets.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Configuration loading (see `config_context`).
//!
//! Invariants:
//! - Input errors surface before any confirmation prompt or provider call.

use anyhow::Result;
use roster_config::Config;
use roster_engine::{BatchAction, ResourceKind, Target};

use crate::args::{Cli, Commands, RunArgs};
use crate::cancellation::CancellationToken;
use crate::commands::batch::BatchRequest;
use crate::commands::{self, parse_id, parse_ids, read_user_specs};
use crate::error::ExitCode;

pub(crate) async fn run_command(
    cli: Cli,
    config: Config,
    cancel: &CancellationToken,
) -> Result<ExitCode> {
    let output = cli.output;
    let quiet = cli.quiet;
    let metrics = cli.metrics_file.is_some();

    let request = match cli.command {
        Commands::Users { command } => {
            commands::search::run(
                config,
                ResourceKind::Users,
                command,
                output,
                quiet,
                metrics,
                cancel,
            )
            .await?;
            return Ok(ExitCode::Success);
        }
        Commands::Courses { command } => {
            commands::search::run(
                config,
                ResourceKind::Courses,
                command,
                output,
                quiet,
                metrics,
                cancel,
            )
            .await?;
            return Ok(ExitCode::Success);
        }
        Commands::Suspend { ids, reason, run } => {
            by_ids(BatchAction::Suspend { reason }, &ids, None, run)?
        }
        Commands::Unsuspend { ids, run } => by_ids(BatchAction::Unsuspend, &ids, None, run)?,
        Commands::Delete {
            ids,
            reassign_to,
            confirm,
            run,
        } => {
            let reassign_to = reassign_to.as_deref().map(parse_id).transpose()?;
            by_ids(BatchAction::Delete { reassign_to }, &ids, confirm, run)?
        }
        Commands::Create { file, run } => BatchRequest {
            action: BatchAction::Create,
            targets: read_user_specs(&file)?
                .into_iter()
                .map(Target::NewUser)
                .collect(),
            confirm: None,
            run,
        },
        Commands::Enroll { user, courses, run } => {
            let subject = parse_id(&user)?;
            by_ids(BatchAction::Enroll { subject }, &courses, None, run)?
        }
    };

    commands::batch::run(config, request, output, quiet, metrics, cancel).await
}

fn by_ids(
    action: BatchAction,
    raw_ids: &[String],
    confirm: Option<String>,
    run: RunArgs,
) -> Result<BatchRequest> {
    Ok(BatchRequest {
        action,
        targets: parse_ids(raw_ids)?
            .into_iter()
            .map(Target::Resource)
            .collect(),
        confirm,
        run,
    })
}
