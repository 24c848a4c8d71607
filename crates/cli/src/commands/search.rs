//! `roster users search` / `roster courses search`.
//!
//! Invariants:
//! - Sorting is requested from the provider; rows are printed in reply order.
//! - Page size falls back to the configured `per_page` and is capped at
//!   `MAX_PER_PAGE`.

use anyhow::Result;
use roster_client::SortOrder;
use roster_config::Config;
use roster_config::constants::MAX_PER_PAGE;
use roster_engine::{RemoteResultCursor, ResourceKind};
use std::sync::Arc;
use tracing::info;

use crate::args::SearchCommand;
use crate::cancellation::{CancellationToken, Cancelled};
use crate::commands::build_client_from_config;
use crate::formatters::{OutputFormat, get_formatter};
use crate::progress::Spinner;

pub async fn run(
    config: Config,
    kind: ResourceKind,
    command: SearchCommand,
    output_format: OutputFormat,
    quiet: bool,
    metrics: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let SearchCommand::Search {
        term,
        page,
        per_page,
        order_by,
        desc,
    } = command;

    let per_page = per_page.unwrap_or(config.batch.per_page).clamp(1, MAX_PER_PAGE);
    info!(%kind, term = %term, page, per_page, "Searching");

    let client = Arc::new(build_client_from_config(&config, metrics)?);
    let mut cursor = RemoteResultCursor::new(client, kind, per_page);
    if let Some(field) = order_by {
        let order = if desc { SortOrder::Desc } else { SortOrder::Asc };
        cursor = cursor.with_sort(field, order);
    }

    let spinner = Spinner::new(!quiet, format!("Searching {kind}"));
    let result = tokio::select! {
        res = cursor.search(&term, page) => res?,
        _ = cancel.cancelled() => return Err(Cancelled.into()),
    };
    spinner.finish();

    let output = get_formatter(output_format).format_page(kind, &result)?;
    print!("{output}");
    Ok(())
}
