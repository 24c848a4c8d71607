//! Output formatters for CLI commands.
//!
//! Responsibilities:
//! - Render search pages and batch reports as human tables or JSON.
//!
//! Does NOT handle:
//! - Direct printing to stdout (returns formatted strings).
//!
//! Invariants:
//! - JSON output is the serde form of the engine types, so scripts see the
//!   same field names as the report contract (`target_id`, `status_hint`, ...).
//! - Table output for an empty page is a human message; JSON output for an
//!   empty page is still a valid page object.
//! - Missing values render as `-` in tables and `null` in JSON.

use anyhow::Result;
use clap::ValueEnum;
use roster_engine::{PartialFailureReport, ResourceKind, SearchPage};

mod json;
mod table;

pub use json::JsonFormatter;
pub use table::TableFormatter;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

pub trait Formatter {
    /// Format one page of search results.
    fn format_page(&self, kind: ResourceKind, page: &SearchPage) -> Result<String>;

    /// Format a batch report, listing at most `failure_preview` failures in
    /// the summary.
    fn format_report(&self, report: &PartialFailureReport, failure_preview: usize)
    -> Result<String>;
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
