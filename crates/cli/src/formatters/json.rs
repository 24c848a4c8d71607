//! JSON formatter implementation.

use anyhow::Result;
use roster_engine::{PartialFailureReport, ResourceKind, SearchPage};

use crate::formatters::Formatter;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_page(&self, _kind: ResourceKind, page: &SearchPage) -> Result<String> {
        Ok(serde_json::to_string_pretty(page)?)
    }

    fn format_report(&self, report: &PartialFailureReport, _preview: usize) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}
