//! Table formatter implementation.
//!
//! Responsibilities:
//! - Fixed-width tables for search pages and batch reports.
//! - A navigation footer from the page cursor and the operator summary after
//!   every report.
//!
//! Does NOT handle:
//! - Terminal width detection; columns are fixed and long values overflow.

use anyhow::Result;
use roster_engine::{BatchItemResult, PartialFailureReport, ResourceKind, SearchPage, StatusHint};
use secrecy::ExposeSecret;
use std::fmt::Write as _;

use crate::formatters::Formatter;

const MISSING: &str = "-";

pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_page(&self, kind: ResourceKind, page: &SearchPage) -> Result<String> {
        let mut output = String::new();

        if page.items.is_empty() {
            writeln!(output, "No {kind} found.")?;
        } else {
            match kind {
                ResourceKind::Users => {
                    writeln!(output, "{:<8} {:<28} {:<32} {:<10}", "ID", "NAME", "EMAIL", "STATUS")?;
                    writeln!(output, "{:<8} {:<28} {:<32} {:<10}", "==", "====", "=====", "======")?;
                    for user in &page.items {
                        let status = if user.is_suspended { "suspended" } else { "active" };
                        writeln!(
                            output,
                            "{:<8} {:<28} {:<32} {:<10}",
                            user.id.to_string(),
                            user.display_name,
                            user.email.as_deref().unwrap_or(MISSING),
                            status
                        )?;
                    }
                }
                ResourceKind::Courses => {
                    writeln!(output, "{:<8} {:<40}", "ID", "TITLE")?;
                    writeln!(output, "{:<8} {:<40}", "==", "=====")?;
                    for course in &page.items {
                        writeln!(output, "{:<8} {:<40}", course.id.to_string(), course.display_name)?;
                    }
                }
            }
        }

        let cursor = &page.cursor;
        write!(
            output,
            "\nPage {}: {} shown, {} matching, {} total",
            cursor.page,
            page.items.len(),
            cursor.total_filtered,
            cursor.total_global
        )?;
        if cursor.has_more {
            write!(output, " (next: --page {})", cursor.page + 1)?;
        }
        output.push('\n');

        Ok(output)
    }

    fn format_report(&self, report: &PartialFailureReport, preview: usize) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "{:<24} {:<22} {}", "TARGET", "RESULT", "MESSAGE")?;
        writeln!(output, "{:<24} {:<22} {}", "======", "======", "=======")?;
        for item in &report.items {
            write!(
                output,
                "{:<24} {:<22} {}",
                item.target.to_string(),
                result_label(item),
                item.message
            )?;
            if let Some(details) = details(item) {
                write!(output, " ({details})")?;
            }
            output.push('\n');
        }

        writeln!(output)?;
        writeln!(output, "{}", report.summary(preview))?;

        Ok(output)
    }
}

fn result_label(item: &BatchItemResult) -> &'static str {
    match (item.success, item.status_hint, item.error_code) {
        (true, Some(StatusHint::AlreadyInState), _) => "unchanged",
        (true, _, _) => "ok",
        (false, _, Some(code)) => code.as_str(),
        (false, Some(StatusHint::PreconditionRequired), None) => "precondition_required",
        (false, _, None) => "failed",
    }
}

fn details(item: &BatchItemResult) -> Option<String> {
    if let Some(created) = &item.created {
        let mut parts = Vec::new();
        if let Some(id) = created.id {
            parts.push(format!("id {id}"));
        }
        if let Some(password) = &created.generated_password {
            parts.push(format!("password {}", password.expose_secret()));
        }
        return (!parts.is_empty()).then(|| parts.join(", "));
    }
    item.order_url.as_ref().map(|url| format!("order at {url}"))
}
