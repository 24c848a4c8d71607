//! The per-item result contract of a batch.
//!
//! Responsibilities:
//! - `BatchItemResult`: one outcome per target with a domain error code,
//!   a human-readable message and an optional status hint.
//! - `PartialFailureReport`: aggregate counts, overall status, the
//!   response-status convention and the escalation block.
//! - Rendering the operator summary ("X successful, Y failed" plus a preview
//!   of failures).
//!
//! Does NOT handle:
//! - Mapping provider replies to results (see `classify`).
//!
//! Invariants:
//! - `successful + failed == requested == items.len()`; counts are derived
//!   from `items` at construction and never set independently.
//! - `escalation` is present iff at least one item carries
//!   `StatusHint::PreconditionRequired`.

use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};
use std::fmt::Write as _;
use uuid::Uuid;

use crate::action::{ActionKind, BatchAction, BatchJob, TargetKey};
use crate::resource::ResourceId;

/// Coarse classification shown next to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusHint {
    AlreadyInState,
    PreconditionRequired,
    NotFound,
    ProviderError,
}

/// Domain error code of a failed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemErrorCode {
    NotFound,
    Timeout,
    ProviderRejected,
    ReassignmentRequired,
    PurchaseRequired,
    RateLimited,
    Unauthorized,
    InvalidResponse,
    MissingFromReply,
    Transport,
}

impl ItemErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Timeout => "timeout",
            Self::ProviderRejected => "provider_rejected",
            Self::ReassignmentRequired => "reassignment_required",
            Self::PurchaseRequired => "purchase_required",
            Self::RateLimited => "rate_limited",
            Self::Unauthorized => "unauthorized",
            Self::InvalidResponse => "invalid_response",
            Self::MissingFromReply => "missing_from_reply",
            Self::Transport => "transport",
        }
    }
}

/// Account produced by a successful creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedAccount {
    pub id: Option<ResourceId>,
    /// Provider-generated password; shown once to the operator.
    #[serde(serialize_with = "expose_opt_secret")]
    pub generated_password: Option<SecretString>,
}

fn expose_opt_secret<S>(secret: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

/// Outcome of one target.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItemResult {
    #[serde(rename = "target_id")]
    pub target: TargetKey,
    pub success: bool,
    pub error_code: Option<ItemErrorCode>,
    pub message: String,
    pub status_hint: Option<StatusHint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<CreatedAccount>,
    /// Where the operator resolves a precondition for this item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_url: Option<String>,
}

impl BatchItemResult {
    pub fn succeeded(target: TargetKey, message: impl Into<String>) -> Self {
        Self {
            target,
            success: true,
            error_code: None,
            message: message.into(),
            status_hint: None,
            created: None,
            order_url: None,
        }
    }

    /// Idempotent success: nothing had to change.
    pub fn already_in_state(target: TargetKey, message: impl Into<String>) -> Self {
        Self {
            status_hint: Some(StatusHint::AlreadyInState),
            ..Self::succeeded(target, message)
        }
    }

    pub fn failed(
        target: TargetKey,
        code: ItemErrorCode,
        hint: StatusHint,
        message: impl Into<String>,
    ) -> Self {
        Self {
            target,
            success: false,
            error_code: Some(code),
            message: message.into(),
            status_hint: Some(hint),
            created: None,
            order_url: None,
        }
    }

    pub fn with_created(mut self, created: CreatedAccount) -> Self {
        self.created = Some(created);
        self
    }

    pub fn with_order_url(mut self, url: Option<String>) -> Self {
        self.order_url = url;
        self
    }

    pub fn needs_precondition(&self) -> bool {
        self.status_hint == Some(StatusHint::PreconditionRequired)
    }
}

/// Items the operator must resolve out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Escalation {
    /// User the blocked enrollments were for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<ResourceId>,
    pub courses_requiring_order: Vec<TargetKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolve_url: Option<String>,
    pub message: String,
}

/// Overall outcome of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Success,
    Partial,
    Failure,
}

/// Aggregate result of one `BatchJob`.
#[derive(Debug, Clone, Serialize)]
pub struct PartialFailureReport {
    pub job_id: Uuid,
    pub action: ActionKind,
    pub status: ReportStatus,
    pub requested: usize,
    pub successful: usize,
    pub failed: usize,
    pub items: Vec<BatchItemResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation: Option<Escalation>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,
}

impl PartialFailureReport {
    /// Aggregate `items` (already in target order) for `job`.
    ///
    /// `fallback_resolve_url` is used for the escalation pointer when no item
    /// carried its own order URL.
    pub fn from_items(
        job: &BatchJob,
        items: Vec<BatchItemResult>,
        fallback_resolve_url: Option<&str>,
    ) -> Self {
        let requested = items.len();
        let successful = items.iter().filter(|i| i.success).count();
        let failed = requested - successful;

        let status = if failed == 0 {
            ReportStatus::Success
        } else if successful == 0 {
            ReportStatus::Failure
        } else {
            ReportStatus::Partial
        };

        let escalation = build_escalation(&job.action, &items, fallback_resolve_url);

        Self {
            job_id: job.id,
            action: job.kind(),
            status,
            requested,
            successful,
            failed,
            items,
            escalation,
            dry_run: false,
        }
    }

    pub fn mark_dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Response status for the UI layer: 200 when every item succeeded,
    /// 207 otherwise (including when every item failed).
    pub const fn http_status(&self) -> u16 {
        match self.status {
            ReportStatus::Success => 200,
            ReportStatus::Partial | ReportStatus::Failure => 207,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &BatchItemResult> {
        self.items.iter().filter(|i| !i.success)
    }

    /// Operator summary with at most `preview` failures listed.
    pub fn summary(&self, preview: usize) -> String {
        let mut out = format!("{} successful, {} failed", self.successful, self.failed);
        if self.dry_run {
            out.push_str(" (dry run)");
        }

        for item in self.failures().take(preview) {
            let _ = write!(out, "\n  - {}: {}", item.target, item.message);
        }
        if self.failed > preview {
            let _ = write!(out, "\n  ... and {} more", self.failed - preview);
        }

        if let Some(escalation) = &self.escalation {
            let _ = write!(out, "\n{}", escalation.message);
            if let Some(url) = &escalation.resolve_url {
                let _ = write!(out, " Resolve at: {url}");
            }
        }
        out
    }
}

fn build_escalation(
    action: &BatchAction,
    items: &[BatchItemResult],
    fallback_resolve_url: Option<&str>,
) -> Option<Escalation> {
    let blocked: Vec<&BatchItemResult> = items.iter().filter(|i| i.needs_precondition()).collect();
    if blocked.is_empty() {
        return None;
    }

    let resolve_url = blocked
        .iter()
        .find_map(|i| i.order_url.clone())
        .or_else(|| fallback_resolve_url.map(str::to_string));
    let subject_id = match action {
        BatchAction::Enroll { subject } => Some(*subject),
        _ => None,
    };
    let message = format!(
        "{} item(s) need an order before enrollment can complete.",
        blocked.len()
    );

    Some(Escalation {
        subject_id,
        courses_requiring_order: blocked.iter().map(|i| i.target.clone()).collect(),
        resolve_url,
        message,
    })
}
