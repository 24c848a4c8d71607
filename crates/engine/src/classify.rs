//! Mapping of provider replies and client errors to item results.
//!
//! Every wire shape (single-resource replies, array-endpoint entries, typed
//! `ClientError`s) ends up here so the coordinator never inspects provider
//! payloads itself.
//!
//! Rules:
//! - "already in the requested state" (including `already_enrolled`) is a
//!   success with `ALREADY_IN_STATE`, whether it arrives as a flag or as an
//!   error code.
//! - An unmet precondition (flag, `precondition_required`/`purchase_required`
//!   code, or HTTP 402) is a failure with `PRECONDITION_REQUIRED`.
//! - 404 is `NOT_FOUND`; everything else is `PROVIDER_ERROR`.

use std::time::Duration;

use roster_client::{
    BulkItemResult, ClientError, CreateUserResponse, EnrollmentResponse, OperationResponse,
    SuspensionResponse,
};

use crate::action::{ActionKind, TargetKey};
use crate::report::{BatchItemResult, CreatedAccount, ItemErrorCode, StatusHint};
use crate::resource::ResourceId;

const ALREADY_CODES: &[&str] = &[
    "already_in_state",
    "already_suspended",
    "already_active",
    "already_enrolled",
];
const PRECONDITION_CODES: &[&str] = &["precondition_required", "purchase_required"];
const NOT_FOUND_CODES: &[&str] = &["not_found", "rest_user_invalid_id", "rest_course_invalid_id"];
const REASSIGN_CODES: &[&str] = &["reassignment_required"];

fn success_message(action: ActionKind) -> &'static str {
    match action {
        ActionKind::Suspend => "Suspended",
        ActionKind::Unsuspend => "Reactivated",
        ActionKind::Delete => "Deleted",
        ActionKind::Create => "Created",
        ActionKind::Enroll => "Enrolled",
    }
}

fn already_message(action: ActionKind) -> &'static str {
    match action {
        ActionKind::Suspend => "Already suspended",
        ActionKind::Unsuspend => "Already active",
        ActionKind::Enroll => "Already enrolled",
        ActionKind::Delete => "Already deleted",
        ActionKind::Create => "Already exists",
    }
}

fn rejected(target: TargetKey, action: ActionKind) -> BatchItemResult {
    BatchItemResult::failed(
        target,
        ItemErrorCode::ProviderRejected,
        StatusHint::ProviderError,
        format!("Provider did not confirm {action}"),
    )
}

fn precondition(target: TargetKey, message: impl Into<String>) -> BatchItemResult {
    BatchItemResult::failed(
        target,
        ItemErrorCode::PurchaseRequired,
        StatusHint::PreconditionRequired,
        message,
    )
}

/// Result of a single `set_suspension` call.
pub(crate) fn suspension(
    target: TargetKey,
    action: ActionKind,
    reply: Result<SuspensionResponse, ClientError>,
) -> BatchItemResult {
    match reply {
        Ok(r) if r.already_in_state => {
            BatchItemResult::already_in_state(target, already_message(action))
        }
        Ok(r) if r.success => BatchItemResult::succeeded(target, success_message(action)),
        Ok(_) => rejected(target, action),
        Err(e) => from_error(target, action, &e),
    }
}

/// Result of a single `delete` call.
pub(crate) fn deletion(
    target: TargetKey,
    reply: Result<OperationResponse, ClientError>,
) -> BatchItemResult {
    match reply {
        Ok(r) if r.success => {
            BatchItemResult::succeeded(target, success_message(ActionKind::Delete))
        }
        Ok(_) => rejected(target, ActionKind::Delete),
        Err(e) => from_error(target, ActionKind::Delete, &e),
    }
}

/// Result of a single `create` call.
pub(crate) fn creation(
    target: TargetKey,
    reply: Result<CreateUserResponse, ClientError>,
) -> BatchItemResult {
    match reply {
        Ok(r) if r.success => {
            let created = CreatedAccount {
                id: r.id.and_then(ResourceId::new),
                generated_password: r.generated_password,
            };
            BatchItemResult::succeeded(target, success_message(ActionKind::Create))
                .with_created(created)
        }
        Ok(_) => rejected(target, ActionKind::Create),
        Err(e) => from_error(target, ActionKind::Create, &e),
    }
}

/// Result of a single `enroll` call.
pub(crate) fn enrollment(
    target: TargetKey,
    reply: Result<EnrollmentResponse, ClientError>,
) -> BatchItemResult {
    match reply {
        Ok(r) if r.already_enrolled => {
            BatchItemResult::already_in_state(target, already_message(ActionKind::Enroll))
        }
        Ok(r) if r.precondition_required => {
            precondition(target, "Enrollment requires a completed purchase")
                .with_order_url(r.order_url)
        }
        Ok(r) if r.success => {
            BatchItemResult::succeeded(target, success_message(ActionKind::Enroll))
        }
        Ok(_) => rejected(target, ActionKind::Enroll),
        Err(e) => from_error(target, ActionKind::Enroll, &e),
    }
}

/// One entry of an array-endpoint reply.
pub(crate) fn bulk_entry(
    target: TargetKey,
    action: ActionKind,
    entry: BulkItemResult,
) -> BatchItemResult {
    if entry.already_in_state {
        return BatchItemResult::already_in_state(target, already_message(action));
    }
    if entry.success {
        let result = BatchItemResult::succeeded(target, success_message(action));
        return if action == ActionKind::Create {
            result.with_created(CreatedAccount {
                id: entry.id.and_then(ResourceId::new),
                generated_password: entry.generated_password,
            })
        } else {
            result
        };
    }

    let message = entry
        .message
        .unwrap_or_else(|| format!("Provider did not confirm {action}"));
    match entry.code.as_deref() {
        Some(code) => from_code(target, action, code, None, message),
        None => BatchItemResult::failed(
            target,
            ItemErrorCode::ProviderRejected,
            StatusHint::ProviderError,
            message,
        ),
    }
}

/// The per-item timeout fired before the provider answered.
pub(crate) fn timed_out(target: TargetKey, after: Duration) -> BatchItemResult {
    BatchItemResult::failed(
        target,
        ItemErrorCode::Timeout,
        StatusHint::ProviderError,
        format!("No response within {}s", after.as_secs_f64()),
    )
}

/// An array-endpoint reply that did not mention this target.
pub(crate) fn missing_from_reply(target: TargetKey) -> BatchItemResult {
    BatchItemResult::failed(
        target,
        ItemErrorCode::MissingFromReply,
        StatusHint::ProviderError,
        "Provider reply did not include this item",
    )
}

/// Map a client error to an item result.
pub(crate) fn from_error(
    target: TargetKey,
    action: ActionKind,
    error: &ClientError,
) -> BatchItemResult {
    let message = error.to_string();
    match error {
        ClientError::ApiError {
            status,
            code: Some(code),
            ..
        } => from_code(target, action, code, Some(*status), message),
        ClientError::ApiError { status: 402, .. } => precondition(target, message),
        ClientError::ApiError { status: 404, .. } | ClientError::NotFound(_) => {
            BatchItemResult::failed(
                target,
                ItemErrorCode::NotFound,
                StatusHint::NotFound,
                message,
            )
        }
        ClientError::ApiError { status: 403, .. }
        | ClientError::Unauthorized(_)
        | ClientError::AuthFailed(_) => provider_error(target, ItemErrorCode::Unauthorized, message),
        ClientError::ApiError { .. } => {
            provider_error(target, ItemErrorCode::ProviderRejected, message)
        }
        ClientError::Timeout(_) => provider_error(target, ItemErrorCode::Timeout, message),
        ClientError::RateLimited(_) | ClientError::MaxRetriesExceeded(_) => {
            provider_error(target, ItemErrorCode::RateLimited, message)
        }
        ClientError::InvalidResponse(_) => {
            provider_error(target, ItemErrorCode::InvalidResponse, message)
        }
        ClientError::HttpError(e) if e.is_timeout() => {
            provider_error(target, ItemErrorCode::Timeout, message)
        }
        ClientError::HttpError(_) | ClientError::InvalidUrl(_) => {
            provider_error(target, ItemErrorCode::Transport, message)
        }
    }
}

fn provider_error(target: TargetKey, code: ItemErrorCode, message: String) -> BatchItemResult {
    BatchItemResult::failed(target, code, StatusHint::ProviderError, message)
}

fn from_code(
    target: TargetKey,
    action: ActionKind,
    code: &str,
    status: Option<u16>,
    message: String,
) -> BatchItemResult {
    if ALREADY_CODES.contains(&code) {
        return BatchItemResult::already_in_state(target, already_message(action));
    }
    if PRECONDITION_CODES.contains(&code) || status == Some(402) {
        return precondition(target, message);
    }
    if NOT_FOUND_CODES.contains(&code) || status == Some(404) {
        return BatchItemResult::failed(
            target,
            ItemErrorCode::NotFound,
            StatusHint::NotFound,
            message,
        );
    }
    if REASSIGN_CODES.contains(&code) {
        return provider_error(target, ItemErrorCode::ReassignmentRequired, message);
    }
    match status {
        Some(401 | 403) => provider_error(target, ItemErrorCode::Unauthorized, message),
        _ => provider_error(target, ItemErrorCode::ProviderRejected, message),
    }
}
