//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map client and engine errors, and batch report outcomes, to exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//! - Signal handling (see cancellation.rs for SIGINT handling).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for errors that stopped the command.
//! - Exit codes 10 and 11 mean a batch ran and some or all items failed.
//! - Exit code 130 is reserved for SIGINT (Unix standard: 128 + SIGINT).

use roster_client::ClientError;
use roster_engine::{
    BatchError, ConsoleError, GateError, PartialFailureReport, ReportStatus, SearchError,
};

use crate::cancellation::SIGINT_EXIT_CODE;

/// Structured exit codes for roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Command completed and every batch item succeeded.
    Success = 0,

    /// Unhandled or generic failure.
    GeneralError = 1,

    /// Invalid or missing credentials.
    ///
    /// Scripts should refresh credentials.
    AuthenticationFailed = 2,

    /// Network, timeout, or DNS failure.
    ///
    /// Scripts may retry with exponential backoff.
    ConnectionError = 3,

    /// Resource not found.
    NotFound = 4,

    /// The request was rejected before any item ran (bad ids, duplicates,
    /// wrong confirmation phrase, malformed create file).
    ///
    /// Scripts should fix the input and not retry the same request.
    ValidationError = 5,

    /// Insufficient privileges on the provider.
    PermissionDenied = 6,

    /// HTTP 429 after retries were exhausted.
    RateLimited = 7,

    /// HTTP 502/503/504 after retries were exhausted.
    ServiceUnavailable = 8,

    /// The batch ran; some items failed.
    PartialFailure = 10,

    /// The batch ran; every item failed.
    AllFailed = 11,

    /// SIGINT/Ctrl+C.
    Interrupted = SIGINT_EXIT_CODE,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }

    /// Exit code for a finished batch.
    pub fn from_report(report: &PartialFailureReport) -> Self {
        match report.status {
            ReportStatus::Success => ExitCode::Success,
            ReportStatus::Partial => ExitCode::PartialFailure,
            ReportStatus::Failure => ExitCode::AllFailed,
        }
    }
}

impl From<&ClientError> for ExitCode {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::AuthFailed(_) | ClientError::Unauthorized(_) => {
                ExitCode::AuthenticationFailed
            }
            ClientError::ApiError { status: 401, .. } => ExitCode::AuthenticationFailed,

            ClientError::Timeout(_) | ClientError::InvalidUrl(_) => ExitCode::ConnectionError,
            ClientError::HttpError(e) if e.is_connect() || e.is_timeout() => {
                ExitCode::ConnectionError
            }

            ClientError::NotFound(_) | ClientError::ApiError { status: 404, .. } => {
                ExitCode::NotFound
            }

            ClientError::InvalidResponse(_) | ClientError::ApiError { status: 400, .. } => {
                ExitCode::ValidationError
            }

            ClientError::ApiError { status: 403, .. } => ExitCode::PermissionDenied,

            ClientError::RateLimited(_) | ClientError::ApiError { status: 429, .. } => {
                ExitCode::RateLimited
            }

            ClientError::MaxRetriesExceeded(_)
            | ClientError::ApiError {
                status: 502..=504, ..
            } => ExitCode::ServiceUnavailable,

            ClientError::ApiError { .. } | ClientError::HttpError(_) => ExitCode::GeneralError,
        }
    }
}

impl From<&SearchError> for ExitCode {
    fn from(err: &SearchError) -> Self {
        match err {
            SearchError::Failed { source, .. } | SearchError::LookupFailed { source, .. } => {
                ExitCode::from(source)
            }
            SearchError::InvalidPage => ExitCode::ValidationError,
            SearchError::Inconsistent(_) => ExitCode::GeneralError,
        }
    }
}

impl From<&ConsoleError> for ExitCode {
    fn from(err: &ConsoleError) -> Self {
        match err {
            ConsoleError::Search(e) => ExitCode::from(e),
            ConsoleError::Batch(_) | ConsoleError::Gate(_) | ConsoleError::NotVisible(_) => {
                ExitCode::ValidationError
            }
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Extract the appropriate exit code from this error.
    ///
    /// Returns ExitCode::GeneralError if no known error is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(e) = cause.downcast_ref::<ClientError>() {
                return ExitCode::from(e);
            }
            if let Some(e) = cause.downcast_ref::<SearchError>() {
                return ExitCode::from(e);
            }
            if let Some(e) = cause.downcast_ref::<ConsoleError>() {
                return ExitCode::from(e);
            }
            if cause.is::<BatchError>() || cause.is::<GateError>() {
                return ExitCode::ValidationError;
            }
            if cause.is::<crate::commands::InputError>() {
                return ExitCode::ValidationError;
            }
        }

        ExitCode::GeneralError
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_engine::{ActionKind, BatchAction, BatchJob, ResourceId};
    use std::time::Duration;

    fn api_error(status: u16) -> ClientError {
        ClientError::ApiError {
            status,
            url: "https://academy.example.com/wp-json/roster/v1/users".to_string(),
            code: None,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_exit_code_as_i32() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::AuthenticationFailed.as_i32(), 2);
        assert_eq!(ExitCode::PartialFailure.as_i32(), 10);
        assert_eq!(ExitCode::AllFailed.as_i32(), 11);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
    }

    #[test]
    fn test_from_client_error() {
        assert_eq!(
            ExitCode::from(&ClientError::Unauthorized("nope".to_string())),
            ExitCode::AuthenticationFailed
        );
        assert_eq!(
            ExitCode::from(&ClientError::Timeout(Duration::from_secs(30))),
            ExitCode::ConnectionError
        );
        assert_eq!(ExitCode::from(&api_error(400)), ExitCode::ValidationError);
        assert_eq!(ExitCode::from(&api_error(403)), ExitCode::PermissionDenied);
        assert_eq!(ExitCode::from(&api_error(503)), ExitCode::ServiceUnavailable);
        assert_eq!(ExitCode::from(&api_error(500)), ExitCode::GeneralError);
    }

    #[test]
    fn test_search_failure_uses_client_error() {
        let err = SearchError::Failed {
            term: "ana".to_string(),
            page: 1,
            source: api_error(401),
        };
        assert_eq!(ExitCode::from(&err), ExitCode::AuthenticationFailed);

        let err = SearchError::LookupFailed {
            count: 2,
            source: api_error(503),
        };
        assert_eq!(ExitCode::from(&err), ExitCode::ServiceUnavailable);
    }

    #[test]
    fn test_request_rejections_are_validation_errors() {
        let err = anyhow::Error::from(BatchError::EmptyTargets(ActionKind::Suspend));
        assert_eq!(err.exit_code(), ExitCode::ValidationError);

        let err = anyhow::Error::from(GateError::PhraseMismatch).context("delete not confirmed");
        assert_eq!(err.exit_code(), ExitCode::ValidationError);
    }

    #[test]
    fn test_unknown_error_is_general() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(err.exit_code(), ExitCode::GeneralError);
    }

    #[test]
    fn test_from_report() {
        let job = BatchJob::for_ids(BatchAction::Unsuspend, vec![ResourceId::new(1).unwrap()]);
        let mut report = PartialFailureReport::from_items(&job, Vec::new(), None);
        report.status = ReportStatus::Partial;
        assert_eq!(ExitCode::from_report(&report), ExitCode::PartialFailure);
        report.status = ReportStatus::Failure;
        assert_eq!(ExitCode::from_report(&report), ExitCode::AllFailed);
        report.status = ReportStatus::Success;
        assert_eq!(ExitCode::from_report(&report), ExitCode::Success);
    }
}
