//! Request-level validation of a `BatchJob`.
//!
//! Responsibilities:
//! - Reject malformed jobs before any provider call: no targets, duplicate
//!   targets, targets of the wrong kind, a reassignment target that is being
//!   deleted, blank usernames and malformed emails in creation specs.
//!
//! Does NOT handle:
//! - Anything that needs the provider (existence, eligibility, permissions).
//!
//! Invariants:
//! - Validation is pure; the first problem found is returned.

use std::collections::HashSet;

use crate::action::{ActionKind, BatchAction, BatchJob, NewUser, Target};
use crate::error::BatchError;

/// Validate `job`, returning the first request-level problem.
pub fn validate_job(job: &BatchJob) -> Result<(), BatchError> {
    let kind = job.kind();
    if job.targets.is_empty() {
        return Err(BatchError::EmptyTargets(kind));
    }

    let mut seen = HashSet::with_capacity(job.targets.len());
    for (position, target) in job.targets.iter().enumerate() {
        match (kind, target) {
            (ActionKind::Create, Target::NewUser(user)) => validate_new_user(position, user)?,
            (ActionKind::Create, Target::Resource(_)) => {
                return Err(BatchError::TargetKindMismatch {
                    action: kind,
                    reason: "creation targets must be account specs",
                });
            }
            (_, Target::NewUser(_)) => {
                return Err(BatchError::TargetKindMismatch {
                    action: kind,
                    reason: "targets must be existing resource ids",
                });
            }
            (_, Target::Resource(_)) => {}
        }

        let key = target.key();
        if !seen.insert(key.clone()) {
            return Err(BatchError::DuplicateTarget(key));
        }
    }

    if let BatchAction::Delete {
        reassign_to: Some(heir),
    } = &job.action
        && job.targets.iter().any(|t| t.resource_id() == Some(*heir))
    {
        return Err(BatchError::ReassignTargetSelected(*heir));
    }

    Ok(())
}

fn validate_new_user(position: usize, user: &NewUser) -> Result<(), BatchError> {
    if user.username.trim().is_empty() {
        return Err(BatchError::BlankUsername(position));
    }
    if !looks_like_email(&user.email) {
        return Err(BatchError::InvalidEmail {
            username: user.username.clone(),
        });
    }
    Ok(())
}

/// Shape check only: one `@`, non-empty local part, dotted domain.
fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
                && !domain.ends_with('.')
        }
        None => false,
    }
}
