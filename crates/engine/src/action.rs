//! Batch actions and the job snapshot handed to the coordinator.
//!
//! Responsibilities:
//! - Enumerate the supported action kinds and their per-action parameters.
//! - Describe the targets of a job: existing resource ids, or account specs
//!   for creation.
//! - Build `BatchJob`s, the immutable snapshot executed exactly once.
//!
//! Does NOT handle:
//! - Request-level validation (see `validation`).
//! - Execution (see `coordinator`).
//!
//! Invariants:
//! - A `BatchJob` owns its targets; later selection edits cannot reach it.

use chrono::{DateTime, Utc};
use roster_client::CreateUserParams;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::resource::{ResourceId, ResourceKind};

/// Kind of batch action, without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    Suspend,
    Unsuspend,
    Delete,
    Create,
    Enroll,
}

impl ActionKind {
    /// Irreversible actions need a typed confirmation phrase.
    pub const fn is_destructive(self) -> bool {
        matches!(self, Self::Delete)
    }

    /// Collection the targets of this action are selected from.
    ///
    /// `None` for creation, whose targets are specs rather than resources.
    pub const fn target_kind(self) -> Option<ResourceKind> {
        match self {
            Self::Suspend | Self::Unsuspend | Self::Delete => Some(ResourceKind::Users),
            Self::Enroll => Some(ResourceKind::Courses),
            Self::Create => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Suspend => "suspend",
            Self::Unsuspend => "unsuspend",
            Self::Delete => "delete",
            Self::Create => "create",
            Self::Enroll => "enroll",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action together with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchAction {
    Suspend { reason: Option<String> },
    Unsuspend,
    /// Content owned by each deleted user moves to `reassign_to` when given.
    Delete { reassign_to: Option<ResourceId> },
    Create,
    /// Enroll `subject` (a user) into every target course.
    Enroll { subject: ResourceId },
}

impl BatchAction {
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::Suspend { .. } => ActionKind::Suspend,
            Self::Unsuspend => ActionKind::Unsuspend,
            Self::Delete { .. } => ActionKind::Delete,
            Self::Create => ActionKind::Create,
            Self::Enroll { .. } => ActionKind::Enroll,
        }
    }
}

/// Specification of an account to create.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Omit to let the provider generate one.
    #[serde(default, deserialize_with = "deserialize_opt_secret")]
    pub password: Option<SecretString>,
    #[serde(default)]
    pub roles: Vec<String>,
}

fn deserialize_opt_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|s| !s.is_empty())
        .map(|s| SecretString::new(s.into())))
}

impl NewUser {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            display_name: None,
            password: None,
            roles: Vec::new(),
        }
    }
}

impl From<&NewUser> for CreateUserParams {
    fn from(user: &NewUser) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            password: user.password.clone(),
            roles: user.roles.clone(),
        }
    }
}

/// One target of a batch.
#[derive(Debug, Clone)]
pub enum Target {
    Resource(ResourceId),
    NewUser(NewUser),
}

impl Target {
    /// Stable key used to correlate the target with its result.
    pub fn key(&self) -> TargetKey {
        match self {
            Self::Resource(id) => TargetKey::Id(*id),
            Self::NewUser(user) => TargetKey::Username(user.username.clone()),
        }
    }

    pub fn resource_id(&self) -> Option<ResourceId> {
        match self {
            Self::Resource(id) => Some(*id),
            Self::NewUser(_) => None,
        }
    }
}

impl From<ResourceId> for Target {
    fn from(id: ResourceId) -> Self {
        Self::Resource(id)
    }
}

impl From<NewUser> for Target {
    fn from(user: NewUser) -> Self {
        Self::NewUser(user)
    }
}

/// Identity of a target as it appears in a report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetKey {
    Id(ResourceId),
    Username(String),
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Username(name) => f.write_str(name),
        }
    }
}

/// One coordinator invocation.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub id: Uuid,
    pub action: BatchAction,
    pub targets: Vec<Target>,
    pub created_at: DateTime<Utc>,
}

impl BatchJob {
    pub fn new(action: BatchAction, targets: Vec<Target>) -> Self {
        Self {
            id: Uuid::new_v4(),
            action,
            targets,
            created_at: Utc::now(),
        }
    }

    /// Job over existing resources.
    pub fn for_ids(action: BatchAction, ids: impl IntoIterator<Item = ResourceId>) -> Self {
        Self::new(action, ids.into_iter().map(Target::Resource).collect())
    }

    /// Creation job.
    pub fn create(users: impl IntoIterator<Item = NewUser>) -> Self {
        Self::new(
            BatchAction::Create,
            users.into_iter().map(Target::NewUser).collect(),
        )
    }

    pub fn kind(&self) -> ActionKind {
        self.action.kind()
    }

    pub fn keys(&self) -> Vec<TargetKey> {
        self.targets.iter().map(Target::key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn id(n: u64) -> ResourceId {
        ResourceId::new(n).unwrap()
    }

    #[test]
    fn test_only_delete_is_destructive() {
        assert!(ActionKind::Delete.is_destructive());
        for kind in [
            ActionKind::Suspend,
            ActionKind::Unsuspend,
            ActionKind::Create,
            ActionKind::Enroll,
        ] {
            assert!(!kind.is_destructive(), "{kind} should not be destructive");
        }
    }

    #[test]
    fn test_target_kinds() {
        assert_eq!(ActionKind::Suspend.target_kind(), Some(ResourceKind::Users));
        assert_eq!(ActionKind::Enroll.target_kind(), Some(ResourceKind::Courses));
        assert_eq!(ActionKind::Create.target_kind(), None);
    }

    #[test]
    fn test_job_keys_follow_target_order() {
        let job = BatchJob::for_ids(BatchAction::Unsuspend, [id(3), id(1), id(2)]);
        assert_eq!(
            job.keys(),
            vec![TargetKey::Id(id(3)), TargetKey::Id(id(1)), TargetKey::Id(id(2))]
        );
        assert_eq!(job.kind(), ActionKind::Unsuspend);
    }

    #[test]
    fn test_new_user_from_json_file_shape() {
        let json = r#"[
            {"username": "dora", "email": "dora@example.com", "roles": ["student"]},
            {"username": "eli", "email": "eli@example.com", "password": "s3cret"}
        ]"#;
        let users: Vec<NewUser> = serde_json::from_str(json).unwrap();
        assert_eq!(users.len(), 2);
        assert!(users[0].password.is_none());
        assert_eq!(users[0].roles, vec!["student".to_string()]);
        assert_eq!(
            users[1].password.as_ref().map(|p| p.expose_secret().to_string()),
            Some("s3cret".to_string())
        );

        let job = BatchJob::create(users);
        assert_eq!(job.keys()[1], TargetKey::Username("eli".to_string()));
    }

    #[test]
    fn test_target_key_serializes_untagged() {
        assert_eq!(serde_json::to_string(&TargetKey::Id(id(9))).unwrap(), "9");
        assert_eq!(
            serde_json::to_string(&TargetKey::Username("ana".to_string())).unwrap(),
            "\"ana\""
        );
    }

    #[test]
    fn test_new_user_into_create_params() {
        let mut user = NewUser::new("fer", "fer@example.com");
        user.roles.push("editor".to_string());
        let params = CreateUserParams::from(&user);
        assert_eq!(params.username, "fer");
        assert_eq!(params.roles, vec!["editor".to_string()]);
        assert!(params.password.is_none());
    }
}
