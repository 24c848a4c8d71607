//! The engine's view of the identity/enrollment provider.
//!
//! Responsibilities:
//! - Define `ProviderGateway`, the async seam the cursor and coordinator call.
//! - Implement it for `roster_client::ProviderClient`, translating client
//!   models into engine types.
//!
//! Does NOT handle:
//! - Retries or HTTP details (the client does that).
//! - Interpreting replies (see `classify`).
//!
//! Invariants:
//! - Implementations are `Send + Sync` and take `&self`, so one gateway is
//!   shared by every concurrent worker of a batch.

use async_trait::async_trait;
use roster_client::{
    BulkItemResult, ClientError, Course, CreateUserParams, CreateUserResponse, EnrollmentResponse,
    OperationResponse, Page, ProviderClient, SearchQuery, SuspensionResponse, User,
};

use crate::action::NewUser;
use crate::resource::{RemoteResource, ResourceId, ResourceKind};

/// Operations the engine needs from the provider.
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// One page of `kind` matching `query`.
    async fn search(
        &self,
        kind: ResourceKind,
        query: &SearchQuery,
    ) -> Result<Page<RemoteResource>, ClientError>;

    async fn set_suspension(
        &self,
        id: ResourceId,
        suspended: bool,
        reason: Option<&str>,
    ) -> Result<SuspensionResponse, ClientError>;

    async fn delete(
        &self,
        id: ResourceId,
        reassign_to: Option<ResourceId>,
    ) -> Result<OperationResponse, ClientError>;

    async fn create(&self, user: &NewUser) -> Result<CreateUserResponse, ClientError>;

    async fn enroll(
        &self,
        subject: ResourceId,
        course: ResourceId,
    ) -> Result<EnrollmentResponse, ClientError>;

    /// Array-endpoint suspension; one entry per id that the provider handled.
    async fn bulk_set_suspension(
        &self,
        ids: &[ResourceId],
        suspended: bool,
        reason: Option<&str>,
    ) -> Result<Vec<BulkItemResult>, ClientError>;

    async fn bulk_delete(
        &self,
        ids: &[ResourceId],
        reassign_to: Option<ResourceId>,
    ) -> Result<Vec<BulkItemResult>, ClientError>;

    async fn bulk_create(&self, users: &[NewUser]) -> Result<Vec<BulkItemResult>, ClientError>;
}

fn resource_id(raw: u64, model: &str) -> Result<ResourceId, ClientError> {
    ResourceId::new(raw)
        .ok_or_else(|| ClientError::InvalidResponse(format!("{model} with non-positive id")))
}

impl TryFrom<User> for RemoteResource {
    type Error = ClientError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        let display_name = if user.display_name.is_empty() {
            user.username
        } else {
            user.display_name
        };
        Ok(Self {
            id: resource_id(user.id, "user")?,
            display_name,
            email: user.email,
            is_suspended: user.is_suspended,
        })
    }
}

impl TryFrom<Course> for RemoteResource {
    type Error = ClientError;

    fn try_from(course: Course) -> Result<Self, Self::Error> {
        Ok(Self {
            id: resource_id(course.id, "course")?,
            display_name: course.title,
            email: None,
            is_suspended: false,
        })
    }
}

fn convert_page<T>(page: Page<T>) -> Result<Page<RemoteResource>, ClientError>
where
    RemoteResource: TryFrom<T, Error = ClientError>,
{
    let items = page
        .items
        .into_iter()
        .map(RemoteResource::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Page {
        items,
        has_more: page.has_more,
        total_filtered: page.total_filtered,
        total_global: page.total_global,
    })
}

fn raw_ids(ids: &[ResourceId]) -> Vec<u64> {
    ids.iter().map(|id| id.get()).collect()
}

#[async_trait]
impl ProviderGateway for ProviderClient {
    async fn search(
        &self,
        kind: ResourceKind,
        query: &SearchQuery,
    ) -> Result<Page<RemoteResource>, ClientError> {
        match kind {
            ResourceKind::Users => convert_page(self.search_users(query).await?),
            ResourceKind::Courses => convert_page(self.search_courses(query).await?),
        }
    }

    async fn set_suspension(
        &self,
        id: ResourceId,
        suspended: bool,
        reason: Option<&str>,
    ) -> Result<SuspensionResponse, ClientError> {
        self.set_user_suspension(id.get(), suspended, reason).await
    }

    async fn delete(
        &self,
        id: ResourceId,
        reassign_to: Option<ResourceId>,
    ) -> Result<OperationResponse, ClientError> {
        self.delete_user(id.get(), reassign_to.map(ResourceId::get))
            .await
    }

    async fn create(&self, user: &NewUser) -> Result<CreateUserResponse, ClientError> {
        self.create_user(&CreateUserParams::from(user)).await
    }

    async fn enroll(
        &self,
        subject: ResourceId,
        course: ResourceId,
    ) -> Result<EnrollmentResponse, ClientError> {
        self.enroll_user(subject.get(), course.get()).await
    }

    async fn bulk_set_suspension(
        &self,
        ids: &[ResourceId],
        suspended: bool,
        reason: Option<&str>,
    ) -> Result<Vec<BulkItemResult>, ClientError> {
        self.bulk_set_suspension(&raw_ids(ids), suspended, reason)
            .await
    }

    async fn bulk_delete(
        &self,
        ids: &[ResourceId],
        reassign_to: Option<ResourceId>,
    ) -> Result<Vec<BulkItemResult>, ClientError> {
        self.bulk_delete_users(&raw_ids(ids), reassign_to.map(ResourceId::get))
            .await
    }

    async fn bulk_create(&self, users: &[NewUser]) -> Result<Vec<BulkItemResult>, ClientError> {
        let params: Vec<CreateUserParams> = users.iter().map(CreateUserParams::from).collect();
        self.bulk_create_users(&params).await
    }
}
