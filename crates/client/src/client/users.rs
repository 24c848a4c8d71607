//! User management API methods for [`ProviderClient`].
//!
//! # What this module handles:
//! - Searching users
//! - Suspending/reactivating, deleting and creating single users
//!
//! # What this module does NOT handle:
//! - Array-endpoint variants (in `bulk`)
//! - Low-level HTTP calls (in [`crate::endpoints`])

use crate::client::ProviderClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::{
    CreateUserParams, CreateUserResponse, OperationResponse, Page, SearchQuery,
    SuspensionResponse, User,
};

impl ProviderClient {
    /// Search users, one page at a time.
    pub async fn search_users(&self, query: &SearchQuery) -> Result<Page<User>> {
        endpoints::search_users(
            &self.http,
            &self.api_root,
            &self.auth,
            query,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }

    /// Suspend (`suspended = true`) or reactivate a user.
    pub async fn set_user_suspension(
        &self,
        user_id: u64,
        suspended: bool,
        reason: Option<&str>,
    ) -> Result<SuspensionResponse> {
        endpoints::set_user_suspension(
            &self.http,
            &self.api_root,
            &self.auth,
            user_id,
            suspended,
            reason,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }

    /// Delete a user, optionally reassigning their content to another user.
    pub async fn delete_user(
        &self,
        user_id: u64,
        reassign_to: Option<u64>,
    ) -> Result<OperationResponse> {
        endpoints::delete_user(
            &self.http,
            &self.api_root,
            &self.auth,
            user_id,
            reassign_to,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }

    /// Create a user.
    pub async fn create_user(&self, params: &CreateUserParams) -> Result<CreateUserResponse> {
        endpoints::create_user(
            &self.http,
            &self.api_root,
            &self.auth,
            params,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }
}
