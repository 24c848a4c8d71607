//! Array-endpoint methods for [`ProviderClient`].

use crate::client::ProviderClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::{BulkItemResult, CreateUserParams};

impl ProviderClient {
    /// Suspend or reactivate many users in one call.
    pub async fn bulk_set_suspension(
        &self,
        user_ids: &[u64],
        suspended: bool,
        reason: Option<&str>,
    ) -> Result<Vec<BulkItemResult>> {
        endpoints::bulk_set_suspension(
            &self.http,
            &self.api_root,
            &self.auth,
            user_ids,
            suspended,
            reason,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }

    /// Delete many users in one call.
    pub async fn bulk_delete_users(
        &self,
        user_ids: &[u64],
        reassign_to: Option<u64>,
    ) -> Result<Vec<BulkItemResult>> {
        endpoints::bulk_delete_users(
            &self.http,
            &self.api_root,
            &self.auth,
            user_ids,
            reassign_to,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }

    /// Create many users in one call.
    pub async fn bulk_create_users(
        &self,
        users: &[CreateUserParams],
    ) -> Result<Vec<BulkItemResult>> {
        endpoints::bulk_create_users(
            &self.http,
            &self.api_root,
            &self.auth,
            users,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }
}
