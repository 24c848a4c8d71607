//! One provider call per target.

use futures::stream::{self, StreamExt};
use tracing::debug;

use super::BatchActionCoordinator;
use crate::action::{BatchAction, BatchJob, Target};
use crate::classify;
use crate::gateway::ProviderGateway;
use crate::report::{BatchItemResult, ItemErrorCode, StatusHint};

impl<G: ProviderGateway + ?Sized> BatchActionCoordinator<G> {
    pub(super) async fn run_single(&self, job: &BatchJob) -> Vec<BatchItemResult> {
        let timeout = self.config.item_timeout;

        let mut settled: Vec<(usize, BatchItemResult)> = stream::iter(job.targets.iter().enumerate())
            .map(|(index, target)| async move {
                let result =
                    match tokio::time::timeout(timeout, self.call_one(&job.action, target)).await {
                        Ok(result) => result,
                        Err(_) => classify::timed_out(target.key(), timeout),
                    };
                debug!(
                    index,
                    target_id = %result.target,
                    success = result.success,
                    "Batch item settled"
                );
                (index, result)
            })
            .buffer_unordered(self.concurrency())
            .collect()
            .await;

        settled.sort_by_key(|(index, _)| *index);
        settled.into_iter().map(|(_, result)| result).collect()
    }

    async fn call_one(&self, action: &BatchAction, target: &Target) -> BatchItemResult {
        let key = target.key();
        let kind = action.kind();
        match (action, target) {
            (BatchAction::Suspend { reason }, Target::Resource(id)) => classify::suspension(
                key,
                kind,
                self.gateway
                    .set_suspension(*id, true, reason.as_deref())
                    .await,
            ),
            (BatchAction::Unsuspend, Target::Resource(id)) => classify::suspension(
                key,
                kind,
                self.gateway.set_suspension(*id, false, None).await,
            ),
            (BatchAction::Delete { reassign_to }, Target::Resource(id)) => {
                classify::deletion(key, self.gateway.delete(*id, *reassign_to).await)
            }
            (BatchAction::Create, Target::NewUser(user)) => {
                classify::creation(key, self.gateway.create(user).await)
            }
            (BatchAction::Enroll { subject }, Target::Resource(course)) => {
                classify::enrollment(key, self.gateway.enroll(*subject, *course).await)
            }
            _ => BatchItemResult::failed(
                key,
                ItemErrorCode::ProviderRejected,
                StatusHint::ProviderError,
                format!("Target does not fit action {kind}"),
            ),
        }
    }
}
