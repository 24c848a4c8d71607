//! Array-endpoint execution.
//!
//! Targets are sent in chunks of `bulk_chunk_size`. The provider handles each
//! id independently, so every chunk reply is normalized back into one result
//! per target:
//! - a chunk-level error or timeout fails every target of that chunk;
//! - an id absent from the reply fails with `MissingFromReply`;
//! - creation replies are matched by username, or by position when the
//!   reply carries no usernames and has exactly one entry per spec.

use std::collections::HashMap;

use futures::stream::{self, StreamExt};
use roster_client::{BulkItemResult, ClientError};
use tracing::{debug, warn};

use super::BatchActionCoordinator;
use crate::action::{ActionKind, BatchAction, BatchJob, NewUser, Target};
use crate::classify;
use crate::gateway::ProviderGateway;
use crate::report::BatchItemResult as ItemResult;
use crate::resource::ResourceId;

impl<G: ProviderGateway + ?Sized> BatchActionCoordinator<G> {
    pub(super) async fn run_bulk(&self, job: &BatchJob) -> Vec<ItemResult> {
        let chunk_size = self.config.bulk_chunk_size.max(1);
        let timeout = self.config.item_timeout;
        let kind = job.kind();

        let mut settled: Vec<(usize, Vec<ItemResult>)> =
            stream::iter(job.targets.chunks(chunk_size).enumerate())
                .map(|(index, chunk)| async move {
                    let reply =
                        match tokio::time::timeout(timeout, self.call_chunk(&job.action, chunk))
                            .await
                        {
                            Ok(reply) => reply,
                            Err(_) => {
                                warn!(chunk = index, size = chunk.len(), "Array endpoint timed out");
                                return (
                                    index,
                                    chunk
                                        .iter()
                                        .map(|t| classify::timed_out(t.key(), timeout))
                                        .collect(),
                                );
                            }
                        };
                    debug!(chunk = index, size = chunk.len(), ok = reply.is_ok(), "Chunk settled");
                    (index, normalize_chunk(kind, chunk, reply))
                })
                .buffer_unordered(self.concurrency())
                .collect()
                .await;

        settled.sort_by_key(|(index, _)| *index);
        settled.into_iter().flat_map(|(_, results)| results).collect()
    }

    async fn call_chunk(
        &self,
        action: &BatchAction,
        chunk: &[Target],
    ) -> Result<Vec<BulkItemResult>, ClientError> {
        match action {
            BatchAction::Suspend { reason } => {
                self.gateway
                    .bulk_set_suspension(&chunk_ids(chunk), true, reason.as_deref())
                    .await
            }
            BatchAction::Unsuspend => {
                self.gateway
                    .bulk_set_suspension(&chunk_ids(chunk), false, None)
                    .await
            }
            BatchAction::Delete { reassign_to } => {
                self.gateway
                    .bulk_delete(&chunk_ids(chunk), *reassign_to)
                    .await
            }
            BatchAction::Create => self.gateway.bulk_create(&chunk_users(chunk)).await,
            BatchAction::Enroll { .. } => Err(ClientError::InvalidResponse(
                "enrollment has no array endpoint".to_string(),
            )),
        }
    }
}

fn chunk_ids(chunk: &[Target]) -> Vec<ResourceId> {
    chunk.iter().filter_map(Target::resource_id).collect()
}

fn chunk_users(chunk: &[Target]) -> Vec<NewUser> {
    chunk
        .iter()
        .filter_map(|t| match t {
            Target::NewUser(user) => Some(user.clone()),
            Target::Resource(_) => None,
        })
        .collect()
}

/// One result per target of `chunk`, in chunk order.
fn normalize_chunk(
    kind: ActionKind,
    chunk: &[Target],
    reply: Result<Vec<BulkItemResult>, ClientError>,
) -> Vec<ItemResult> {
    let entries = match reply {
        Ok(entries) => entries,
        Err(e) => {
            warn!(size = chunk.len(), error = %e, "Array endpoint call failed");
            return chunk
                .iter()
                .map(|t| classify::from_error(t.key(), kind, &e))
                .collect();
        }
    };

    if kind == ActionKind::Create {
        return normalize_creations(chunk, entries);
    }

    let mut by_id: HashMap<u64, BulkItemResult> = HashMap::with_capacity(entries.len());
    for entry in entries {
        if let Some(id) = entry.id {
            by_id.entry(id).or_insert(entry);
        }
    }

    chunk
        .iter()
        .map(|target| {
            let key = target.key();
            match target.resource_id().and_then(|id| by_id.remove(&id.get())) {
                Some(entry) => classify::bulk_entry(key, kind, entry),
                None => classify::missing_from_reply(key),
            }
        })
        .collect()
}

fn normalize_creations(chunk: &[Target], entries: Vec<BulkItemResult>) -> Vec<ItemResult> {
    let positional = entries.len() == chunk.len() && entries.iter().all(|e| e.username.is_none());

    if positional {
        return chunk
            .iter()
            .zip(entries)
            .map(|(target, entry)| classify::bulk_entry(target.key(), ActionKind::Create, entry))
            .collect();
    }

    let mut by_name: HashMap<String, BulkItemResult> = HashMap::with_capacity(entries.len());
    for entry in entries {
        if let Some(name) = entry.username.clone() {
            by_name.entry(name).or_insert(entry);
        }
    }

    chunk
        .iter()
        .map(|target| {
            let key = target.key();
            let entry = match target {
                Target::NewUser(user) => by_name.remove(&user.username),
                Target::Resource(_) => None,
            };
            match entry {
                Some(entry) => classify::bulk_entry(key, ActionKind::Create, entry),
                None => classify::missing_from_reply(key),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ItemErrorCode, StatusHint};

    fn targets(ids: &[u64]) -> Vec<Target> {
        ids.iter()
            .map(|n| Target::Resource(ResourceId::new(*n).unwrap()))
            .collect()
    }

    fn entries(json: &str) -> Vec<BulkItemResult> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_reply_order_does_not_matter() {
        let chunk = targets(&[11, 12, 13]);
        let reply = entries(
            r#"[
                {"id": 13, "success": true},
                {"id": 11, "success": true},
                {"id": 12, "success": true, "already_in_state": true}
            ]"#,
        );
        let results = normalize_chunk(ActionKind::Suspend, &chunk, Ok(reply));
        let ids: Vec<String> = results.iter().map(|r| r.target.to_string()).collect();
        assert_eq!(ids, vec!["11", "12", "13"]);
        assert!(results.iter().all(|r| r.success));
        assert_eq!(results[1].status_hint, Some(StatusHint::AlreadyInState));
    }

    #[test]
    fn test_missing_id_fails_only_that_item() {
        let chunk = targets(&[1, 2]);
        let reply = entries(r#"[{"id": "1", "success": 1}]"#);
        let results = normalize_chunk(ActionKind::Delete, &chunk, Ok(reply));
        assert!(results[0].success);
        assert!(!results[1].success);
        assert_eq!(results[1].error_code, Some(ItemErrorCode::MissingFromReply));
    }

    #[test]
    fn test_chunk_error_fails_every_item() {
        let chunk = targets(&[1, 2, 3]);
        let err = ClientError::ApiError {
            status: 500,
            url: "u".to_string(),
            code: None,
            message: "boom".to_string(),
        };
        let results = normalize_chunk(ActionKind::Unsuspend, &chunk, Err(err));
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| !r.success));
        assert!(
            results
                .iter()
                .all(|r| r.status_hint == Some(StatusHint::ProviderError))
        );
    }

    #[test]
    fn test_creations_matched_by_username() {
        let chunk = vec![
            Target::NewUser(NewUser::new("dora", "dora@example.com")),
            Target::NewUser(NewUser::new("eli", "eli@example.com")),
        ];
        let reply = entries(
            r#"[
                {"username": "eli", "success": false, "code": "existing_user_login", "message": "Sorry, that username already exists!"},
                {"username": "dora", "id": 201, "success": true, "generated_password": "pw"}
            ]"#,
        );
        let results = normalize_chunk(ActionKind::Create, &chunk, Ok(reply));
        assert!(results[0].success);
        assert_eq!(
            results[0].created.as_ref().and_then(|c| c.id),
            ResourceId::new(201)
        );
        assert!(!results[1].success);
        assert_eq!(results[1].message, "Sorry, that username already exists!");
    }

    #[test]
    fn test_creations_matched_by_position() {
        let chunk = vec![
            Target::NewUser(NewUser::new("dora", "dora@example.com")),
            Target::NewUser(NewUser::new("eli", "eli@example.com")),
        ];
        let reply = entries(r#"[{"id": 201, "success": true}, {"id": 202, "success": true}]"#);
        let results = normalize_chunk(ActionKind::Create, &chunk, Ok(reply));
        assert_eq!(
            results[1].created.as_ref().and_then(|c| c.id),
            ResourceId::new(202)
        );
    }
}
