use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use crate::application::usecases::errors::{UseCaseError, UseCaseResult};
use crate::domain::repositories::cache_invalidator::CacheInvalidator;
use crate::domain::repositories::replication::ReplicationRepository;
use crate::domain::value_objects::replication::{ReplicateModel, ReplicationReport};

pub struct ReplicationUseCase<R, C>
where
    R: ReplicationRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    replication_repo: Arc<R>,
    cache: Arc<C>,
}

impl<R, C> ReplicationUseCase<R, C>
where
    R: ReplicationRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    pub fn new(replication_repo: Arc<R>, cache: Arc<C>) -> Self {
        Self {
            replication_repo,
            cache,
        }
    }

    /// Copies every source entity into every target facility. All copies land
    /// in one transaction, so a single failure leaves nothing behind.
    pub async fn replicate(
        &self,
        actor_id: Uuid,
        facility_id: Uuid,
        model: ReplicateModel,
    ) -> UseCaseResult<ReplicationReport> {
        if !model.kind.is_replicable() {
            return Err(UseCaseError::InvalidInput(format!(
                "{} cannot be replicated",
                model.kind
            )));
        }
        if model.source_ids.is_empty() {
            return Err(UseCaseError::InvalidInput(
                "at least one source id is required".to_string(),
            ));
        }
        if model.target_facility_ids.is_empty() {
            return Err(UseCaseError::InvalidInput(
                "at least one target facility id is required".to_string(),
            ));
        }

        let replicas = self
            .replication_repo
            .replicate(
                model.kind,
                model.source_ids.clone(),
                facility_id,
                model.target_facility_ids.clone(),
                actor_id,
            )
            .await
            .map_err(|err| {
                error!(kind = %model.kind, db_error = ?err, "replication: failed to replicate");
                UseCaseError::Internal(err)
            })?;

        info!(
            kind = %model.kind,
            sources = model.source_ids.len(),
            targets = model.target_facility_ids.len(),
            replicas = replicas.len(),
            "replication: copied entities"
        );
        self.cache.invalidate(model.kind.cache_path());

        Ok(ReplicationReport {
            kind: model.kind,
            replicas,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::cache_invalidator::MockCacheInvalidator;
    use crate::domain::repositories::replication::MockReplicationRepository;
    use crate::domain::value_objects::enums::entity_kinds::EntityKind;
    use crate::domain::value_objects::replication::ReplicaRecord;

    #[tokio::test]
    async fn two_sources_by_three_targets_yield_six_replicas() {
        let source_ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        let target_ids = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];

        let mut replication_repo = MockReplicationRepository::new();
        replication_repo
            .expect_replicate()
            .withf(|kind, sources, _, targets, _| {
                *kind == EntityKind::Routine && sources.len() == 2 && targets.len() == 3
            })
            .returning(|_, sources, _, targets, _| {
                let replicas = sources
                    .iter()
                    .flat_map(|&source_id| {
                        targets.iter().map(move |&target_facility_id| ReplicaRecord {
                            source_id,
                            target_facility_id,
                            new_entity_id: Uuid::new_v4(),
                        })
                    })
                    .collect::<Vec<_>>();
                Box::pin(async move { Ok(replicas) })
            });

        let mut cache = MockCacheInvalidator::new();
        cache
            .expect_invalidate()
            .withf(|path| path == "/routines")
            .times(1)
            .return_const(());

        let usecase = ReplicationUseCase::new(Arc::new(replication_repo), Arc::new(cache));
        let report = usecase
            .replicate(
                Uuid::new_v4(),
                Uuid::new_v4(),
                ReplicateModel {
                    kind: EntityKind::Routine,
                    source_ids,
                    target_facility_ids: target_ids,
                },
            )
            .await
            .unwrap();

        assert_eq!(report.replica_count(), 6);
    }

    #[tokio::test]
    async fn payments_are_not_replicable() {
        let usecase = ReplicationUseCase::new(
            Arc::new(MockReplicationRepository::new()),
            Arc::new(MockCacheInvalidator::new()),
        );

        let err = usecase
            .replicate(
                Uuid::new_v4(),
                Uuid::new_v4(),
                ReplicateModel {
                    kind: EntityKind::Payment,
                    source_ids: vec![Uuid::new_v4()],
                    target_facility_ids: vec![Uuid::new_v4()],
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_target_list_is_rejected() {
        let usecase = ReplicationUseCase::new(
            Arc::new(MockReplicationRepository::new()),
            Arc::new(MockCacheInvalidator::new()),
        );

        let err = usecase
            .replicate(
                Uuid::new_v4(),
                Uuid::new_v4(),
                ReplicateModel {
                    kind: EntityKind::Plan,
                    source_ids: vec![Uuid::new_v4()],
                    target_facility_ids: vec![],
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
