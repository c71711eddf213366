use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use crate::application::usecases::errors::{UseCaseError, UseCaseResult};
use crate::domain::repositories::assignments::AssignmentRepository;
use crate::domain::repositories::cache_invalidator::CacheInvalidator;
use crate::domain::value_objects::assignments::{
    AssignModel, AssignmentOutcome, UnassignmentOutcome, UserAssignmentDto,
};
use crate::domain::value_objects::enums::assignment_categories::AssignmentCategory;

/// One engine serves every assignable category; the category in the request
/// selects the entity table the engine validates against.
pub struct AssignmentUseCase<R, C>
where
    R: AssignmentRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    assignment_repo: Arc<R>,
    cache: Arc<C>,
}

impl<R, C> AssignmentUseCase<R, C>
where
    R: AssignmentRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    pub fn new(assignment_repo: Arc<R>, cache: Arc<C>) -> Self {
        Self {
            assignment_repo,
            cache,
        }
    }

    /// Looks the target entity up within the caller's facility and rejects
    /// presets, which are templates and never assigned directly.
    async fn resolve_target(
        &self,
        category: AssignmentCategory,
        entity_id: Uuid,
        facility_id: Uuid,
    ) -> UseCaseResult<String> {
        let target = self
            .assignment_repo
            .find_assignable(category, entity_id, facility_id)
            .await
            .map_err(|err| {
                error!(%entity_id, db_error = ?err, "assignments: failed to load target entity");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("assignable entity"))?;

        if target.is_preset {
            return Err(UseCaseError::InvalidInput(
                "presets cannot be assigned; replicate or copy them first".to_string(),
            ));
        }

        Ok(target.name)
    }

    pub async fn assign(
        &self,
        facility_id: Uuid,
        actor_id: Uuid,
        model: AssignModel,
    ) -> UseCaseResult<AssignmentOutcome> {
        if model.user_ids.is_empty() {
            return Err(UseCaseError::InvalidInput(
                "at least one user id is required".to_string(),
            ));
        }

        let entity_name = self
            .resolve_target(model.category, model.entity_id, facility_id)
            .await?;

        let outcome = self
            .assignment_repo
            .assign(
                model.category,
                model.entity_id,
                entity_name,
                facility_id,
                model.user_ids,
                actor_id,
            )
            .await
            .map_err(|err| {
                error!(
                    entity_id = %model.entity_id,
                    db_error = ?err,
                    "assignments: failed to assign users"
                );
                UseCaseError::Internal(err)
            })?;

        info!(
            %facility_id,
            category = %model.category,
            entity_id = %model.entity_id,
            assigned = outcome.assigned.len(),
            replaced = outcome.replaced.len(),
            "assignments: assigned users"
        );
        self.cache.invalidate("/assignments");

        Ok(outcome)
    }

    pub async fn unassign(
        &self,
        facility_id: Uuid,
        actor_id: Uuid,
        model: AssignModel,
    ) -> UseCaseResult<UnassignmentOutcome> {
        if model.user_ids.is_empty() {
            return Err(UseCaseError::InvalidInput(
                "at least one user id is required".to_string(),
            ));
        }

        let entity_name = self
            .resolve_target(model.category, model.entity_id, facility_id)
            .await?;

        let outcome = self
            .assignment_repo
            .unassign(
                model.category,
                model.entity_id,
                entity_name,
                facility_id,
                model.user_ids,
                actor_id,
            )
            .await
            .map_err(|err| {
                error!(
                    entity_id = %model.entity_id,
                    db_error = ?err,
                    "assignments: failed to unassign users"
                );
                UseCaseError::Internal(err)
            })?;

        info!(
            %facility_id,
            category = %model.category,
            entity_id = %model.entity_id,
            unassigned = outcome.unassigned.len(),
            "assignments: unassigned users"
        );
        self.cache.invalidate("/assignments");

        Ok(outcome)
    }

    pub async fn list_for_entity(
        &self,
        category: AssignmentCategory,
        entity_id: Uuid,
        facility_id: Uuid,
    ) -> UseCaseResult<Vec<UserAssignmentDto>> {
        let rows = self
            .assignment_repo
            .list_active_for_entity(category, entity_id, facility_id)
            .await
            .map_err(|err| {
                error!(%entity_id, db_error = ?err, "assignments: failed to list for entity");
                UseCaseError::Internal(err)
            })?;
        Ok(rows.into_iter().map(UserAssignmentDto::from).collect())
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> UseCaseResult<Vec<UserAssignmentDto>> {
        let rows = self
            .assignment_repo
            .list_for_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "assignments: failed to list for user");
                UseCaseError::Internal(err)
            })?;
        Ok(rows.into_iter().map(UserAssignmentDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::assignments::{AssignableEntity, MockAssignmentRepository};
    use crate::domain::repositories::cache_invalidator::MockCacheInvalidator;

    fn target(entity_id: Uuid, is_preset: bool) -> AssignableEntity {
        AssignableEntity {
            id: entity_id,
            name: "Push day".to_string(),
            is_preset,
        }
    }

    #[tokio::test]
    async fn assign_resolves_the_target_and_forwards_its_name() {
        let entity_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let mut assignment_repo = MockAssignmentRepository::new();
        let found = target(entity_id, false);
        assignment_repo
            .expect_find_assignable()
            .returning(move |_, _, _| {
                let found = found.clone();
                Box::pin(async move { Ok(Some(found)) })
            });
        assignment_repo
            .expect_assign()
            .withf(move |category, id, name, _, user_ids, _| {
                *category == AssignmentCategory::Routine
                    && *id == entity_id
                    && name == "Push day"
                    && user_ids == &[user_id]
            })
            .returning(move |_, _, _, _, user_ids, _| {
                let outcome = AssignmentOutcome {
                    assigned: user_ids,
                    ..Default::default()
                };
                Box::pin(async move { Ok(outcome) })
            });

        let mut cache = MockCacheInvalidator::new();
        cache
            .expect_invalidate()
            .withf(|path| path == "/assignments")
            .times(1)
            .return_const(());

        let usecase = AssignmentUseCase::new(Arc::new(assignment_repo), Arc::new(cache));
        let outcome = usecase
            .assign(
                Uuid::new_v4(),
                Uuid::new_v4(),
                AssignModel {
                    category: AssignmentCategory::Routine,
                    entity_id,
                    user_ids: vec![user_id],
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome.assigned, vec![user_id]);
    }

    #[tokio::test]
    async fn assigning_a_preset_is_rejected() {
        let entity_id = Uuid::new_v4();

        let mut assignment_repo = MockAssignmentRepository::new();
        let found = target(entity_id, true);
        assignment_repo
            .expect_find_assignable()
            .returning(move |_, _, _| {
                let found = found.clone();
                Box::pin(async move { Ok(Some(found)) })
            });

        let usecase = AssignmentUseCase::new(
            Arc::new(assignment_repo),
            Arc::new(MockCacheInvalidator::new()),
        );
        let err = usecase
            .assign(
                Uuid::new_v4(),
                Uuid::new_v4(),
                AssignModel {
                    category: AssignmentCategory::Routine,
                    entity_id,
                    user_ids: vec![Uuid::new_v4()],
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn assigning_to_a_missing_entity_is_not_found() {
        let mut assignment_repo = MockAssignmentRepository::new();
        assignment_repo
            .expect_find_assignable()
            .returning(|_, _, _| Box::pin(async { Ok(None) }));

        let usecase = AssignmentUseCase::new(
            Arc::new(assignment_repo),
            Arc::new(MockCacheInvalidator::new()),
        );
        let err = usecase
            .assign(
                Uuid::new_v4(),
                Uuid::new_v4(),
                AssignModel {
                    category: AssignmentCategory::Plan,
                    entity_id: Uuid::new_v4(),
                    user_ids: vec![Uuid::new_v4()],
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_user_list_is_rejected_before_any_lookup() {
        let usecase = AssignmentUseCase::new(
            Arc::new(MockAssignmentRepository::new()),
            Arc::new(MockCacheInvalidator::new()),
        );
        let err = usecase
            .unassign(
                Uuid::new_v4(),
                Uuid::new_v4(),
                AssignModel {
                    category: AssignmentCategory::Diary,
                    entity_id: Uuid::new_v4(),
                    user_ids: vec![],
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
