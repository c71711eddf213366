use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::application::usecases::errors::{UseCaseError, UseCaseResult};
use crate::domain::entities::routines::{InsertRoutineEntity, RoutineChangeset};
use crate::domain::repositories::cache_invalidator::CacheInvalidator;
use crate::domain::repositories::routines::RoutineRepository;
use crate::domain::value_objects::audit::{
    audit_record, staff_notification, MutationSideEffects, TransactionType,
};
use crate::domain::value_objects::enums::day_of_week::DayOfWeek;
use crate::domain::value_objects::enums::{
    audit_actions::AuditAction, entity_kinds::EntityKind,
};
use crate::domain::value_objects::routines::{ExerciseModel, InsertRoutineModel, RoutineDto};

/// One use case serves both routines and preset routines; the preset flag
/// picks the entity kind for auditing and cache paths.
pub struct RoutineUseCase<R, C>
where
    R: RoutineRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    routine_repo: Arc<R>,
    cache: Arc<C>,
    kind: EntityKind,
}

impl<R, C> RoutineUseCase<R, C>
where
    R: RoutineRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    pub fn new(routine_repo: Arc<R>, cache: Arc<C>, preset: bool) -> Self {
        let kind = if preset {
            EntityKind::PresetRoutine
        } else {
            EntityKind::Routine
        };
        Self {
            routine_repo,
            cache,
            kind,
        }
    }

    fn is_preset(&self) -> bool {
        self.kind.is_preset()
    }

    fn validate(model: &InsertRoutineModel) -> UseCaseResult<()> {
        if model.name.trim().is_empty() {
            return Err(UseCaseError::InvalidInput(
                "routine name is required".to_string(),
            ));
        }
        for exercises in model.daily_exercises.values() {
            for exercise in exercises {
                if exercise.series <= 0 || exercise.count <= 0 {
                    return Err(UseCaseError::InvalidInput(
                        "exercise series and count must be positive".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    fn exercise_count(days: &BTreeMap<DayOfWeek, Vec<ExerciseModel>>) -> usize {
        days.values().map(Vec::len).sum()
    }

    pub async fn create(
        &self,
        facility_id: Uuid,
        actor_id: Uuid,
        mut model: InsertRoutineModel,
    ) -> UseCaseResult<Uuid> {
        Self::validate(&model)?;
        // A day submitted with an empty exercise list carries no data and
        // must not materialize a daily row.
        model
            .daily_exercises
            .retain(|_, exercises| !exercises.is_empty());

        let routine = InsertRoutineEntity {
            facility_id,
            name: model.name.clone(),
            description: model.description,
            is_preset: self.is_preset(),
        };

        let type_ = TransactionType(self.kind, AuditAction::Created);
        let side_effects = MutationSideEffects::new()
            .with_transaction(audit_record(
                type_,
                actor_id,
                facility_id,
                None,
                json!({
                    "name": model.name,
                    "days": model.daily_exercises.len(),
                    "exercises": Self::exercise_count(&model.daily_exercises),
                }),
            ))
            .with_notification(staff_notification(
                type_,
                actor_id,
                facility_id,
                None,
                format!("Routine \"{}\" was created", model.name),
            ));

        let routine_id = self
            .routine_repo
            .create(routine, model.daily_exercises, side_effects)
            .await
            .map_err(|err| {
                error!(%facility_id, db_error = ?err, "routines: failed to create routine");
                UseCaseError::Internal(err)
            })?;

        info!(%facility_id, %routine_id, kind = %self.kind, "routines: created routine");
        self.cache.invalidate(self.kind.cache_path());

        Ok(routine_id)
    }

    pub async fn update(
        &self,
        routine_id: Uuid,
        facility_id: Uuid,
        actor_id: Uuid,
        mut model: InsertRoutineModel,
    ) -> UseCaseResult<Uuid> {
        Self::validate(&model)?;
        model
            .daily_exercises
            .retain(|_, exercises| !exercises.is_empty());

        let graph = self
            .routine_repo
            .find_graph(routine_id, facility_id)
            .await
            .map_err(|err| {
                error!(%routine_id, db_error = ?err, "routines: failed to load routine for update");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("routine"))?;
        if graph.routine.is_preset != self.is_preset() {
            return Err(UseCaseError::NotFound("routine"));
        }

        let changes = RoutineChangeset {
            name: model.name.clone(),
            description: model.description,
            updated_at: Utc::now(),
        };

        let type_ = TransactionType(self.kind, AuditAction::Updated);
        let side_effects = MutationSideEffects::new()
            .with_transaction(audit_record(
                type_,
                actor_id,
                facility_id,
                Some(routine_id),
                json!({
                    "name": model.name,
                    "exercises": Self::exercise_count(&model.daily_exercises),
                }),
            ))
            .with_notification(staff_notification(
                type_,
                actor_id,
                facility_id,
                Some(routine_id),
                format!("Routine \"{}\" was updated", model.name),
            ));

        self.routine_repo
            .update(
                routine_id,
                facility_id,
                changes,
                model.daily_exercises,
                side_effects,
            )
            .await
            .map_err(|err| {
                error!(%routine_id, db_error = ?err, "routines: failed to update routine");
                UseCaseError::Internal(err)
            })?;

        info!(%facility_id, %routine_id, kind = %self.kind, "routines: updated routine");
        self.cache.invalidate(self.kind.cache_path());

        Ok(routine_id)
    }

    pub async fn delete_many(
        &self,
        facility_id: Uuid,
        actor_id: Uuid,
        routine_ids: Vec<Uuid>,
    ) -> UseCaseResult<u64> {
        if routine_ids.is_empty() {
            return Err(UseCaseError::InvalidInput(
                "at least one routine id is required".to_string(),
            ));
        }

        let type_ = TransactionType(self.kind, AuditAction::Deleted);
        let mut side_effects = MutationSideEffects::new().with_notification(staff_notification(
            type_,
            actor_id,
            facility_id,
            None,
            format!("{} routine(s) were deleted", routine_ids.len()),
        ));
        for &routine_id in &routine_ids {
            side_effects = side_effects.with_transaction(audit_record(
                type_,
                actor_id,
                facility_id,
                Some(routine_id),
                json!({}),
            ));
        }

        let deleted = self
            .routine_repo
            .delete_many(routine_ids, facility_id, side_effects)
            .await
            .map_err(|err| {
                error!(%facility_id, db_error = ?err, "routines: failed to delete routines");
                UseCaseError::Internal(err)
            })?;

        info!(%facility_id, deleted, kind = %self.kind, "routines: deleted routines");
        self.cache.invalidate(self.kind.cache_path());

        Ok(deleted)
    }

    pub async fn list(&self, facility_id: Uuid) -> UseCaseResult<Vec<RoutineDto>> {
        let routines = self
            .routine_repo
            .list(facility_id, self.is_preset())
            .await
            .map_err(|err| {
                error!(%facility_id, db_error = ?err, "routines: failed to list routines");
                UseCaseError::Internal(err)
            })?;
        Ok(routines.into_iter().map(RoutineDto::from).collect())
    }

    pub async fn get(&self, routine_id: Uuid, facility_id: Uuid) -> UseCaseResult<RoutineDto> {
        let graph = self
            .routine_repo
            .find_graph(routine_id, facility_id)
            .await
            .map_err(|err| {
                error!(%routine_id, db_error = ?err, "routines: failed to load routine");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("routine"))?;
        if graph.routine.is_preset != self.is_preset() {
            return Err(UseCaseError::NotFound("routine"));
        }
        Ok(graph.into_dto())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::cache_invalidator::MockCacheInvalidator;
    use crate::domain::repositories::routines::MockRoutineRepository;

    /// Monday carries one exercise; every other day is present with an
    /// explicitly empty exercise list.
    fn sample_model() -> InsertRoutineModel {
        let mut daily_exercises: BTreeMap<DayOfWeek, Vec<ExerciseModel>> =
            DayOfWeek::ALL.into_iter().map(|day| (day, vec![])).collect();
        daily_exercises.insert(
            DayOfWeek::Monday,
            vec![ExerciseModel {
                name: "Bench press".to_string(),
                body_zone: "chest".to_string(),
                series: 4,
                count: 8,
                measure: Some("kg".to_string()),
                rest: Some(90),
                description: None,
                photo_url: None,
            }],
        );
        InsertRoutineModel {
            name: "Push day".to_string(),
            description: "Chest and triceps".to_string(),
            daily_exercises,
        }
    }

    #[tokio::test]
    async fn create_only_materializes_populated_days() {
        let facility_id = Uuid::new_v4();
        let routine_id = Uuid::new_v4();

        let mut routine_repo = MockRoutineRepository::new();
        routine_repo
            .expect_create()
            .withf(move |routine, days, side_effects| {
                !routine.is_preset
                    && days.len() == 1
                    && days.contains_key(&DayOfWeek::Monday)
                    && side_effects.transactions.len() == 1
                    && side_effects.transactions[0].type_ == "routine_created"
                    && side_effects.transactions[0].details["days"] == 1
            })
            .returning(move |_, _, _| Box::pin(async move { Ok(routine_id) }));

        let mut cache = MockCacheInvalidator::new();
        cache
            .expect_invalidate()
            .withf(|path| path == "/routines")
            .times(1)
            .return_const(());

        let usecase = RoutineUseCase::new(Arc::new(routine_repo), Arc::new(cache), false);
        let created = usecase
            .create(facility_id, Uuid::new_v4(), sample_model())
            .await
            .unwrap();

        assert_eq!(created, routine_id);
    }

    #[tokio::test]
    async fn failed_bulk_delete_surfaces_error_without_invalidating_cache() {
        let mut routine_repo = MockRoutineRepository::new();
        routine_repo.expect_delete_many().returning(|_, _, _| {
            Box::pin(async { Err(anyhow::anyhow!("serialization failure")) })
        });

        let mut cache = MockCacheInvalidator::new();
        cache.expect_invalidate().times(0);

        let usecase = RoutineUseCase::new(Arc::new(routine_repo), Arc::new(cache), false);
        let err = usecase
            .delete_many(Uuid::new_v4(), Uuid::new_v4(), vec![Uuid::new_v4()])
            .await
            .unwrap_err();

        assert_eq!(
            err.status_code(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn preset_variant_audits_under_its_own_kind() {
        let routine_id = Uuid::new_v4();

        let mut routine_repo = MockRoutineRepository::new();
        routine_repo
            .expect_create()
            .withf(|routine, _, side_effects| {
                routine.is_preset
                    && side_effects.transactions[0].type_ == "preset_routine_created"
            })
            .returning(move |_, _, _| Box::pin(async move { Ok(routine_id) }));

        let mut cache = MockCacheInvalidator::new();
        cache
            .expect_invalidate()
            .withf(|path| path == "/preset-routines")
            .times(1)
            .return_const(());

        let usecase = RoutineUseCase::new(Arc::new(routine_repo), Arc::new(cache), true);
        usecase
            .create(Uuid::new_v4(), Uuid::new_v4(), sample_model())
            .await
            .unwrap();
    }
}
