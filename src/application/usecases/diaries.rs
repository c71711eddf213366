use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::application::usecases::errors::{UseCaseError, UseCaseResult};
use crate::domain::entities::diaries::{DiaryChangeset, InsertDiaryEntity};
use crate::domain::repositories::cache_invalidator::CacheInvalidator;
use crate::domain::repositories::diaries::DiaryRepository;
use crate::domain::value_objects::audit::{
    audit_record, staff_notification, MutationSideEffects, TransactionType,
};
use crate::domain::value_objects::diaries::{DiaryDto, InsertDiaryModel};
use crate::domain::value_objects::enums::{
    audit_actions::AuditAction, entity_kinds::EntityKind,
};

pub struct DiaryUseCase<R, C>
where
    R: DiaryRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    diary_repo: Arc<R>,
    cache: Arc<C>,
}

impl<R, C> DiaryUseCase<R, C>
where
    R: DiaryRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    pub fn new(diary_repo: Arc<R>, cache: Arc<C>) -> Self {
        Self { diary_repo, cache }
    }

    fn validate(model: &InsertDiaryModel) -> UseCaseResult<()> {
        if model.name.trim().is_empty() {
            return Err(UseCaseError::InvalidInput(
                "diary name is required".to_string(),
            ));
        }
        if model.date_from > model.date_until {
            return Err(UseCaseError::InvalidInput(
                "diary starts after it ends".to_string(),
            ));
        }
        if model.amount_of_people <= 0 {
            return Err(UseCaseError::InvalidInput(
                "diary capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn create(
        &self,
        facility_id: Uuid,
        actor_id: Uuid,
        model: InsertDiaryModel,
    ) -> UseCaseResult<Uuid> {
        Self::validate(&model)?;

        let diary = InsertDiaryEntity {
            facility_id,
            activity_id: model.activity_id,
            name: model.name.clone(),
            type_of_schedule: model.type_of_schedule,
            date_from: model.date_from,
            date_until: model.date_until,
            repeat_for: model.repeat_for,
            term_duration: model.term_duration,
            amount_of_people: model.amount_of_people,
            is_active: true,
            genre_exclusive: model.genre_exclusive,
            works_holidays: model.works_holidays,
            observations: model.observations,
        };

        let type_ = TransactionType(EntityKind::Diary, AuditAction::Created);
        let side_effects = MutationSideEffects::new()
            .with_transaction(audit_record(
                type_,
                actor_id,
                facility_id,
                None,
                json!({
                    "name": model.name,
                    "days_available": model.days_available.len(),
                    "offer_days": model.offer_days.len(),
                }),
            ))
            .with_notification(staff_notification(
                type_,
                actor_id,
                facility_id,
                None,
                format!("Diary \"{}\" was created", model.name),
            ));

        let diary_id = self
            .diary_repo
            .create(diary, model.days_available, model.offer_days, side_effects)
            .await
            .map_err(|err| {
                error!(%facility_id, db_error = ?err, "diaries: failed to create diary");
                UseCaseError::Internal(err)
            })?;

        info!(%facility_id, %diary_id, "diaries: created diary");
        self.cache.invalidate(EntityKind::Diary.cache_path());

        Ok(diary_id)
    }

    pub async fn update(
        &self,
        diary_id: Uuid,
        facility_id: Uuid,
        actor_id: Uuid,
        model: InsertDiaryModel,
    ) -> UseCaseResult<Uuid> {
        Self::validate(&model)?;

        if self
            .diary_repo
            .find_graph(diary_id, facility_id)
            .await
            .map_err(|err| {
                error!(%diary_id, db_error = ?err, "diaries: failed to load diary for update");
                UseCaseError::Internal(err)
            })?
            .is_none()
        {
            return Err(UseCaseError::NotFound("diary"));
        }

        let changes = DiaryChangeset {
            activity_id: model.activity_id,
            name: model.name.clone(),
            type_of_schedule: model.type_of_schedule,
            date_from: model.date_from,
            date_until: model.date_until,
            repeat_for: model.repeat_for,
            term_duration: model.term_duration,
            amount_of_people: model.amount_of_people,
            is_active: true,
            genre_exclusive: model.genre_exclusive,
            works_holidays: model.works_holidays,
            observations: model.observations,
            updated_at: Utc::now(),
        };

        let type_ = TransactionType(EntityKind::Diary, AuditAction::Updated);
        let side_effects = MutationSideEffects::new()
            .with_transaction(audit_record(
                type_,
                actor_id,
                facility_id,
                Some(diary_id),
                json!({ "name": model.name }),
            ))
            .with_notification(staff_notification(
                type_,
                actor_id,
                facility_id,
                Some(diary_id),
                format!("Diary \"{}\" was updated", model.name),
            ));

        self.diary_repo
            .update(
                diary_id,
                facility_id,
                changes,
                model.days_available,
                model.offer_days,
                side_effects,
            )
            .await
            .map_err(|err| {
                error!(%diary_id, db_error = ?err, "diaries: failed to update diary");
                UseCaseError::Internal(err)
            })?;

        info!(%facility_id, %diary_id, "diaries: updated diary");
        self.cache.invalidate(EntityKind::Diary.cache_path());

        Ok(diary_id)
    }

    pub async fn delete_many(
        &self,
        facility_id: Uuid,
        actor_id: Uuid,
        diary_ids: Vec<Uuid>,
    ) -> UseCaseResult<u64> {
        if diary_ids.is_empty() {
            return Err(UseCaseError::InvalidInput(
                "at least one diary id is required".to_string(),
            ));
        }

        let type_ = TransactionType(EntityKind::Diary, AuditAction::Deleted);
        let mut side_effects = MutationSideEffects::new().with_notification(staff_notification(
            type_,
            actor_id,
            facility_id,
            None,
            format!("{} diary(ies) were deleted", diary_ids.len()),
        ));
        for &diary_id in &diary_ids {
            side_effects = side_effects.with_transaction(audit_record(
                type_,
                actor_id,
                facility_id,
                Some(diary_id),
                json!({}),
            ));
        }

        let deleted = self
            .diary_repo
            .delete_many(diary_ids, facility_id, side_effects)
            .await
            .map_err(|err| {
                error!(%facility_id, db_error = ?err, "diaries: failed to delete diaries");
                UseCaseError::Internal(err)
            })?;

        info!(%facility_id, deleted, "diaries: deleted diaries");
        self.cache.invalidate(EntityKind::Diary.cache_path());

        Ok(deleted)
    }

    pub async fn list(&self, facility_id: Uuid) -> UseCaseResult<Vec<DiaryDto>> {
        let diaries = self.diary_repo.list(facility_id).await.map_err(|err| {
            error!(%facility_id, db_error = ?err, "diaries: failed to list diaries");
            UseCaseError::Internal(err)
        })?;
        Ok(diaries.into_iter().map(DiaryDto::from).collect())
    }

    pub async fn get(&self, diary_id: Uuid, facility_id: Uuid) -> UseCaseResult<DiaryDto> {
        let graph = self
            .diary_repo
            .find_graph(diary_id, facility_id)
            .await
            .map_err(|err| {
                error!(%diary_id, db_error = ?err, "diaries: failed to load diary");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("diary"))?;
        Ok(graph.into_dto())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::cache_invalidator::MockCacheInvalidator;
    use crate::domain::repositories::diaries::MockDiaryRepository;
    use crate::domain::value_objects::diaries::DayAvailableModel;
    use crate::domain::value_objects::enums::day_of_week::DayOfWeek;

    fn sample_model() -> InsertDiaryModel {
        let now = Utc::now();
        InsertDiaryModel {
            activity_id: Uuid::new_v4(),
            name: "Morning yoga".to_string(),
            type_of_schedule: "RECURRING".to_string(),
            date_from: now,
            date_until: now + chrono::Duration::days(90),
            repeat_for: None,
            term_duration: 60,
            amount_of_people: 15,
            genre_exclusive: "NONE".to_string(),
            works_holidays: false,
            observations: None,
            days_available: vec![DayAvailableModel {
                day_of_week: DayOfWeek::Monday,
                time_start: "08:00".to_string(),
                time_end: "09:00".to_string(),
                available: true,
            }],
            offer_days: vec![],
        }
    }

    #[tokio::test]
    async fn create_pairs_the_mutation_with_audit_and_notification() {
        let facility_id = Uuid::new_v4();
        let diary_id = Uuid::new_v4();

        let mut diary_repo = MockDiaryRepository::new();
        diary_repo
            .expect_create()
            .withf(move |diary, days, _, side_effects| {
                diary.facility_id == facility_id
                    && days.len() == 1
                    && side_effects.transactions.len() == 1
                    && side_effects.transactions[0].type_ == "diary_created"
                    && !side_effects.notifications.is_empty()
            })
            .returning(move |_, _, _, _| Box::pin(async move { Ok(diary_id) }));

        let mut cache = MockCacheInvalidator::new();
        cache
            .expect_invalidate()
            .withf(|path| path == "/diaries")
            .times(1)
            .return_const(());

        let usecase = DiaryUseCase::new(Arc::new(diary_repo), Arc::new(cache));
        let created = usecase
            .create(facility_id, Uuid::new_v4(), sample_model())
            .await
            .unwrap();

        assert_eq!(created, diary_id);
    }

    #[tokio::test]
    async fn create_rejects_inverted_date_range() {
        let usecase = DiaryUseCase::new(
            Arc::new(MockDiaryRepository::new()),
            Arc::new(MockCacheInvalidator::new()),
        );

        let mut model = sample_model();
        model.date_until = model.date_from - chrono::Duration::days(1);

        let err = usecase
            .create(Uuid::new_v4(), Uuid::new_v4(), model)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
