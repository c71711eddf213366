use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::application::usecases::errors::{UseCaseError, UseCaseResult};
use crate::domain::entities::plans::{InsertPlanEntity, PlanChangeset};
use crate::domain::repositories::cache_invalidator::CacheInvalidator;
use crate::domain::repositories::plans::PlanRepository;
use crate::domain::value_objects::audit::{
    audit_record, staff_notification, MutationSideEffects, TransactionType,
};
use crate::domain::value_objects::enums::{
    audit_actions::AuditAction, entity_kinds::EntityKind,
};
use crate::domain::value_objects::plans::{InsertPlanModel, PlanDto};

pub struct PlanUseCase<R, C>
where
    R: PlanRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    plan_repo: Arc<R>,
    cache: Arc<C>,
}

impl<R, C> PlanUseCase<R, C>
where
    R: PlanRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    pub fn new(plan_repo: Arc<R>, cache: Arc<C>) -> Self {
        Self { plan_repo, cache }
    }

    fn validate(model: &InsertPlanModel) -> UseCaseResult<()> {
        if model.name.trim().is_empty() {
            return Err(UseCaseError::InvalidInput("plan name is required".to_string()));
        }
        if model.price_minor < 0 {
            return Err(UseCaseError::InvalidInput(
                "plan price must not be negative".to_string(),
            ));
        }
        if model.start_date > model.end_date {
            return Err(UseCaseError::InvalidInput(
                "plan start date is after its end date".to_string(),
            ));
        }
        for diary_plan in &model.diary_plans {
            if diary_plan.days_of_week.len() != 7 {
                return Err(UseCaseError::InvalidInput(
                    "diary plan days_of_week must cover all seven days".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub async fn create(
        &self,
        facility_id: Uuid,
        actor_id: Uuid,
        model: InsertPlanModel,
    ) -> UseCaseResult<Uuid> {
        Self::validate(&model)?;

        let plan = InsertPlanEntity {
            facility_id,
            name: model.name.clone(),
            description: model.description,
            price_minor: model.price_minor,
            start_date: model.start_date,
            end_date: model.end_date,
            expiration_date: model.expiration_date,
            generate_invoice: model.generate_invoice,
            payment_type: model.payment_type,
            plan_type: model.plan_type,
            free_test: model.free_test,
            is_current: true,
            is_active: true,
        };

        let type_ = TransactionType(EntityKind::Plan, AuditAction::Created);
        let side_effects = MutationSideEffects::new()
            .with_transaction(audit_record(
                type_,
                actor_id,
                facility_id,
                None,
                json!({
                    "name": model.name,
                    "price_minor": plan.price_minor,
                    "diary_plans": model.diary_plans.len(),
                }),
            ))
            .with_notification(staff_notification(
                type_,
                actor_id,
                facility_id,
                None,
                format!("Plan \"{}\" was created", model.name),
            ));

        let plan_id = self
            .plan_repo
            .create(plan, model.diary_plans, side_effects)
            .await
            .map_err(|err| {
                error!(%facility_id, %actor_id, db_error = ?err, "plans: failed to create plan");
                UseCaseError::Internal(err)
            })?;

        info!(%facility_id, %plan_id, "plans: created plan");
        self.cache.invalidate(EntityKind::Plan.cache_path());

        Ok(plan_id)
    }

    pub async fn update(
        &self,
        plan_id: Uuid,
        facility_id: Uuid,
        actor_id: Uuid,
        model: InsertPlanModel,
    ) -> UseCaseResult<Uuid> {
        Self::validate(&model)?;

        if self
            .plan_repo
            .find_graph(plan_id, facility_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "plans: failed to load plan for update");
                UseCaseError::Internal(err)
            })?
            .is_none()
        {
            return Err(UseCaseError::NotFound("plan"));
        }

        let changes = PlanChangeset {
            name: model.name.clone(),
            description: model.description,
            price_minor: model.price_minor,
            start_date: model.start_date,
            end_date: model.end_date,
            expiration_date: model.expiration_date,
            generate_invoice: model.generate_invoice,
            payment_type: model.payment_type,
            plan_type: model.plan_type,
            free_test: model.free_test,
            is_current: true,
            is_active: true,
            updated_at: Utc::now(),
        };

        let type_ = TransactionType(EntityKind::Plan, AuditAction::Updated);
        let side_effects = MutationSideEffects::new()
            .with_transaction(audit_record(
                type_,
                actor_id,
                facility_id,
                Some(plan_id),
                json!({ "name": model.name, "diary_plans": model.diary_plans.len() }),
            ))
            .with_notification(staff_notification(
                type_,
                actor_id,
                facility_id,
                Some(plan_id),
                format!("Plan \"{}\" was updated", model.name),
            ));

        self.plan_repo
            .update(plan_id, facility_id, changes, model.diary_plans, side_effects)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "plans: failed to update plan");
                UseCaseError::Internal(err)
            })?;

        info!(%facility_id, %plan_id, "plans: updated plan");
        self.cache.invalidate(EntityKind::Plan.cache_path());

        Ok(plan_id)
    }

    pub async fn delete_many(
        &self,
        facility_id: Uuid,
        actor_id: Uuid,
        plan_ids: Vec<Uuid>,
    ) -> UseCaseResult<u64> {
        if plan_ids.is_empty() {
            return Err(UseCaseError::InvalidInput(
                "at least one plan id is required".to_string(),
            ));
        }

        let type_ = TransactionType(EntityKind::Plan, AuditAction::Deleted);
        let mut side_effects = MutationSideEffects::new().with_notification(staff_notification(
            type_,
            actor_id,
            facility_id,
            None,
            format!("{} plan(s) were deleted", plan_ids.len()),
        ));
        for &plan_id in &plan_ids {
            side_effects = side_effects.with_transaction(audit_record(
                type_,
                actor_id,
                facility_id,
                Some(plan_id),
                json!({}),
            ));
        }

        let deleted = self
            .plan_repo
            .delete_many(plan_ids, facility_id, side_effects)
            .await
            .map_err(|err| {
                error!(%facility_id, db_error = ?err, "plans: failed to delete plans");
                UseCaseError::Internal(err)
            })?;

        info!(%facility_id, deleted, "plans: deleted plans");
        self.cache.invalidate(EntityKind::Plan.cache_path());

        Ok(deleted)
    }

    pub async fn list(&self, facility_id: Uuid) -> UseCaseResult<Vec<PlanDto>> {
        let plans = self.plan_repo.list(facility_id).await.map_err(|err| {
            error!(%facility_id, db_error = ?err, "plans: failed to list plans");
            UseCaseError::Internal(err)
        })?;
        Ok(plans.into_iter().map(PlanDto::from).collect())
    }

    pub async fn get(&self, plan_id: Uuid, facility_id: Uuid) -> UseCaseResult<PlanDto> {
        let graph = self
            .plan_repo
            .find_graph(plan_id, facility_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "plans: failed to load plan");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("plan"))?;
        Ok(graph.into_dto())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::cache_invalidator::MockCacheInvalidator;
    use crate::domain::repositories::plans::MockPlanRepository;
    use crate::domain::value_objects::plans::DiaryPlanModel;

    fn sample_model() -> InsertPlanModel {
        let now = Utc::now();
        InsertPlanModel {
            name: "Monthly".to_string(),
            description: "Full access".to_string(),
            price_minor: 150_000,
            start_date: now,
            end_date: now + chrono::Duration::days(30),
            expiration_date: now + chrono::Duration::days(60),
            generate_invoice: true,
            payment_type: "CASH".to_string(),
            plan_type: "MEMBERSHIP".to_string(),
            free_test: false,
            diary_plans: vec![DiaryPlanModel {
                activity_id: Uuid::new_v4(),
                name: "Spinning".to_string(),
                days_of_week: vec![true, false, true, false, true, false, false],
                sessions_per_week: 3,
                vacancies: 20,
            }],
        }
    }

    #[tokio::test]
    async fn create_writes_one_audit_row_and_a_notification() {
        let facility_id = Uuid::new_v4();
        let actor_id = Uuid::new_v4();
        let plan_id = Uuid::new_v4();

        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_create()
            .withf(move |plan, diary_plans, side_effects| {
                plan.facility_id == facility_id
                    && diary_plans.len() == 1
                    && side_effects.transactions.len() == 1
                    && side_effects.transactions[0].facility_id == facility_id
                    && side_effects.transactions[0].type_ == "plan_created"
                    && !side_effects.notifications.is_empty()
                    && side_effects.notifications[0].facility_id == facility_id
            })
            .returning(move |_, _, _| Box::pin(async move { Ok(plan_id) }));

        let mut cache = MockCacheInvalidator::new();
        cache
            .expect_invalidate()
            .withf(|path| path == "/plans")
            .times(1)
            .return_const(());

        let usecase = PlanUseCase::new(Arc::new(plan_repo), Arc::new(cache));
        let created = usecase
            .create(facility_id, actor_id, sample_model())
            .await
            .unwrap();

        assert_eq!(created, plan_id);
    }

    #[tokio::test]
    async fn create_rejects_empty_name_before_any_write() {
        let plan_repo = MockPlanRepository::new();
        let cache = MockCacheInvalidator::new();
        let usecase = PlanUseCase::new(Arc::new(plan_repo), Arc::new(cache));

        let mut model = sample_model();
        model.name = "  ".to_string();

        let err = usecase
            .create(Uuid::new_v4(), Uuid::new_v4(), model)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_many_writes_one_audit_row_per_plan() {
        let facility_id = Uuid::new_v4();
        let ids = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let expected = ids.clone();

        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_delete_many()
            .withf(move |plan_ids, _, side_effects| {
                plan_ids == &expected && side_effects.transactions.len() == 3
            })
            .returning(|ids, _, _| {
                let count = ids.len() as u64;
                Box::pin(async move { Ok(count) })
            });

        let mut cache = MockCacheInvalidator::new();
        cache.expect_invalidate().return_const(());

        let usecase = PlanUseCase::new(Arc::new(plan_repo), Arc::new(cache));
        let deleted = usecase
            .delete_many(facility_id, Uuid::new_v4(), ids)
            .await
            .unwrap();

        assert_eq!(deleted, 3);
    }

    #[tokio::test]
    async fn update_of_missing_plan_is_not_found() {
        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_find_graph()
            .returning(|_, _| Box::pin(async { Ok(None) }));

        let cache = MockCacheInvalidator::new();
        let usecase = PlanUseCase::new(Arc::new(plan_repo), Arc::new(cache));

        let err = usecase
            .update(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), sample_model())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }
}
