use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::application::usecases::errors::{UseCaseError, UseCaseResult};
use crate::domain::entities::nutritional_plans::{
    InsertNutritionalPlanEntity, NutritionalPlanChangeset,
};
use crate::domain::repositories::cache_invalidator::CacheInvalidator;
use crate::domain::repositories::nutritional_plans::NutritionalPlanRepository;
use crate::domain::value_objects::audit::{
    audit_record, staff_notification, MutationSideEffects, TransactionType,
};
use crate::domain::value_objects::enums::day_of_week::DayOfWeek;
use crate::domain::value_objects::enums::{
    audit_actions::AuditAction, entity_kinds::EntityKind,
};
use crate::domain::value_objects::nutritional_plans::{
    InsertNutritionalPlanModel, MealModel, NutritionalPlanDto,
};

/// Serves both nutritional plans and their preset templates.
pub struct NutritionalPlanUseCase<R, C>
where
    R: NutritionalPlanRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    plan_repo: Arc<R>,
    cache: Arc<C>,
    kind: EntityKind,
}

impl<R, C> NutritionalPlanUseCase<R, C>
where
    R: NutritionalPlanRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    pub fn new(plan_repo: Arc<R>, cache: Arc<C>, preset: bool) -> Self {
        let kind = if preset {
            EntityKind::PresetNutritionalPlan
        } else {
            EntityKind::NutritionalPlan
        };
        Self {
            plan_repo,
            cache,
            kind,
        }
    }

    fn is_preset(&self) -> bool {
        self.kind.is_preset()
    }

    fn validate(model: &InsertNutritionalPlanModel) -> UseCaseResult<()> {
        if model.name.trim().is_empty() {
            return Err(UseCaseError::InvalidInput(
                "nutritional plan name is required".to_string(),
            ));
        }
        for meals in model.daily_meals.values() {
            for meal in meals {
                if meal.meal_type.trim().is_empty() {
                    return Err(UseCaseError::InvalidInput(
                        "meal type is required".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    fn meal_counts(days: &BTreeMap<DayOfWeek, Vec<MealModel>>) -> (usize, usize) {
        let meals: usize = days.values().map(Vec::len).sum();
        let food_items: usize = days
            .values()
            .flat_map(|meals| meals.iter().map(|meal| meal.food_items.len()))
            .sum();
        (meals, food_items)
    }

    pub async fn create(
        &self,
        facility_id: Uuid,
        actor_id: Uuid,
        mut model: InsertNutritionalPlanModel,
    ) -> UseCaseResult<Uuid> {
        Self::validate(&model)?;
        // A day submitted with an empty meal list carries no data and must
        // not materialize a daily row.
        model.daily_meals.retain(|_, meals| !meals.is_empty());

        let plan = InsertNutritionalPlanEntity {
            facility_id,
            name: model.name.clone(),
            description: model.description,
            is_preset: self.is_preset(),
        };

        let (meals, food_items) = Self::meal_counts(&model.daily_meals);
        let type_ = TransactionType(self.kind, AuditAction::Created);
        let side_effects = MutationSideEffects::new()
            .with_transaction(audit_record(
                type_,
                actor_id,
                facility_id,
                None,
                json!({
                    "name": model.name,
                    "daily_meals": model.daily_meals.len(),
                    "meals": meals,
                    "food_items": food_items,
                }),
            ))
            .with_notification(staff_notification(
                type_,
                actor_id,
                facility_id,
                None,
                format!("Nutritional plan \"{}\" was created", model.name),
            ));

        let plan_id = self
            .plan_repo
            .create(plan, model.daily_meals, side_effects)
            .await
            .map_err(|err| {
                error!(
                    %facility_id,
                    db_error = ?err,
                    "nutritional_plans: failed to create plan"
                );
                UseCaseError::Internal(err)
            })?;

        info!(%facility_id, %plan_id, kind = %self.kind, "nutritional_plans: created plan");
        self.cache.invalidate(self.kind.cache_path());

        Ok(plan_id)
    }

    pub async fn update(
        &self,
        plan_id: Uuid,
        facility_id: Uuid,
        actor_id: Uuid,
        mut model: InsertNutritionalPlanModel,
    ) -> UseCaseResult<Uuid> {
        Self::validate(&model)?;
        model.daily_meals.retain(|_, meals| !meals.is_empty());

        let graph = self
            .plan_repo
            .find_graph(plan_id, facility_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "nutritional_plans: failed to load plan for update");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("nutritional plan"))?;
        if graph.plan.is_preset != self.is_preset() {
            return Err(UseCaseError::NotFound("nutritional plan"));
        }

        let changes = NutritionalPlanChangeset {
            name: model.name.clone(),
            description: model.description,
            updated_at: Utc::now(),
        };

        let (meals, food_items) = Self::meal_counts(&model.daily_meals);
        let type_ = TransactionType(self.kind, AuditAction::Updated);
        let side_effects = MutationSideEffects::new()
            .with_transaction(audit_record(
                type_,
                actor_id,
                facility_id,
                Some(plan_id),
                json!({ "name": model.name, "meals": meals, "food_items": food_items }),
            ))
            .with_notification(staff_notification(
                type_,
                actor_id,
                facility_id,
                Some(plan_id),
                format!("Nutritional plan \"{}\" was updated", model.name),
            ));

        self.plan_repo
            .update(plan_id, facility_id, changes, model.daily_meals, side_effects)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "nutritional_plans: failed to update plan");
                UseCaseError::Internal(err)
            })?;

        info!(%facility_id, %plan_id, kind = %self.kind, "nutritional_plans: updated plan");
        self.cache.invalidate(self.kind.cache_path());

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
                "at least one nutritional plan id is required".to_string(),
            ));
        }

        let type_ = TransactionType(self.kind, AuditAction::Deleted);
        let mut side_effects = MutationSideEffects::new().with_notification(staff_notification(
            type_,
            actor_id,
            facility_id,
            None,
            format!("{} nutritional plan(s) were deleted", plan_ids.len()),
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
                error!(%facility_id, db_error = ?err, "nutritional_plans: failed to delete plans");
                UseCaseError::Internal(err)
            })?;

        info!(%facility_id, deleted, kind = %self.kind, "nutritional_plans: deleted plans");
        self.cache.invalidate(self.kind.cache_path());

        Ok(deleted)
    }

    pub async fn list(&self, facility_id: Uuid) -> UseCaseResult<Vec<NutritionalPlanDto>> {
        let plans = self
            .plan_repo
            .list(facility_id, self.is_preset())
            .await
            .map_err(|err| {
                error!(%facility_id, db_error = ?err, "nutritional_plans: failed to list plans");
                UseCaseError::Internal(err)
            })?;
        Ok(plans.into_iter().map(NutritionalPlanDto::from).collect())
    }

    pub async fn get(
        &self,
        plan_id: Uuid,
        facility_id: Uuid,
    ) -> UseCaseResult<NutritionalPlanDto> {
        let graph = self
            .plan_repo
            .find_graph(plan_id, facility_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "nutritional_plans: failed to load plan");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("nutritional plan"))?;
        if graph.plan.is_preset != self.is_preset() {
            return Err(UseCaseError::NotFound("nutritional plan"));
        }
        Ok(graph.into_dto())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::nutritional_plans::NutritionalPlanEntity;
    use crate::domain::repositories::cache_invalidator::MockCacheInvalidator;
    use crate::domain::repositories::nutritional_plans::MockNutritionalPlanRepository;
    use crate::domain::value_objects::nutritional_plans::{FoodItemModel, NutritionalPlanGraph};

    /// Monday carries one meal; every other day is present with an
    /// explicitly empty meal list.
    fn monday_only_model() -> InsertNutritionalPlanModel {
        let mut daily_meals: BTreeMap<DayOfWeek, Vec<MealModel>> =
            DayOfWeek::ALL.into_iter().map(|day| (day, vec![])).collect();
        daily_meals.insert(
            DayOfWeek::Monday,
            vec![MealModel {
                meal_type: "BREAKFAST".to_string(),
                time: None,
                observations: None,
                food_items: vec![FoodItemModel {
                    name: "Oats".to_string(),
                    portion: Some(50.0),
                    unit: Some("g".to_string()),
                    calories: None,
                    protein: None,
                    carbs: None,
                    fat: None,
                }],
            }],
        );
        InsertNutritionalPlanModel {
            name: "Cut".to_string(),
            description: "Caloric deficit".to_string(),
            daily_meals,
        }
    }

    #[tokio::test]
    async fn monday_only_input_creates_exactly_one_daily_meal() {
        let plan_id = Uuid::new_v4();

        let mut plan_repo = MockNutritionalPlanRepository::new();
        plan_repo
            .expect_create()
            .withf(|_, daily_meals, side_effects| {
                daily_meals.len() == 1
                    && daily_meals[&DayOfWeek::Monday].len() == 1
                    && daily_meals[&DayOfWeek::Monday][0].food_items.len() == 1
                    && side_effects.transactions.len() == 1
                    && side_effects.transactions[0].details["daily_meals"] == 1
                    && side_effects.transactions[0].details["meals"] == 1
                    && side_effects.transactions[0].details["food_items"] == 1
            })
            .returning(move |_, _, _| Box::pin(async move { Ok(plan_id) }));

        let mut cache = MockCacheInvalidator::new();
        cache
            .expect_invalidate()
            .withf(|path| path == "/nutritional-plans")
            .times(1)
            .return_const(());

        let usecase =
            NutritionalPlanUseCase::new(Arc::new(plan_repo), Arc::new(cache), false);
        let created = usecase
            .create(Uuid::new_v4(), Uuid::new_v4(), monday_only_model())
            .await
            .unwrap();

        assert_eq!(created, plan_id);
    }

    #[tokio::test]
    async fn update_drops_empty_day_arrays_before_replacing_meals() {
        let plan_id = Uuid::new_v4();
        let facility_id = Uuid::new_v4();

        let mut plan_repo = MockNutritionalPlanRepository::new();
        plan_repo.expect_find_graph().returning(move |id, fid| {
            Box::pin(async move {
                Ok(Some(NutritionalPlanGraph {
                    plan: NutritionalPlanEntity {
                        id,
                        facility_id: fid,
                        name: "Cut".to_string(),
                        description: "Caloric deficit".to_string(),
                        is_preset: false,
                        created_at: Utc::now(),
                        updated_at: Utc::now(),
                    },
                    days: vec![],
                }))
            })
        });
        plan_repo
            .expect_update()
            .withf(|_, _, _, daily_meals, side_effects| {
                daily_meals.len() == 1
                    && daily_meals.contains_key(&DayOfWeek::Monday)
                    && side_effects.transactions[0].details["meals"] == 1
            })
            .returning(move |_, _, _, _, _| Box::pin(async move { Ok(plan_id) }));

        let mut cache = MockCacheInvalidator::new();
        cache
            .expect_invalidate()
            .withf(|path| path == "/nutritional-plans")
            .times(1)
            .return_const(());

        let usecase =
            NutritionalPlanUseCase::new(Arc::new(plan_repo), Arc::new(cache), false);
        usecase
            .update(plan_id, facility_id, Uuid::new_v4(), monday_only_model())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn failed_bulk_delete_surfaces_error_without_invalidating_cache() {
        let mut plan_repo = MockNutritionalPlanRepository::new();
        plan_repo.expect_delete_many().returning(|_, _, _| {
            Box::pin(async { Err(anyhow::anyhow!("serialization failure")) })
        });

        let mut cache = MockCacheInvalidator::new();
        cache.expect_invalidate().times(0);

        let usecase =
            NutritionalPlanUseCase::new(Arc::new(plan_repo), Arc::new(cache), false);
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
    async fn missing_plan_update_is_not_found() {
        let mut plan_repo = MockNutritionalPlanRepository::new();
        plan_repo
            .expect_find_graph()
            .returning(|_, _| Box::pin(async { Ok(None) }));

        let usecase = NutritionalPlanUseCase::new(
            Arc::new(plan_repo),
            Arc::new(MockCacheInvalidator::new()),
            false,
        );

        let err = usecase
            .update(
                Uuid::new_v4(),
                Uuid::new_v4(),
                Uuid::new_v4(),
                monday_only_model(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }
}
