use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::nutritional_plans::{
    InsertNutritionalPlanEntity, NutritionalPlanChangeset, NutritionalPlanEntity,
};
use crate::domain::value_objects::audit::MutationSideEffects;
use crate::domain::value_objects::enums::day_of_week::DayOfWeek;
use crate::domain::value_objects::nutritional_plans::{MealModel, NutritionalPlanGraph};

#[async_trait]
#[automock]
pub trait NutritionalPlanRepository {
    async fn create(
        &self,
        plan: InsertNutritionalPlanEntity,
        daily_meals: BTreeMap<DayOfWeek, Vec<MealModel>>,
        side_effects: MutationSideEffects,
    ) -> Result<Uuid>;

    /// Children are replaced wholesale on update.
    async fn update(
        &self,
        plan_id: Uuid,
        facility_id: Uuid,
        changes: NutritionalPlanChangeset,
        daily_meals: BTreeMap<DayOfWeek, Vec<MealModel>>,
        side_effects: MutationSideEffects,
    ) -> Result<Uuid>;

    async fn delete_many(
        &self,
        plan_ids: Vec<Uuid>,
        facility_id: Uuid,
        side_effects: MutationSideEffects,
    ) -> Result<u64>;

    async fn list(&self, facility_id: Uuid, is_preset: bool)
        -> Result<Vec<NutritionalPlanEntity>>;
    async fn find_graph(
        &self,
        plan_id: Uuid,
        facility_id: Uuid,
    ) -> Result<Option<NutritionalPlanGraph>>;
}
