use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::plans::{InsertPlanEntity, PlanChangeset, PlanEntity};
use crate::domain::value_objects::audit::MutationSideEffects;
use crate::domain::value_objects::plans::{DiaryPlanModel, PlanGraph};

#[async_trait]
#[automock]
pub trait PlanRepository {
    /// Inserts the plan, its diary-plan slots and the side effects in one
    /// database transaction.
    async fn create(
        &self,
        plan: InsertPlanEntity,
        diary_plans: Vec<DiaryPlanModel>,
        side_effects: MutationSideEffects,
    ) -> Result<Uuid>;

    /// Updates the plan and diffs diary plans by name so surviving slots keep
    /// their ids for dependent assignments.
    async fn update(
        &self,
        plan_id: Uuid,
        facility_id: Uuid,
        changes: PlanChangeset,
        diary_plans: Vec<DiaryPlanModel>,
        side_effects: MutationSideEffects,
    ) -> Result<Uuid>;

    /// Serializable bulk delete of plans, their slots and dependent
    /// assignment rows; all-or-nothing.
    async fn delete_many(
        &self,
        plan_ids: Vec<Uuid>,
        facility_id: Uuid,
        side_effects: MutationSideEffects,
    ) -> Result<u64>;

    async fn list(&self, facility_id: Uuid) -> Result<Vec<PlanEntity>>;
    async fn find_graph(&self, plan_id: Uuid, facility_id: Uuid) -> Result<Option<PlanGraph>>;
}
