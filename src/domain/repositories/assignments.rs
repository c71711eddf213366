use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::assignments::UserAssignmentEntity;
use crate::domain::value_objects::assignments::{AssignmentOutcome, UnassignmentOutcome};
use crate::domain::value_objects::enums::assignment_categories::AssignmentCategory;

/// What the assignment engine needs to know about a target entity before
/// touching join rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignableEntity {
    pub id: Uuid,
    pub name: String,
    pub is_preset: bool,
}

#[async_trait]
#[automock]
pub trait AssignmentRepository {
    async fn find_assignable(
        &self,
        category: AssignmentCategory,
        entity_id: Uuid,
        facility_id: Uuid,
    ) -> Result<Option<AssignableEntity>>;

    /// One transaction: partitions the users against their active rows,
    /// soft-unassigns conflicts, inserts fresh rows skipping duplicates, and
    /// writes the audit and notification fan-out.
    async fn assign(
        &self,
        category: AssignmentCategory,
        entity_id: Uuid,
        entity_name: String,
        facility_id: Uuid,
        user_ids: Vec<Uuid>,
        actor_id: Uuid,
    ) -> Result<AssignmentOutcome>;

    /// Mirror of `assign`: soft-unassigns the requested users' active rows
    /// for the entity, with audit and notifications, in one transaction.
    async fn unassign(
        &self,
        category: AssignmentCategory,
        entity_id: Uuid,
        entity_name: String,
        facility_id: Uuid,
        user_ids: Vec<Uuid>,
        actor_id: Uuid,
    ) -> Result<UnassignmentOutcome>;

    async fn list_active_for_entity(
        &self,
        category: AssignmentCategory,
        entity_id: Uuid,
        facility_id: Uuid,
    ) -> Result<Vec<UserAssignmentEntity>>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<UserAssignmentEntity>>;
}
