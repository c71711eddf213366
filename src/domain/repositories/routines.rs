use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::routines::{InsertRoutineEntity, RoutineChangeset, RoutineEntity};
use crate::domain::value_objects::audit::MutationSideEffects;
use crate::domain::value_objects::enums::day_of_week::DayOfWeek;
use crate::domain::value_objects::routines::{ExerciseModel, RoutineGraph};

#[async_trait]
#[automock]
pub trait RoutineRepository {
    async fn create(
        &self,
        routine: InsertRoutineEntity,
        daily_exercises: BTreeMap<DayOfWeek, Vec<ExerciseModel>>,
        side_effects: MutationSideEffects,
    ) -> Result<Uuid>;

    /// Children are replaced wholesale on update.
    async fn update(
        &self,
        routine_id: Uuid,
        facility_id: Uuid,
        changes: RoutineChangeset,
        daily_exercises: BTreeMap<DayOfWeek, Vec<ExerciseModel>>,
        side_effects: MutationSideEffects,
    ) -> Result<Uuid>;

    async fn delete_many(
        &self,
        routine_ids: Vec<Uuid>,
        facility_id: Uuid,
        side_effects: MutationSideEffects,
    ) -> Result<u64>;

    async fn list(&self, facility_id: Uuid, is_preset: bool) -> Result<Vec<RoutineEntity>>;
    async fn find_graph(
        &self,
        routine_id: Uuid,
        facility_id: Uuid,
    ) -> Result<Option<RoutineGraph>>;
}
