use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::diaries::{DiaryChangeset, DiaryEntity, InsertDiaryEntity};
use crate::domain::value_objects::audit::MutationSideEffects;
use crate::domain::value_objects::diaries::{DayAvailableModel, DiaryGraph, OfferDayModel};

#[async_trait]
#[automock]
pub trait DiaryRepository {
    async fn create(
        &self,
        diary: InsertDiaryEntity,
        days_available: Vec<DayAvailableModel>,
        offer_days: Vec<OfferDayModel>,
        side_effects: MutationSideEffects,
    ) -> Result<Uuid>;

    /// Children are replaced wholesale on update.
    async fn update(
        &self,
        diary_id: Uuid,
        facility_id: Uuid,
        changes: DiaryChangeset,
        days_available: Vec<DayAvailableModel>,
        offer_days: Vec<OfferDayModel>,
        side_effects: MutationSideEffects,
    ) -> Result<Uuid>;

    async fn delete_many(
        &self,
        diary_ids: Vec<Uuid>,
        facility_id: Uuid,
        side_effects: MutationSideEffects,
    ) -> Result<u64>;

    async fn list(&self, facility_id: Uuid) -> Result<Vec<DiaryEntity>>;
    async fn find_graph(&self, diary_id: Uuid, facility_id: Uuid) -> Result<Option<DiaryGraph>>;
}
