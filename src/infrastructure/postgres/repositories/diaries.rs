use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{PgConnection, QueryResult, RunQueryDsl, delete, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::domain::entities::diaries::{
    DayAvailableEntity, DiaryChangeset, DiaryEntity, InsertDayAvailableEntity, InsertDiaryEntity,
    InsertOfferDayEntity, OfferDayEntity,
};
use crate::domain::repositories::diaries::DiaryRepository;
use crate::domain::value_objects::audit::MutationSideEffects;
use crate::domain::value_objects::diaries::{DayAvailableModel, DiaryGraph, OfferDayModel};
use crate::domain::value_objects::enums::assignment_categories::AssignmentCategory;
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::schema::{
    day_availables, diaries, offer_days, user_assignments,
};
use crate::infrastructure::postgres::side_effects;

pub struct DiaryPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl DiaryPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

pub(crate) fn insert_diary_graph(
    conn: &mut PgConnection,
    diary: &InsertDiaryEntity,
    days: Vec<DayAvailableModel>,
    offers: Vec<OfferDayModel>,
) -> QueryResult<Uuid> {
    let diary_id = insert_into(diaries::table)
        .values(diary)
        .returning(diaries::id)
        .get_result::<Uuid>(conn)?;

    let day_rows: Vec<InsertDayAvailableEntity> = days
        .into_iter()
        .map(|day| day.into_insert(diary_id))
        .collect();
    if !day_rows.is_empty() {
        insert_into(day_availables::table)
            .values(&day_rows)
            .execute(conn)?;
    }

    let offer_rows: Vec<InsertOfferDayEntity> = offers
        .into_iter()
        .map(|offer| offer.into_insert(diary_id))
        .collect();
    if !offer_rows.is_empty() {
        insert_into(offer_days::table)
            .values(&offer_rows)
            .execute(conn)?;
    }

    Ok(diary_id)
}

pub(crate) fn load_diary_graph(
    conn: &mut PgConnection,
    diary_id: Uuid,
    facility_id: Uuid,
) -> QueryResult<Option<DiaryGraph>> {
    let diary = diaries::table
        .filter(diaries::id.eq(diary_id))
        .filter(diaries::facility_id.eq(facility_id))
        .select(DiaryEntity::as_select())
        .first::<DiaryEntity>(conn)
        .optional()?;

    let Some(diary) = diary else {
        return Ok(None);
    };

    let days_available = day_availables::table
        .filter(day_availables::diary_id.eq(diary_id))
        .select(DayAvailableEntity::as_select())
        .load::<DayAvailableEntity>(conn)?;
    let offers = offer_days::table
        .filter(offer_days::diary_id.eq(diary_id))
        .select(OfferDayEntity::as_select())
        .load::<OfferDayEntity>(conn)?;

    Ok(Some(DiaryGraph {
        diary,
        days_available,
        offer_days: offers,
    }))
}

#[async_trait]
impl DiaryRepository for DiaryPostgres {
    async fn create(
        &self,
        diary: InsertDiaryEntity,
        days_available: Vec<DayAvailableModel>,
        offers: Vec<OfferDayModel>,
        side_effects: MutationSideEffects,
    ) -> Result<Uuid> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Uuid> {
            let mut conn = pool.get()?;
            let diary_id = conn.transaction::<Uuid, diesel::result::Error, _>(|tx| {
                let diary_id = insert_diary_graph(tx, &diary, days_available, offers)?;
                side_effects::apply(tx, &side_effects)?;
                Ok(diary_id)
            })?;
            Ok(diary_id)
        })
        .await?
    }

    async fn update(
        &self,
        diary_id: Uuid,
        facility_id: Uuid,
        changes: DiaryChangeset,
        days_available: Vec<DayAvailableModel>,
        offers: Vec<OfferDayModel>,
        side_effects: MutationSideEffects,
    ) -> Result<Uuid> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Uuid> {
            let mut conn = pool.get()?;
            conn.transaction::<_, diesel::result::Error, _>(|tx| {
                update(diaries::table)
                    .filter(diaries::id.eq(diary_id))
                    .filter(diaries::facility_id.eq(facility_id))
                    .set(&changes)
                    .execute(tx)?;

                // Time windows and offers are replaced wholesale.
                delete(day_availables::table.filter(day_availables::diary_id.eq(diary_id)))
                    .execute(tx)?;
                delete(offer_days::table.filter(offer_days::diary_id.eq(diary_id)))
                    .execute(tx)?;

                let day_rows: Vec<InsertDayAvailableEntity> = days_available
                    .into_iter()
                    .map(|day| day.into_insert(diary_id))
                    .collect();
                if !day_rows.is_empty() {
                    insert_into(day_availables::table)
                        .values(&day_rows)
                        .execute(tx)?;
                }
                let offer_rows: Vec<InsertOfferDayEntity> = offers
                    .into_iter()
                    .map(|offer| offer.into_insert(diary_id))
                    .collect();
                if !offer_rows.is_empty() {
                    insert_into(offer_days::table)
                        .values(&offer_rows)
                        .execute(tx)?;
                }

                side_effects::apply(tx, &side_effects)?;
                Ok(())
            })?;
            Ok(diary_id)
        })
        .await?
    }

    async fn delete_many(
        &self,
        diary_ids: Vec<Uuid>,
        facility_id: Uuid,
        side_effects: MutationSideEffects,
    ) -> Result<u64> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<u64> {
            let mut conn = pool.get()?;
            let deleted = conn
                .build_transaction()
                .serializable()
                .run::<_, diesel::result::Error, _>(|tx| {
                    diesel::sql_query("SET LOCAL statement_timeout = '30s'").execute(tx)?;

                    let owned: Vec<Uuid> = diaries::table
                        .filter(diaries::id.eq_any(&diary_ids))
                        .filter(diaries::facility_id.eq(facility_id))
                        .select(diaries::id)
                        .load::<Uuid>(tx)?;

                    delete(day_availables::table.filter(day_availables::diary_id.eq_any(&owned)))
                        .execute(tx)?;
                    delete(offer_days::table.filter(offer_days::diary_id.eq_any(&owned)))
                        .execute(tx)?;
                    delete(
                        user_assignments::table
                            .filter(user_assignments::entity_id.eq_any(&owned))
                            .filter(
                                user_assignments::category
                                    .eq(AssignmentCategory::Diary.to_string()),
                            ),
                    )
                    .execute(tx)?;
                    let deleted =
                        delete(diaries::table.filter(diaries::id.eq_any(&owned))).execute(tx)?;

                    side_effects::apply(tx, &side_effects)?;
                    Ok(deleted as u64)
                })?;
            Ok(deleted)
        })
        .await?
    }

    async fn list(&self, facility_id: Uuid) -> Result<Vec<DiaryEntity>> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Vec<DiaryEntity>> {
            let mut conn = pool.get()?;
            let results = diaries::table
                .filter(diaries::facility_id.eq(facility_id))
                .filter(diaries::is_active.eq(true))
                .order(diaries::created_at.desc())
                .select(DiaryEntity::as_select())
                .load::<DiaryEntity>(&mut conn)?;
            Ok(results)
        })
        .await?
    }

    async fn find_graph(&self, diary_id: Uuid, facility_id: Uuid) -> Result<Option<DiaryGraph>> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Option<DiaryGraph>> {
            let mut conn = pool.get()?;
            Ok(load_diary_graph(&mut conn, diary_id, facility_id)?)
        })
        .await?
    }
}
