use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{PgConnection, QueryResult, RunQueryDsl, delete, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::domain::entities::plans::{
    DiaryPlanEntity, InsertDiaryPlanEntity, InsertPlanEntity, PlanChangeset, PlanEntity,
};
use crate::domain::repositories::plans::PlanRepository;
use crate::domain::value_objects::audit::MutationSideEffects;
use crate::domain::value_objects::enums::assignment_categories::AssignmentCategory;
use crate::domain::value_objects::plans::{DiaryPlanModel, PlanGraph};
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::schema::{diary_plans, plans, user_assignments};
use crate::infrastructure::postgres::side_effects;

pub struct PlanPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PlanPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

/// Inserts a plan and its diary-plan slots on an open connection. Shared
/// with the replication engine, which re-parents copied graphs through the
/// same path.
pub(crate) fn insert_plan_graph(
    conn: &mut PgConnection,
    plan: &InsertPlanEntity,
    slots: Vec<DiaryPlanModel>,
) -> QueryResult<Uuid> {
    let plan_id = insert_into(plans::table)
        .values(plan)
        .returning(plans::id)
        .get_result::<Uuid>(conn)?;

    let rows: Vec<InsertDiaryPlanEntity> = slots
        .into_iter()
        .map(|slot| slot.into_insert(plan_id))
        .collect();
    if !rows.is_empty() {
        insert_into(diary_plans::table).values(&rows).execute(conn)?;
    }

    Ok(plan_id)
}

pub(crate) fn load_plan_graph(
    conn: &mut PgConnection,
    plan_id: Uuid,
    facility_id: Uuid,
) -> QueryResult<Option<PlanGraph>> {
    let plan = plans::table
        .filter(plans::id.eq(plan_id))
        .filter(plans::facility_id.eq(facility_id))
        .select(PlanEntity::as_select())
        .first::<PlanEntity>(conn)
        .optional()?;

    let Some(plan) = plan else {
        return Ok(None);
    };

    let slots = diary_plans::table
        .filter(diary_plans::plan_id.eq(plan_id))
        .select(DiaryPlanEntity::as_select())
        .load::<DiaryPlanEntity>(conn)?;

    Ok(Some(PlanGraph {
        plan,
        diary_plans: slots,
    }))
}

#[async_trait]
impl PlanRepository for PlanPostgres {
    async fn create(
        &self,
        plan: InsertPlanEntity,
        diary_plan_models: Vec<DiaryPlanModel>,
        side_effects: MutationSideEffects,
    ) -> Result<Uuid> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Uuid> {
            let mut conn = pool.get()?;
            let plan_id = conn.transaction::<Uuid, diesel::result::Error, _>(|tx| {
                let plan_id = insert_plan_graph(tx, &plan, diary_plan_models)?;
                side_effects::apply(tx, &side_effects)?;
                Ok(plan_id)
            })?;
            Ok(plan_id)
        })
        .await?
    }

    async fn update(
        &self,
        plan_id: Uuid,
        facility_id: Uuid,
        changes: PlanChangeset,
        diary_plan_models: Vec<DiaryPlanModel>,
        side_effects: MutationSideEffects,
    ) -> Result<Uuid> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Uuid> {
            let mut conn = pool.get()?;
            conn.transaction::<_, diesel::result::Error, _>(|tx| {
                update(plans::table)
                    .filter(plans::id.eq(plan_id))
                    .filter(plans::facility_id.eq(facility_id))
                    .set(&changes)
                    .execute(tx)?;

                // Slots are diffed by name so surviving ones keep their ids
                // for dependent assignments.
                let existing = diary_plans::table
                    .filter(diary_plans::plan_id.eq(plan_id))
                    .select(DiaryPlanEntity::as_select())
                    .load::<DiaryPlanEntity>(tx)?;

                let incoming_names: Vec<&str> = diary_plan_models
                    .iter()
                    .map(|slot| slot.name.as_str())
                    .collect();
                let stale_ids: Vec<Uuid> = existing
                    .iter()
                    .filter(|slot| !incoming_names.contains(&slot.name.as_str()))
                    .map(|slot| slot.id)
                    .collect();
                if !stale_ids.is_empty() {
                    delete(diary_plans::table.filter(diary_plans::id.eq_any(&stale_ids)))
                        .execute(tx)?;
                }

                for slot in diary_plan_models {
                    match existing.iter().find(|current| current.name == slot.name) {
                        Some(current) => {
                            update(diary_plans::table.find(current.id))
                                .set((
                                    diary_plans::activity_id.eq(slot.activity_id),
                                    diary_plans::days_of_week.eq(&slot.days_of_week),
                                    diary_plans::sessions_per_week.eq(slot.sessions_per_week),
                                    diary_plans::vacancies.eq(slot.vacancies),
                                ))
                                .execute(tx)?;
                        }
                        None => {
                            insert_into(diary_plans::table)
                                .values(&slot.into_insert(plan_id))
                                .execute(tx)?;
                        }
                    }
                }

                side_effects::apply(tx, &side_effects)?;
                Ok(())
            })?;
            Ok(plan_id)
        })
        .await?
    }

    async fn delete_many(
        &self,
        plan_ids: Vec<Uuid>,
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

                    let owned: Vec<Uuid> = plans::table
                        .filter(plans::id.eq_any(&plan_ids))
                        .filter(plans::facility_id.eq(facility_id))
                        .select(plans::id)
                        .load::<Uuid>(tx)?;

                    delete(diary_plans::table.filter(diary_plans::plan_id.eq_any(&owned)))
                        .execute(tx)?;
                    delete(
                        user_assignments::table
                            .filter(user_assignments::entity_id.eq_any(&owned))
                            .filter(
                                user_assignments::category
                                    .eq(AssignmentCategory::Plan.to_string()),
                            ),
                    )
                    .execute(tx)?;
                    let deleted =
                        delete(plans::table.filter(plans::id.eq_any(&owned))).execute(tx)?;

                    side_effects::apply(tx, &side_effects)?;
                    Ok(deleted as u64)
                })?;
            Ok(deleted)
        })
        .await?
    }

    async fn list(&self, facility_id: Uuid) -> Result<Vec<PlanEntity>> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Vec<PlanEntity>> {
            let mut conn = pool.get()?;
            let results = plans::table
                .filter(plans::facility_id.eq(facility_id))
                .filter(plans::is_active.eq(true))
                .order(plans::created_at.desc())
                .select(PlanEntity::as_select())
                .load::<PlanEntity>(&mut conn)?;
            Ok(results)
        })
        .await?
    }

    async fn find_graph(&self, plan_id: Uuid, facility_id: Uuid) -> Result<Option<PlanGraph>> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Option<PlanGraph>> {
            let mut conn = pool.get()?;
            Ok(load_plan_graph(&mut conn, plan_id, facility_id)?)
        })
        .await?
    }
}
