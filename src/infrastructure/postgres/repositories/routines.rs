use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{PgConnection, QueryResult, RunQueryDsl, delete, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::domain::entities::routines::{
    DailyExerciseEntity, ExerciseEntity, InsertDailyExerciseEntity, InsertExerciseEntity,
    InsertRoutineEntity, RoutineChangeset, RoutineEntity,
};
use crate::domain::repositories::routines::RoutineRepository;
use crate::domain::value_objects::audit::MutationSideEffects;
use crate::domain::value_objects::enums::assignment_categories::AssignmentCategory;
use crate::domain::value_objects::enums::day_of_week::DayOfWeek;
use crate::domain::value_objects::routines::{ExerciseModel, RoutineGraph};
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::schema::{
    daily_exercises, exercises, routines, user_assignments,
};
use crate::infrastructure::postgres::side_effects;

pub struct RoutinePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl RoutinePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

/// Inserts a routine and its per-day exercise rows; only populated days
/// produce daily rows. Shared with the replication engine.
pub(crate) fn insert_routine_graph(
    conn: &mut PgConnection,
    routine: &InsertRoutineEntity,
    days: BTreeMap<DayOfWeek, Vec<ExerciseModel>>,
) -> QueryResult<Uuid> {
    let routine_id = insert_into(routines::table)
        .values(routine)
        .returning(routines::id)
        .get_result::<Uuid>(conn)?;

    insert_routine_days(conn, routine_id, days)?;
    Ok(routine_id)
}

fn insert_routine_days(
    conn: &mut PgConnection,
    routine_id: Uuid,
    days: BTreeMap<DayOfWeek, Vec<ExerciseModel>>,
) -> QueryResult<()> {
    for (day_of_week, day_exercises) in days {
        if day_exercises.is_empty() {
            continue;
        }
        let daily_id = insert_into(daily_exercises::table)
            .values(&InsertDailyExerciseEntity {
                routine_id,
                day_of_week: day_of_week.to_string(),
            })
            .returning(daily_exercises::id)
            .get_result::<Uuid>(conn)?;

        let rows: Vec<InsertExerciseEntity> = day_exercises
            .into_iter()
            .map(|exercise| exercise.into_insert(daily_id))
            .collect();
        if !rows.is_empty() {
            insert_into(exercises::table).values(&rows).execute(conn)?;
        }
    }
    Ok(())
}

fn delete_routine_children(conn: &mut PgConnection, routine_ids: &[Uuid]) -> QueryResult<()> {
    let daily_ids: Vec<Uuid> = daily_exercises::table
        .filter(daily_exercises::routine_id.eq_any(routine_ids))
        .select(daily_exercises::id)
        .load::<Uuid>(conn)?;
    delete(exercises::table.filter(exercises::daily_exercise_id.eq_any(&daily_ids)))
        .execute(conn)?;
    delete(daily_exercises::table.filter(daily_exercises::id.eq_any(&daily_ids)))
        .execute(conn)?;
    Ok(())
}

pub(crate) fn load_routine_graph(
    conn: &mut PgConnection,
    routine_id: Uuid,
    facility_id: Uuid,
) -> QueryResult<Option<RoutineGraph>> {
    let routine = routines::table
        .filter(routines::id.eq(routine_id))
        .filter(routines::facility_id.eq(facility_id))
        .select(RoutineEntity::as_select())
        .first::<RoutineEntity>(conn)
        .optional()?;

    let Some(routine) = routine else {
        return Ok(None);
    };

    let dailies = daily_exercises::table
        .filter(daily_exercises::routine_id.eq(routine_id))
        .select(DailyExerciseEntity::as_select())
        .load::<DailyExerciseEntity>(conn)?;

    let mut days = Vec::with_capacity(dailies.len());
    for daily in dailies {
        let day_exercises = exercises::table
            .filter(exercises::daily_exercise_id.eq(daily.id))
            .select(ExerciseEntity::as_select())
            .load::<ExerciseEntity>(conn)?;
        days.push((daily, day_exercises));
    }

    Ok(Some(RoutineGraph { routine, days }))
}

#[async_trait]
impl RoutineRepository for RoutinePostgres {
    async fn create(
        &self,
        routine: InsertRoutineEntity,
        days: BTreeMap<DayOfWeek, Vec<ExerciseModel>>,
        side_effects: MutationSideEffects,
    ) -> Result<Uuid> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Uuid> {
            let mut conn = pool.get()?;
            let routine_id = conn.transaction::<Uuid, diesel::result::Error, _>(|tx| {
                let routine_id = insert_routine_graph(tx, &routine, days)?;
                side_effects::apply(tx, &side_effects)?;
                Ok(routine_id)
            })?;
            Ok(routine_id)
        })
        .await?
    }

    async fn update(
        &self,
        routine_id: Uuid,
        facility_id: Uuid,
        changes: RoutineChangeset,
        days: BTreeMap<DayOfWeek, Vec<ExerciseModel>>,
        side_effects: MutationSideEffects,
    ) -> Result<Uuid> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Uuid> {
            let mut conn = pool.get()?;
            conn.transaction::<_, diesel::result::Error, _>(|tx| {
                update(routines::table)
                    .filter(routines::id.eq(routine_id))
                    .filter(routines::facility_id.eq(facility_id))
                    .set(&changes)
                    .execute(tx)?;

                // Day rows are replaced wholesale.
                delete_routine_children(tx, &[routine_id])?;
                insert_routine_days(tx, routine_id, days)?;

                side_effects::apply(tx, &side_effects)?;
                Ok(())
            })?;
            Ok(routine_id)
        })
        .await?
    }

    async fn delete_many(
        &self,
        routine_ids: Vec<Uuid>,
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

                    let owned: Vec<Uuid> = routines::table
                        .filter(routines::id.eq_any(&routine_ids))
                        .filter(routines::facility_id.eq(facility_id))
                        .select(routines::id)
                        .load::<Uuid>(tx)?;

                    delete_routine_children(tx, &owned)?;
                    delete(
                        user_assignments::table
                            .filter(user_assignments::entity_id.eq_any(&owned))
                            .filter(
                                user_assignments::category
                                    .eq(AssignmentCategory::Routine.to_string()),
                            ),
                    )
                    .execute(tx)?;
                    let deleted =
                        delete(routines::table.filter(routines::id.eq_any(&owned))).execute(tx)?;

                    side_effects::apply(tx, &side_effects)?;
                    Ok(deleted as u64)
                })?;
            Ok(deleted)
        })
        .await?
    }

    async fn list(&self, facility_id: Uuid, is_preset: bool) -> Result<Vec<RoutineEntity>> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Vec<RoutineEntity>> {
            let mut conn = pool.get()?;
            let results = routines::table
                .filter(routines::facility_id.eq(facility_id))
                .filter(routines::is_preset.eq(is_preset))
                .order(routines::created_at.desc())
                .select(RoutineEntity::as_select())
                .load::<RoutineEntity>(&mut conn)?;
            Ok(results)
        })
        .await?
    }

    async fn find_graph(
        &self,
        routine_id: Uuid,
        facility_id: Uuid,
    ) -> Result<Option<RoutineGraph>> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Option<RoutineGraph>> {
            let mut conn = pool.get()?;
            Ok(load_routine_graph(&mut conn, routine_id, facility_id)?)
        })
        .await?
    }
}
