use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{PgConnection, QueryResult, RunQueryDsl, delete, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::domain::entities::nutritional_plans::{
    DailyMealEntity, FoodItemEntity, InsertDailyMealEntity, InsertFoodItemEntity,
    InsertNutritionalPlanEntity, MealEntity, NutritionalPlanChangeset, NutritionalPlanEntity,
};
use crate::domain::repositories::nutritional_plans::NutritionalPlanRepository;
use crate::domain::value_objects::audit::MutationSideEffects;
use crate::domain::value_objects::enums::assignment_categories::AssignmentCategory;
use crate::domain::value_objects::enums::day_of_week::DayOfWeek;
use crate::domain::value_objects::nutritional_plans::{MealModel, NutritionalPlanGraph};
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::schema::{
    daily_meals, food_items, meals, nutritional_plans, user_assignments,
};
use crate::infrastructure::postgres::side_effects;

pub struct NutritionalPlanPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl NutritionalPlanPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

/// Inserts a nutritional plan with its three child levels; only populated
/// days produce daily rows. Shared with the replication engine.
pub(crate) fn insert_nutritional_plan_graph(
    conn: &mut PgConnection,
    plan: &InsertNutritionalPlanEntity,
    days: BTreeMap<DayOfWeek, Vec<MealModel>>,
) -> QueryResult<Uuid> {
    let plan_id = insert_into(nutritional_plans::table)
        .values(plan)
        .returning(nutritional_plans::id)
        .get_result::<Uuid>(conn)?;

    insert_nutritional_plan_days(conn, plan_id, days)?;
    Ok(plan_id)
}

fn insert_nutritional_plan_days(
    conn: &mut PgConnection,
    plan_id: Uuid,
    days: BTreeMap<DayOfWeek, Vec<MealModel>>,
) -> QueryResult<()> {
    for (day_of_week, day_meals) in days {
        if day_meals.is_empty() {
            continue;
        }
        let daily_id = insert_into(daily_meals::table)
            .values(&InsertDailyMealEntity {
                nutritional_plan_id: plan_id,
                day_of_week: day_of_week.to_string(),
            })
            .returning(daily_meals::id)
            .get_result::<Uuid>(conn)?;

        for meal_model in day_meals {
            let (meal, items) = meal_model.into_insert(daily_id);
            let meal_id = insert_into(meals::table)
                .values(&meal)
                .returning(meals::id)
                .get_result::<Uuid>(conn)?;

            let rows: Vec<InsertFoodItemEntity> = items
                .into_iter()
                .map(|item| item.into_insert(meal_id))
                .collect();
            if !rows.is_empty() {
                insert_into(food_items::table).values(&rows).execute(conn)?;
            }
        }
    }
    Ok(())
}

fn delete_nutritional_plan_children(
    conn: &mut PgConnection,
    plan_ids: &[Uuid],
) -> QueryResult<()> {
    let daily_ids: Vec<Uuid> = daily_meals::table
        .filter(daily_meals::nutritional_plan_id.eq_any(plan_ids))
        .select(daily_meals::id)
        .load::<Uuid>(conn)?;
    let meal_ids: Vec<Uuid> = meals::table
        .filter(meals::daily_meal_id.eq_any(&daily_ids))
        .select(meals::id)
        .load::<Uuid>(conn)?;
    delete(food_items::table.filter(food_items::meal_id.eq_any(&meal_ids))).execute(conn)?;
    delete(meals::table.filter(meals::id.eq_any(&meal_ids))).execute(conn)?;
    delete(daily_meals::table.filter(daily_meals::id.eq_any(&daily_ids))).execute(conn)?;
    Ok(())
}

pub(crate) fn load_nutritional_plan_graph(
    conn: &mut PgConnection,
    plan_id: Uuid,
    facility_id: Uuid,
) -> QueryResult<Option<NutritionalPlanGraph>> {
    let plan = nutritional_plans::table
        .filter(nutritional_plans::id.eq(plan_id))
        .filter(nutritional_plans::facility_id.eq(facility_id))
        .select(NutritionalPlanEntity::as_select())
        .first::<NutritionalPlanEntity>(conn)
        .optional()?;

    let Some(plan) = plan else {
        return Ok(None);
    };

    let dailies = daily_meals::table
        .filter(daily_meals::nutritional_plan_id.eq(plan_id))
        .select(DailyMealEntity::as_select())
        .load::<DailyMealEntity>(conn)?;

    let mut days = Vec::with_capacity(dailies.len());
    for daily in dailies {
        let day_meals = meals::table
            .filter(meals::daily_meal_id.eq(daily.id))
            .select(MealEntity::as_select())
            .load::<MealEntity>(conn)?;

        let mut with_items = Vec::with_capacity(day_meals.len());
        for meal in day_meals {
            let items = food_items::table
                .filter(food_items::meal_id.eq(meal.id))
                .select(FoodItemEntity::as_select())
                .load::<FoodItemEntity>(conn)?;
            with_items.push((meal, items));
        }
        days.push((daily, with_items));
    }

    Ok(Some(NutritionalPlanGraph { plan, days }))
}

#[async_trait]
impl NutritionalPlanRepository for NutritionalPlanPostgres {
    async fn create(
        &self,
        plan: InsertNutritionalPlanEntity,
        days: BTreeMap<DayOfWeek, Vec<MealModel>>,
        side_effects: MutationSideEffects,
    ) -> Result<Uuid> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Uuid> {
            let mut conn = pool.get()?;
            let plan_id = conn.transaction::<Uuid, diesel::result::Error, _>(|tx| {
                let plan_id = insert_nutritional_plan_graph(tx, &plan, days)?;
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
        changes: NutritionalPlanChangeset,
        days: BTreeMap<DayOfWeek, Vec<MealModel>>,
        side_effects: MutationSideEffects,
    ) -> Result<Uuid> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Uuid> {
            let mut conn = pool.get()?;
            conn.transaction::<_, diesel::result::Error, _>(|tx| {
                update(nutritional_plans::table)
                    .filter(nutritional_plans::id.eq(plan_id))
                    .filter(nutritional_plans::facility_id.eq(facility_id))
                    .set(&changes)
                    .execute(tx)?;

                // Meal structure is replaced wholesale.
                delete_nutritional_plan_children(tx, &[plan_id])?;
                insert_nutritional_plan_days(tx, plan_id, days)?;

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

                    let owned: Vec<Uuid> = nutritional_plans::table
                        .filter(nutritional_plans::id.eq_any(&plan_ids))
                        .filter(nutritional_plans::facility_id.eq(facility_id))
                        .select(nutritional_plans::id)
                        .load::<Uuid>(tx)?;

                    delete_nutritional_plan_children(tx, &owned)?;
                    delete(
                        user_assignments::table
                            .filter(user_assignments::entity_id.eq_any(&owned))
                            .filter(
                                user_assignments::category
                                    .eq(AssignmentCategory::NutritionalPlan.to_string()),
                            ),
                    )
                    .execute(tx)?;
                    let deleted = delete(
                        nutritional_plans::table.filter(nutritional_plans::id.eq_any(&owned)),
                    )
                    .execute(tx)?;

                    side_effects::apply(tx, &side_effects)?;
                    Ok(deleted as u64)
                })?;
            Ok(deleted)
        })
        .await?
    }

    async fn list(
        &self,
        facility_id: Uuid,
        is_preset: bool,
    ) -> Result<Vec<NutritionalPlanEntity>> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Vec<NutritionalPlanEntity>> {
            let mut conn = pool.get()?;
            let results = nutritional_plans::table
                .filter(nutritional_plans::facility_id.eq(facility_id))
                .filter(nutritional_plans::is_preset.eq(is_preset))
                .order(nutritional_plans::created_at.desc())
                .select(NutritionalPlanEntity::as_select())
                .load::<NutritionalPlanEntity>(&mut conn)?;
            Ok(results)
        })
        .await?
    }

    async fn find_graph(
        &self,
        plan_id: Uuid,
        facility_id: Uuid,
    ) -> Result<Option<NutritionalPlanGraph>> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Option<NutritionalPlanGraph>> {
            let mut conn = pool.get()?;
            Ok(load_nutritional_plan_graph(&mut conn, plan_id, facility_id)?)
        })
        .await?
    }
}
