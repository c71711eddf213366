use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::{daily_meals, food_items, meals, nutritional_plans};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = nutritional_plans)]
pub struct NutritionalPlanEntity {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub name: String,
    pub description: String,
    pub is_preset: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = nutritional_plans)]
pub struct InsertNutritionalPlanEntity {
    pub facility_id: Uuid,
    pub name: String,
    pub description: String,
    pub is_preset: bool,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = nutritional_plans)]
pub struct NutritionalPlanChangeset {
    pub name: String,
    pub description: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = daily_meals)]
pub struct DailyMealEntity {
    pub id: Uuid,
    pub nutritional_plan_id: Uuid,
    pub day_of_week: String,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = daily_meals)]
pub struct InsertDailyMealEntity {
    pub nutritional_plan_id: Uuid,
    pub day_of_week: String,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = meals)]
pub struct MealEntity {
    pub id: Uuid,
    pub daily_meal_id: Uuid,
    pub meal_type: String,
    pub time: Option<String>,
    pub observations: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = meals)]
pub struct InsertMealEntity {
    pub daily_meal_id: Uuid,
    pub meal_type: String,
    pub time: Option<String>,
    pub observations: Option<String>,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = food_items)]
pub struct FoodItemEntity {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub name: String,
    pub portion: Option<f64>,
    pub unit: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = food_items)]
pub struct InsertFoodItemEntity {
    pub meal_id: Uuid,
    pub name: String,
    pub portion: Option<f64>,
    pub unit: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}
