use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::{daily_exercises, exercises, routines};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = routines)]
pub struct RoutineEntity {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub name: String,
    pub description: String,
    pub is_preset: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = routines)]
pub struct InsertRoutineEntity {
    pub facility_id: Uuid,
    pub name: String,
    pub description: String,
    pub is_preset: bool,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = routines)]
pub struct RoutineChangeset {
    pub name: String,
    pub description: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = daily_exercises)]
pub struct DailyExerciseEntity {
    pub id: Uuid,
    pub routine_id: Uuid,
    pub day_of_week: String,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = daily_exercises)]
pub struct InsertDailyExerciseEntity {
    pub routine_id: Uuid,
    pub day_of_week: String,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = exercises)]
pub struct ExerciseEntity {
    pub id: Uuid,
    pub daily_exercise_id: Uuid,
    pub name: String,
    pub body_zone: String,
    pub series: i32,
    pub count: i32,
    pub measure: Option<String>,
    pub rest: Option<i32>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = exercises)]
pub struct InsertExerciseEntity {
    pub daily_exercise_id: Uuid,
    pub name: String,
    pub body_zone: String,
    pub series: i32,
    pub count: i32,
    pub measure: Option<String>,
    pub rest: Option<i32>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
}
