use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::{day_availables, diaries, offer_days};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = diaries)]
pub struct DiaryEntity {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub activity_id: Uuid,
    pub name: String,
    pub type_of_schedule: String,
    pub date_from: DateTime<Utc>,
    pub date_until: DateTime<Utc>,
    pub repeat_for: Option<i32>,
    pub term_duration: i32,
    pub amount_of_people: i32,
    pub is_active: bool,
    pub genre_exclusive: String,
    pub works_holidays: bool,
    pub observations: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = diaries)]
pub struct InsertDiaryEntity {
    pub facility_id: Uuid,
    pub activity_id: Uuid,
    pub name: String,
    pub type_of_schedule: String,
    pub date_from: DateTime<Utc>,
    pub date_until: DateTime<Utc>,
    pub repeat_for: Option<i32>,
    pub term_duration: i32,
    pub amount_of_people: i32,
    pub is_active: bool,
    pub genre_exclusive: String,
    pub works_holidays: bool,
    pub observations: Option<String>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = diaries)]
pub struct DiaryChangeset {
    pub activity_id: Uuid,
    pub name: String,
    pub type_of_schedule: String,
    pub date_from: DateTime<Utc>,
    pub date_until: DateTime<Utc>,
    pub repeat_for: Option<i32>,
    pub term_duration: i32,
    pub amount_of_people: i32,
    pub is_active: bool,
    pub genre_exclusive: String,
    pub works_holidays: bool,
    pub observations: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = day_availables)]
pub struct DayAvailableEntity {
    pub id: Uuid,
    pub diary_id: Uuid,
    pub day_of_week: String,
    pub time_start: String,
    pub time_end: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = day_availables)]
pub struct InsertDayAvailableEntity {
    pub diary_id: Uuid,
    pub day_of_week: String,
    pub time_start: String,
    pub time_end: String,
    pub available: bool,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = offer_days)]
pub struct OfferDayEntity {
    pub id: Uuid,
    pub diary_id: Uuid,
    pub day_of_week: String,
    pub is_offer: bool,
    pub discount_percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = offer_days)]
pub struct InsertOfferDayEntity {
    pub diary_id: Uuid,
    pub day_of_week: String,
    pub is_offer: bool,
    pub discount_percentage: Option<f64>,
}
