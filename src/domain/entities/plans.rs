use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::{diary_plans, plans};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = plans)]
pub struct PlanEntity {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub name: String,
    pub description: String,
    pub price_minor: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
    pub generate_invoice: bool,
    pub payment_type: String,
    pub plan_type: String,
    pub free_test: bool,
    pub is_current: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = plans)]
pub struct InsertPlanEntity {
    pub facility_id: Uuid,
    pub name: String,
    pub description: String,
    pub price_minor: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
    pub generate_invoice: bool,
    pub payment_type: String,
    pub plan_type: String,
    pub free_test: bool,
    pub is_current: bool,
    pub is_active: bool,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = plans)]
pub struct PlanChangeset {
    pub name: String,
    pub description: String,
    pub price_minor: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
    pub generate_invoice: bool,
    pub payment_type: String,
    pub plan_type: String,
    pub free_test: bool,
    pub is_current: bool,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = diary_plans)]
pub struct DiaryPlanEntity {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub activity_id: Uuid,
    pub name: String,
    pub days_of_week: Vec<bool>,
    pub sessions_per_week: i32,
    pub vacancies: i32,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = diary_plans)]
pub struct InsertDiaryPlanEntity {
    pub plan_id: Uuid,
    pub activity_id: Uuid,
    pub name: String,
    pub days_of_week: Vec<bool>,
    pub sessions_per_week: i32,
    pub vacancies: i32,
}
