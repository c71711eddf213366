use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::payments;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payments)]
pub struct PaymentEntity {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub amount_minor: i32,
    pub status: String,
    pub payment_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = payments)]
pub struct InsertPaymentEntity {
    pub facility_id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub amount_minor: i32,
    pub status: String,
    pub payment_date: DateTime<Utc>,
    pub notes: Option<String>,
}
