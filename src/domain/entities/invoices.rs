use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::invoices;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = invoices)]
pub struct InvoiceEntity {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub payment_id: Option<Uuid>,
    pub user_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub amount_minor: i32,
    pub status: String,
    pub issue_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub period: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = invoices)]
pub struct InsertInvoiceEntity {
    pub facility_id: Uuid,
    pub payment_id: Option<Uuid>,
    pub user_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub amount_minor: i32,
    pub status: String,
    pub issue_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub period: Option<String>,
    pub notes: Option<String>,
}
