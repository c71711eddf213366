use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::invoices::InvoiceEntity;
use crate::domain::entities::payments::PaymentEntity;
use crate::domain::value_objects::enums::{
    invoice_statuses::InvoiceStatus, payment_statuses::PaymentStatus,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertPaymentModel {
    pub user_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub amount_minor: i32,
    pub payment_date: DateTime<Utc>,
    pub notes: Option<String>,
    /// When set, a linked invoice is created in the same transaction.
    #[serde(default)]
    pub generate_invoice: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub period: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePaymentStatusModel {
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInvoiceStatusModel {
    pub status: InvoiceStatus,
}

#[derive(Debug, Serialize)]
pub struct PaymentDto {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub amount_minor: i32,
    pub status: String,
    pub payment_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentEntity> for PaymentDto {
    fn from(value: PaymentEntity) -> Self {
        Self {
            id: value.id,
            facility_id: value.facility_id,
            user_id: value.user_id,
            plan_id: value.plan_id,
            amount_minor: value.amount_minor,
            status: value.status,
            payment_date: value.payment_date,
            notes: value.notes,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InvoiceDto {
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
}

impl From<InvoiceEntity> for InvoiceDto {
    fn from(value: InvoiceEntity) -> Self {
        Self {
            id: value.id,
            facility_id: value.facility_id,
            payment_id: value.payment_id,
            user_id: value.user_id,
            plan_id: value.plan_id,
            amount_minor: value.amount_minor,
            status: value.status,
            issue_date: value.issue_date,
            due_date: value.due_date,
            period: value.period,
            notes: value.notes,
        }
    }
}
