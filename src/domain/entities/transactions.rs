use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::transactions;

/// Append-only audit row; never updated or deleted after insert.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = transactions)]
pub struct TransactionEntity {
    pub id: Uuid,
    pub type_: String,
    pub actor_id: Uuid,
    pub facility_id: Uuid,
    pub entity_id: Option<Uuid>,
    pub target_facility_id: Option<Uuid>,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = transactions)]
pub struct InsertTransactionEntity {
    pub type_: String,
    pub actor_id: Uuid,
    pub facility_id: Uuid,
    pub entity_id: Option<Uuid>,
    pub target_facility_id: Option<Uuid>,
    pub details: serde_json::Value,
}
