use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::user_assignments;

/// One user's membership in an assignable entity. Lifecycle is one-way:
/// active rows go inactive with an end date, they are never reactivated.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = user_assignments)]
pub struct UserAssignmentEntity {
    pub id: Uuid,
    pub category: String,
    pub entity_id: Uuid,
    pub user_id: Uuid,
    pub facility_id: Uuid,
    pub is_active: bool,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub replaced_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = user_assignments)]
pub struct InsertUserAssignmentEntity {
    pub category: String,
    pub entity_id: Uuid,
    pub user_id: Uuid,
    pub facility_id: Uuid,
    pub is_active: bool,
    pub start_date: DateTime<Utc>,
}
