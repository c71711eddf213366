use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::{client_notifications, notifications};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = notifications)]
pub struct NotificationEntity {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub actor_id: Uuid,
    pub type_: String,
    pub entity_id: Option<Uuid>,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = notifications)]
pub struct InsertNotificationEntity {
    pub facility_id: Uuid,
    pub actor_id: Uuid,
    pub type_: String,
    pub entity_id: Option<Uuid>,
    pub message: String,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = client_notifications)]
pub struct ClientNotificationEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub facility_id: Uuid,
    pub type_: String,
    pub entity_id: Option<Uuid>,
    pub replaced_by_id: Option<Uuid>,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = client_notifications)]
pub struct InsertClientNotificationEntity {
    pub user_id: Uuid,
    pub facility_id: Uuid,
    pub type_: String,
    pub entity_id: Option<Uuid>,
    pub replaced_by_id: Option<Uuid>,
    pub message: String,
}
