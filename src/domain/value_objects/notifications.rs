use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::notifications::{ClientNotificationEntity, NotificationEntity};

#[derive(Debug, Serialize)]
pub struct NotificationDto {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub actor_id: Uuid,
    #[serde(rename = "type")]
    pub type_: String,
    pub entity_id: Option<Uuid>,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationEntity> for NotificationDto {
    fn from(value: NotificationEntity) -> Self {
        Self {
            id: value.id,
            facility_id: value.facility_id,
            actor_id: value.actor_id,
            type_: value.type_,
            entity_id: value.entity_id,
            message: value.message,
            read: value.read,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClientNotificationDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub facility_id: Uuid,
    #[serde(rename = "type")]
    pub type_: String,
    pub entity_id: Option<Uuid>,
    pub replaced_by_id: Option<Uuid>,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ClientNotificationEntity> for ClientNotificationDto {
    fn from(value: ClientNotificationEntity) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            facility_id: value.facility_id,
            type_: value.type_,
            entity_id: value.entity_id,
            replaced_by_id: value.replaced_by_id,
            message: value.message,
            read: value.read,
            created_at: value.created_at,
        }
    }
}
