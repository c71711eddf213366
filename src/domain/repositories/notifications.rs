use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::notifications::{ClientNotificationEntity, NotificationEntity};

#[async_trait]
#[automock]
pub trait NotificationRepository {
    async fn list_for_facility(
        &self,
        facility_id: Uuid,
        limit: i64,
    ) -> Result<Vec<NotificationEntity>>;
    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ClientNotificationEntity>>;
    async fn mark_read(&self, notification_id: Uuid, facility_id: Uuid) -> Result<bool>;
    async fn mark_client_read(&self, notification_id: Uuid, user_id: Uuid) -> Result<bool>;
}
