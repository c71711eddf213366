use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*, update};
use uuid::Uuid;

use crate::domain::entities::notifications::{ClientNotificationEntity, NotificationEntity};
use crate::domain::repositories::notifications::NotificationRepository;
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::schema::{client_notifications, notifications};

pub struct NotificationPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl NotificationPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl NotificationRepository for NotificationPostgres {
    async fn list_for_facility(
        &self,
        facility_id: Uuid,
        limit: i64,
    ) -> Result<Vec<NotificationEntity>> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Vec<NotificationEntity>> {
            let mut conn = pool.get()?;
            let results = notifications::table
                .filter(notifications::facility_id.eq(facility_id))
                .order(notifications::created_at.desc())
                .limit(limit)
                .select(NotificationEntity::as_select())
                .load::<NotificationEntity>(&mut conn)?;
            Ok(results)
        })
        .await?
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ClientNotificationEntity>> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Vec<ClientNotificationEntity>> {
            let mut conn = pool.get()?;
            let results = client_notifications::table
                .filter(client_notifications::user_id.eq(user_id))
                .order(client_notifications::created_at.desc())
                .limit(limit)
                .select(ClientNotificationEntity::as_select())
                .load::<ClientNotificationEntity>(&mut conn)?;
            Ok(results)
        })
        .await?
    }

    async fn mark_read(&self, notification_id: Uuid, facility_id: Uuid) -> Result<bool> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<bool> {
            let mut conn = pool.get()?;
            let updated = update(notifications::table)
                .filter(notifications::id.eq(notification_id))
                .filter(notifications::facility_id.eq(facility_id))
                .set(notifications::read.eq(true))
                .execute(&mut conn)?;
            Ok(updated > 0)
        })
        .await?
    }

    async fn mark_client_read(&self, notification_id: Uuid, user_id: Uuid) -> Result<bool> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<bool> {
            let mut conn = pool.get()?;
            let updated = update(client_notifications::table)
                .filter(client_notifications::id.eq(notification_id))
                .filter(client_notifications::user_id.eq(user_id))
                .set(client_notifications::read.eq(true))
                .execute(&mut conn)?;
            Ok(updated > 0)
        })
        .await?
    }
}
