use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use crate::application::usecases::errors::{UseCaseError, UseCaseResult};
use crate::domain::repositories::notifications::NotificationRepository;
use crate::domain::value_objects::notifications::{ClientNotificationDto, NotificationDto};

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

pub struct NotificationUseCase<R>
where
    R: NotificationRepository + Send + Sync + 'static,
{
    notification_repo: Arc<R>,
}

impl<R> NotificationUseCase<R>
where
    R: NotificationRepository + Send + Sync + 'static,
{
    pub fn new(notification_repo: Arc<R>) -> Self {
        Self { notification_repo }
    }

    pub async fn list_for_facility(
        &self,
        facility_id: Uuid,
        limit: Option<i64>,
    ) -> UseCaseResult<Vec<NotificationDto>> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let rows = self
            .notification_repo
            .list_for_facility(facility_id, limit)
            .await
            .map_err(|err| {
                error!(%facility_id, db_error = ?err, "notifications: failed to list for facility");
                UseCaseError::Internal(err)
            })?;
        Ok(rows.into_iter().map(NotificationDto::from).collect())
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> UseCaseResult<Vec<ClientNotificationDto>> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let rows = self
            .notification_repo
            .list_for_user(user_id, limit)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "notifications: failed to list for user");
                UseCaseError::Internal(err)
            })?;
        Ok(rows.into_iter().map(ClientNotificationDto::from).collect())
    }

    pub async fn mark_read(&self, notification_id: Uuid, facility_id: Uuid) -> UseCaseResult<()> {
        let updated = self
            .notification_repo
            .mark_read(notification_id, facility_id)
            .await
            .map_err(|err| {
                error!(%notification_id, db_error = ?err, "notifications: failed to mark read");
                UseCaseError::Internal(err)
            })?;
        if !updated {
            return Err(UseCaseError::NotFound("notification"));
        }
        info!(%facility_id, %notification_id, "notifications: marked read");
        Ok(())
    }

    pub async fn mark_client_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> UseCaseResult<()> {
        let updated = self
            .notification_repo
            .mark_client_read(notification_id, user_id)
            .await
            .map_err(|err| {
                error!(%notification_id, db_error = ?err, "notifications: failed to mark client read");
                UseCaseError::Internal(err)
            })?;
        if !updated {
            return Err(UseCaseError::NotFound("notification"));
        }
        info!(%user_id, %notification_id, "notifications: marked client notification read");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::notifications::MockNotificationRepository;

    #[tokio::test]
    async fn marking_a_foreign_notification_is_not_found() {
        let mut notification_repo = MockNotificationRepository::new();
        notification_repo
            .expect_mark_read()
            .returning(|_, _| Box::pin(async { Ok(false) }));

        let usecase = NotificationUseCase::new(Arc::new(notification_repo));
        let err = usecase
            .mark_read(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn client_list_clamps_the_limit() {
        let mut notification_repo = MockNotificationRepository::new();
        notification_repo
            .expect_list_for_user()
            .withf(|_, limit| *limit == MAX_LIMIT)
            .returning(|_, _| Box::pin(async { Ok(vec![]) }));

        let usecase = NotificationUseCase::new(Arc::new(notification_repo));
        usecase
            .list_for_user(Uuid::new_v4(), Some(9_999))
            .await
            .unwrap();
    }
}
