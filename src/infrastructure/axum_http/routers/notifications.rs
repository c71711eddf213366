use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::application::usecases::notifications::NotificationUseCase;
use crate::domain::repositories::notifications::NotificationRepository;
use crate::infrastructure::axum_http::auth::AuthUser;
use crate::infrastructure::axum_http::error_responses::{ApiResult, forbidden};
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::repositories::notifications::NotificationPostgres;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let notification_repository = NotificationPostgres::new(Arc::clone(&db_pool));
    let notification_usecase = NotificationUseCase::new(Arc::new(notification_repository));

    Router::new()
        .route("/", get(list_for_facility))
        .route("/:notification_id/read", patch(mark_read))
        .route("/client", get(list_for_me))
        .route("/client/:notification_id/read", patch(mark_client_read))
        .with_state(Arc::new(notification_usecase))
}

pub async fn list_for_facility<R>(
    State(notification_usecase): State<Arc<NotificationUseCase<R>>>,
    Query(query): Query<ListQuery>,
    auth: AuthUser,
) -> ApiResult<Response>
where
    R: NotificationRepository + Send + Sync + 'static,
{
    if !auth.is_staff() {
        return Ok(forbidden());
    }
    let rows = notification_usecase
        .list_for_facility(auth.facility_id, query.limit)
        .await?;
    Ok(Json(rows).into_response())
}

pub async fn mark_read<R>(
    State(notification_usecase): State<Arc<NotificationUseCase<R>>>,
    Path(notification_id): Path<Uuid>,
    auth: AuthUser,
) -> ApiResult<Response>
where
    R: NotificationRepository + Send + Sync + 'static,
{
    if !auth.is_staff() {
        return Ok(forbidden());
    }
    notification_usecase
        .mark_read(notification_id, auth.facility_id)
        .await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn list_for_me<R>(
    State(notification_usecase): State<Arc<NotificationUseCase<R>>>,
    Query(query): Query<ListQuery>,
    auth: AuthUser,
) -> ApiResult<Response>
where
    R: NotificationRepository + Send + Sync + 'static,
{
    let rows = notification_usecase
        .list_for_user(auth.user_id, query.limit)
        .await?;
    Ok(Json(rows).into_response())
}

pub async fn mark_client_read<R>(
    State(notification_usecase): State<Arc<NotificationUseCase<R>>>,
    Path(notification_id): Path<Uuid>,
    auth: AuthUser,
) -> ApiResult<Response>
where
    R: NotificationRepository + Send + Sync + 'static,
{
    notification_usecase
        .mark_client_read(notification_id, auth.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
