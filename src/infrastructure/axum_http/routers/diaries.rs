use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use uuid::Uuid;

use crate::application::usecases::diaries::DiaryUseCase;
use crate::domain::repositories::cache_invalidator::CacheInvalidator;
use crate::domain::repositories::diaries::DiaryRepository;
use crate::domain::value_objects::diaries::InsertDiaryModel;
use crate::domain::value_objects::plans::DeleteEntitiesModel;
use crate::infrastructure::axum_http::auth::AuthUser;
use crate::infrastructure::axum_http::error_responses::{ApiResult, forbidden};
use crate::infrastructure::cache::path_cache::PathVersionCache;
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::repositories::diaries::DiaryPostgres;

pub fn routes(db_pool: Arc<PgPoolSquad>, cache: Arc<PathVersionCache>) -> Router {
    let diary_repository = DiaryPostgres::new(Arc::clone(&db_pool));
    let diary_usecase = DiaryUseCase::new(Arc::new(diary_repository), cache);

    Router::new()
        .route("/", post(create).get(list))
        .route("/:diary_id", get(get_one).put(update))
        .route("/delete-many", post(delete_many))
        .with_state(Arc::new(diary_usecase))
}

pub async fn create<R, C>(
    State(diary_usecase): State<Arc<DiaryUseCase<R, C>>>,
    auth: AuthUser,
    Json(model): Json<InsertDiaryModel>,
) -> ApiResult<Response>
where
    R: DiaryRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    if !auth.is_staff() {
        return Ok(forbidden());
    }
    let diary_id = diary_usecase
        .create(auth.facility_id, auth.user_id, model)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": diary_id }))).into_response())
}

pub async fn update<R, C>(
    State(diary_usecase): State<Arc<DiaryUseCase<R, C>>>,
    Path(diary_id): Path<Uuid>,
    auth: AuthUser,
    Json(model): Json<InsertDiaryModel>,
) -> ApiResult<Response>
where
    R: DiaryRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    if !auth.is_staff() {
        return Ok(forbidden());
    }
    let diary_id = diary_usecase
        .update(diary_id, auth.facility_id, auth.user_id, model)
        .await?;
    Ok(Json(json!({ "id": diary_id })).into_response())
}

pub async fn delete_many<R, C>(
    State(diary_usecase): State<Arc<DiaryUseCase<R, C>>>,
    auth: AuthUser,
    Json(model): Json<DeleteEntitiesModel>,
) -> ApiResult<Response>
where
    R: DiaryRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    if !auth.is_staff() {
        return Ok(forbidden());
    }
    let deleted = diary_usecase
        .delete_many(auth.facility_id, auth.user_id, model.ids)
        .await?;
    Ok(Json(json!({ "deleted": deleted })).into_response())
}

pub async fn list<R, C>(
    State(diary_usecase): State<Arc<DiaryUseCase<R, C>>>,
    auth: AuthUser,
) -> ApiResult<Response>
where
    R: DiaryRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    let diaries = diary_usecase.list(auth.facility_id).await?;
    Ok(Json(diaries).into_response())
}

pub async fn get_one<R, C>(
    State(diary_usecase): State<Arc<DiaryUseCase<R, C>>>,
    Path(diary_id): Path<Uuid>,
    auth: AuthUser,
) -> ApiResult<Response>
where
    R: DiaryRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    let diary = diary_usecase.get(diary_id, auth.facility_id).await?;
    Ok(Json(diary).into_response())
}
