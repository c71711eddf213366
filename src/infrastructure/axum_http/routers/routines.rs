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

use crate::application::usecases::routines::RoutineUseCase;
use crate::domain::repositories::cache_invalidator::CacheInvalidator;
use crate::domain::repositories::routines::RoutineRepository;
use crate::domain::value_objects::plans::DeleteEntitiesModel;
use crate::domain::value_objects::routines::InsertRoutineModel;
use crate::infrastructure::axum_http::auth::AuthUser;
use crate::infrastructure::axum_http::error_responses::{ApiResult, forbidden};
use crate::infrastructure::cache::path_cache::PathVersionCache;
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::repositories::routines::RoutinePostgres;

/// One router serves both `/routines` and `/preset-routines`; the preset flag
/// decides which rows the use case sees and how mutations are audited.
pub fn routes(db_pool: Arc<PgPoolSquad>, cache: Arc<PathVersionCache>, preset: bool) -> Router {
    let routine_repository = RoutinePostgres::new(Arc::clone(&db_pool));
    let routine_usecase = RoutineUseCase::new(Arc::new(routine_repository), cache, preset);

    Router::new()
        .route("/", post(create).get(list))
        .route("/:routine_id", get(get_one).put(update))
        .route("/delete-many", post(delete_many))
        .with_state(Arc::new(routine_usecase))
}

pub async fn create<R, C>(
    State(routine_usecase): State<Arc<RoutineUseCase<R, C>>>,
    auth: AuthUser,
    Json(model): Json<InsertRoutineModel>,
) -> ApiResult<Response>
where
    R: RoutineRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    if !auth.is_staff() {
        return Ok(forbidden());
    }
    let routine_id = routine_usecase
        .create(auth.facility_id, auth.user_id, model)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": routine_id }))).into_response())
}

pub async fn update<R, C>(
    State(routine_usecase): State<Arc<RoutineUseCase<R, C>>>,
    Path(routine_id): Path<Uuid>,
    auth: AuthUser,
    Json(model): Json<InsertRoutineModel>,
) -> ApiResult<Response>
where
    R: RoutineRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    if !auth.is_staff() {
        return Ok(forbidden());
    }
    let routine_id = routine_usecase
        .update(routine_id, auth.facility_id, auth.user_id, model)
        .await?;
    Ok(Json(json!({ "id": routine_id })).into_response())
}

pub async fn delete_many<R, C>(
    State(routine_usecase): State<Arc<RoutineUseCase<R, C>>>,
    auth: AuthUser,
    Json(model): Json<DeleteEntitiesModel>,
) -> ApiResult<Response>
where
    R: RoutineRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    if !auth.is_staff() {
        return Ok(forbidden());
    }
    let deleted = routine_usecase
        .delete_many(auth.facility_id, auth.user_id, model.ids)
        .await?;
    Ok(Json(json!({ "deleted": deleted })).into_response())
}

pub async fn list<R, C>(
    State(routine_usecase): State<Arc<RoutineUseCase<R, C>>>,
    auth: AuthUser,
) -> ApiResult<Response>
where
    R: RoutineRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    let routines = routine_usecase.list(auth.facility_id).await?;
    Ok(Json(routines).into_response())
}

pub async fn get_one<R, C>(
    State(routine_usecase): State<Arc<RoutineUseCase<R, C>>>,
    Path(routine_id): Path<Uuid>,
    auth: AuthUser,
) -> ApiResult<Response>
where
    R: RoutineRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    let routine = routine_usecase.get(routine_id, auth.facility_id).await?;
    Ok(Json(routine).into_response())
}
