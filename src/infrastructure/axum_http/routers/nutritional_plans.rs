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

use crate::application::usecases::nutritional_plans::NutritionalPlanUseCase;
use crate::domain::repositories::cache_invalidator::CacheInvalidator;
use crate::domain::repositories::nutritional_plans::NutritionalPlanRepository;
use crate::domain::value_objects::nutritional_plans::InsertNutritionalPlanModel;
use crate::domain::value_objects::plans::DeleteEntitiesModel;
use crate::infrastructure::axum_http::auth::AuthUser;
use crate::infrastructure::axum_http::error_responses::{ApiResult, forbidden};
use crate::infrastructure::cache::path_cache::PathVersionCache;
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::repositories::nutritional_plans::NutritionalPlanPostgres;

/// Serves `/nutritional-plans` and `/preset-nutritional-plans` from the same
/// handler set, split by the preset flag.
pub fn routes(db_pool: Arc<PgPoolSquad>, cache: Arc<PathVersionCache>, preset: bool) -> Router {
    let plan_repository = NutritionalPlanPostgres::new(Arc::clone(&db_pool));
    let plan_usecase = NutritionalPlanUseCase::new(Arc::new(plan_repository), cache, preset);

    Router::new()
        .route("/", post(create).get(list))
        .route("/:plan_id", get(get_one).put(update))
        .route("/delete-many", post(delete_many))
        .with_state(Arc::new(plan_usecase))
}

pub async fn create<R, C>(
    State(plan_usecase): State<Arc<NutritionalPlanUseCase<R, C>>>,
    auth: AuthUser,
    Json(model): Json<InsertNutritionalPlanModel>,
) -> ApiResult<Response>
where
    R: NutritionalPlanRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    if !auth.is_staff() {
        return Ok(forbidden());
    }
    let plan_id = plan_usecase
        .create(auth.facility_id, auth.user_id, model)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": plan_id }))).into_response())
}

pub async fn update<R, C>(
    State(plan_usecase): State<Arc<NutritionalPlanUseCase<R, C>>>,
    Path(plan_id): Path<Uuid>,
    auth: AuthUser,
    Json(model): Json<InsertNutritionalPlanModel>,
) -> ApiResult<Response>
where
    R: NutritionalPlanRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    if !auth.is_staff() {
        return Ok(forbidden());
    }
    let plan_id = plan_usecase
        .update(plan_id, auth.facility_id, auth.user_id, model)
        .await?;
    Ok(Json(json!({ "id": plan_id })).into_response())
}

pub async fn delete_many<R, C>(
    State(plan_usecase): State<Arc<NutritionalPlanUseCase<R, C>>>,
    auth: AuthUser,
    Json(model): Json<DeleteEntitiesModel>,
) -> ApiResult<Response>
where
    R: NutritionalPlanRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    if !auth.is_staff() {
        return Ok(forbidden());
    }
    let deleted = plan_usecase
        .delete_many(auth.facility_id, auth.user_id, model.ids)
        .await?;
    Ok(Json(json!({ "deleted": deleted })).into_response())
}

pub async fn list<R, C>(
    State(plan_usecase): State<Arc<NutritionalPlanUseCase<R, C>>>,
    auth: AuthUser,
) -> ApiResult<Response>
where
    R: NutritionalPlanRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    let plans = plan_usecase.list(auth.facility_id).await?;
    Ok(Json(plans).into_response())
}

pub async fn get_one<R, C>(
    State(plan_usecase): State<Arc<NutritionalPlanUseCase<R, C>>>,
    Path(plan_id): Path<Uuid>,
    auth: AuthUser,
) -> ApiResult<Response>
where
    R: NutritionalPlanRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    let plan = plan_usecase.get(plan_id, auth.facility_id).await?;
    Ok(Json(plan).into_response())
}
