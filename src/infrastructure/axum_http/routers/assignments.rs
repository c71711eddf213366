use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use uuid::Uuid;

use crate::application::usecases::assignments::AssignmentUseCase;
use crate::application::usecases::errors::UseCaseError;
use crate::domain::repositories::assignments::AssignmentRepository;
use crate::domain::repositories::cache_invalidator::CacheInvalidator;
use crate::domain::value_objects::assignments::AssignModel;
use crate::domain::value_objects::enums::assignment_categories::AssignmentCategory;
use crate::infrastructure::axum_http::auth::AuthUser;
use crate::infrastructure::axum_http::error_responses::{ApiResult, forbidden};
use crate::infrastructure::cache::path_cache::PathVersionCache;
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::repositories::assignments::AssignmentPostgres;

pub fn routes(db_pool: Arc<PgPoolSquad>, cache: Arc<PathVersionCache>) -> Router {
    let assignment_repository = AssignmentPostgres::new(Arc::clone(&db_pool));
    let assignment_usecase = AssignmentUseCase::new(Arc::new(assignment_repository), cache);

    Router::new()
        .route("/assign", post(assign))
        .route("/unassign", post(unassign))
        .route("/entity/:category/:entity_id", get(list_for_entity))
        .route("/me", get(list_for_me))
        .with_state(Arc::new(assignment_usecase))
}

pub async fn assign<R, C>(
    State(assignment_usecase): State<Arc<AssignmentUseCase<R, C>>>,
    auth: AuthUser,
    Json(model): Json<AssignModel>,
) -> ApiResult<Response>
where
    R: AssignmentRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    if !auth.is_staff() {
        return Ok(forbidden());
    }
    let outcome = assignment_usecase
        .assign(auth.facility_id, auth.user_id, model)
        .await?;
    Ok(Json(outcome).into_response())
}

pub async fn unassign<R, C>(
    State(assignment_usecase): State<Arc<AssignmentUseCase<R, C>>>,
    auth: AuthUser,
    Json(model): Json<AssignModel>,
) -> ApiResult<Response>
where
    R: AssignmentRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    if !auth.is_staff() {
        return Ok(forbidden());
    }
    let outcome = assignment_usecase
        .unassign(auth.facility_id, auth.user_id, model)
        .await?;
    Ok(Json(outcome).into_response())
}

pub async fn list_for_entity<R, C>(
    State(assignment_usecase): State<Arc<AssignmentUseCase<R, C>>>,
    Path((category, entity_id)): Path<(String, Uuid)>,
    auth: AuthUser,
) -> ApiResult<Response>
where
    R: AssignmentRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    let category = AssignmentCategory::from_str(&category).ok_or_else(|| {
        UseCaseError::InvalidInput(format!("unknown assignment category: {category}"))
    })?;
    let rows = assignment_usecase
        .list_for_entity(category, entity_id, auth.facility_id)
        .await?;
    Ok(Json(rows).into_response())
}

pub async fn list_for_me<R, C>(
    State(assignment_usecase): State<Arc<AssignmentUseCase<R, C>>>,
    auth: AuthUser,
) -> ApiResult<Response>
where
    R: AssignmentRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    let rows = assignment_usecase.list_for_user(auth.user_id).await?;
    Ok(Json(rows).into_response())
}
