use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};

use crate::application::usecases::replication::ReplicationUseCase;
use crate::domain::repositories::cache_invalidator::CacheInvalidator;
use crate::domain::repositories::replication::ReplicationRepository;
use crate::domain::value_objects::replication::ReplicateModel;
use crate::infrastructure::axum_http::auth::AuthUser;
use crate::infrastructure::axum_http::error_responses::{ApiResult, forbidden};
use crate::infrastructure::cache::path_cache::PathVersionCache;
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::repositories::replication::ReplicationPostgres;

pub fn routes(db_pool: Arc<PgPoolSquad>, cache: Arc<PathVersionCache>) -> Router {
    let replication_repository = ReplicationPostgres::new(Arc::clone(&db_pool));
    let replication_usecase = ReplicationUseCase::new(Arc::new(replication_repository), cache);

    Router::new()
        .route("/", post(replicate))
        .with_state(Arc::new(replication_usecase))
}

pub async fn replicate<R, C>(
    State(replication_usecase): State<Arc<ReplicationUseCase<R, C>>>,
    auth: AuthUser,
    Json(model): Json<ReplicateModel>,
) -> ApiResult<Response>
where
    R: ReplicationRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    if !auth.is_staff() {
        return Ok(forbidden());
    }
    let report = replication_usecase
        .replicate(auth.user_id, auth.facility_id, model)
        .await?;
    Ok((StatusCode::CREATED, Json(report)).into_response())
}
