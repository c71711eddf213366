use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use crate::application::usecases::transactions::TransactionLogUseCase;
use crate::domain::repositories::transactions::TransactionLogRepository;
use crate::infrastructure::axum_http::auth::AuthUser;
use crate::infrastructure::axum_http::error_responses::{ApiResult, forbidden};
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::repositories::transactions::TransactionLogPostgres;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let transaction_repository = TransactionLogPostgres::new(Arc::clone(&db_pool));
    let transaction_usecase = TransactionLogUseCase::new(Arc::new(transaction_repository));

    Router::new()
        .route("/", get(list))
        .with_state(Arc::new(transaction_usecase))
}

pub async fn list<R>(
    State(transaction_usecase): State<Arc<TransactionLogUseCase<R>>>,
    Query(query): Query<ListQuery>,
    auth: AuthUser,
) -> ApiResult<Response>
where
    R: TransactionLogRepository + Send + Sync + 'static,
{
    // The audit trail is staff-only.
    if !auth.is_staff() {
        return Ok(forbidden());
    }
    let rows = transaction_usecase
        .list(auth.facility_id, query.limit)
        .await?;
    Ok(Json(rows).into_response())
}
