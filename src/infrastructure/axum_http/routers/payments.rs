use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde_json::json;
use uuid::Uuid;

use crate::application::usecases::payments::PaymentUseCase;
use crate::domain::repositories::cache_invalidator::CacheInvalidator;
use crate::domain::repositories::payments::PaymentRepository;
use crate::domain::value_objects::payments::{InsertPaymentModel, UpdatePaymentStatusModel};
use crate::infrastructure::axum_http::auth::AuthUser;
use crate::infrastructure::axum_http::error_responses::{ApiResult, forbidden};
use crate::infrastructure::cache::path_cache::PathVersionCache;
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::repositories::payments::PaymentPostgres;

pub fn routes(db_pool: Arc<PgPoolSquad>, cache: Arc<PathVersionCache>) -> Router {
    let payment_repository = PaymentPostgres::new(Arc::clone(&db_pool));
    let payment_usecase = PaymentUseCase::new(Arc::new(payment_repository), cache);

    Router::new()
        .route("/", post(create).get(list))
        .route("/:payment_id", get(get_one))
        .route("/:payment_id/status", patch(update_status))
        .route("/:payment_id/invoice", get(get_linked_invoice))
        .with_state(Arc::new(payment_usecase))
}

pub async fn create<R, C>(
    State(payment_usecase): State<Arc<PaymentUseCase<R, C>>>,
    auth: AuthUser,
    Json(model): Json<InsertPaymentModel>,
) -> ApiResult<Response>
where
    R: PaymentRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    if !auth.is_staff() {
        return Ok(forbidden());
    }
    let payment_id = payment_usecase
        .create(auth.facility_id, auth.user_id, model)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": payment_id }))).into_response())
}

pub async fn update_status<R, C>(
    State(payment_usecase): State<Arc<PaymentUseCase<R, C>>>,
    Path(payment_id): Path<Uuid>,
    auth: AuthUser,
    Json(model): Json<UpdatePaymentStatusModel>,
) -> ApiResult<Response>
where
    R: PaymentRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    if !auth.is_staff() {
        return Ok(forbidden());
    }
    let payment = payment_usecase
        .update_status(payment_id, auth.facility_id, auth.user_id, model.status)
        .await?;
    Ok(Json(payment).into_response())
}

pub async fn list<R, C>(
    State(payment_usecase): State<Arc<PaymentUseCase<R, C>>>,
    auth: AuthUser,
) -> ApiResult<Response>
where
    R: PaymentRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    let payments = payment_usecase.list(auth.facility_id).await?;
    Ok(Json(payments).into_response())
}

pub async fn get_one<R, C>(
    State(payment_usecase): State<Arc<PaymentUseCase<R, C>>>,
    Path(payment_id): Path<Uuid>,
    auth: AuthUser,
) -> ApiResult<Response>
where
    R: PaymentRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    let payment = payment_usecase.get(payment_id, auth.facility_id).await?;
    Ok(Json(payment).into_response())
}

pub async fn get_linked_invoice<R, C>(
    State(payment_usecase): State<Arc<PaymentUseCase<R, C>>>,
    Path(payment_id): Path<Uuid>,
    auth: AuthUser,
) -> ApiResult<Response>
where
    R: PaymentRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    // Ownership is checked against the payment row.
    payment_usecase.get(payment_id, auth.facility_id).await?;
    let invoice = payment_usecase.get_linked_invoice(payment_id).await?;
    Ok(Json(invoice).into_response())
}
