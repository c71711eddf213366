use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::application::usecases::invoices::InvoiceUseCase;
use crate::domain::repositories::cache_invalidator::CacheInvalidator;
use crate::domain::repositories::invoices::InvoiceRepository;
use crate::domain::value_objects::payments::UpdateInvoiceStatusModel;
use crate::infrastructure::axum_http::auth::AuthUser;
use crate::infrastructure::axum_http::error_responses::{ApiResult, forbidden};
use crate::infrastructure::cache::path_cache::PathVersionCache;
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::repositories::invoices::InvoicePostgres;

pub fn routes(db_pool: Arc<PgPoolSquad>, cache: Arc<PathVersionCache>) -> Router {
    let invoice_repository = InvoicePostgres::new(Arc::clone(&db_pool));
    let invoice_usecase = InvoiceUseCase::new(Arc::new(invoice_repository), cache);

    Router::new()
        .route("/", get(list))
        .route("/:invoice_id", get(get_one))
        .route("/:invoice_id/status", patch(update_status))
        .with_state(Arc::new(invoice_usecase))
}

pub async fn list<R, C>(
    State(invoice_usecase): State<Arc<InvoiceUseCase<R, C>>>,
    auth: AuthUser,
) -> ApiResult<Response>
where
    R: InvoiceRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    let invoices = invoice_usecase.list(auth.facility_id).await?;
    Ok(Json(invoices).into_response())
}

pub async fn get_one<R, C>(
    State(invoice_usecase): State<Arc<InvoiceUseCase<R, C>>>,
    Path(invoice_id): Path<Uuid>,
    auth: AuthUser,
) -> ApiResult<Response>
where
    R: InvoiceRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    let invoice = invoice_usecase.get(invoice_id, auth.facility_id).await?;
    Ok(Json(invoice).into_response())
}

pub async fn update_status<R, C>(
    State(invoice_usecase): State<Arc<InvoiceUseCase<R, C>>>,
    Path(invoice_id): Path<Uuid>,
    auth: AuthUser,
    Json(model): Json<UpdateInvoiceStatusModel>,
) -> ApiResult<Response>
where
    R: InvoiceRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    if !auth.is_staff() {
        return Ok(forbidden());
    }
    let invoice = invoice_usecase
        .update_status(invoice_id, auth.facility_id, auth.user_id, model.status)
        .await?;
    Ok(Json(invoice).into_response())
}
