use std::sync::Arc;

use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::application::usecases::errors::{UseCaseError, UseCaseResult};
use crate::domain::repositories::cache_invalidator::CacheInvalidator;
use crate::domain::repositories::invoices::InvoiceRepository;
use crate::domain::value_objects::audit::{
    audit_record, staff_notification, MutationSideEffects, TransactionType,
};
use crate::domain::value_objects::enums::{
    audit_actions::AuditAction, entity_kinds::EntityKind, invoice_statuses::InvoiceStatus,
};
use crate::domain::value_objects::payments::InvoiceDto;

pub struct InvoiceUseCase<R, C>
where
    R: InvoiceRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    invoice_repo: Arc<R>,
    cache: Arc<C>,
}

impl<R, C> InvoiceUseCase<R, C>
where
    R: InvoiceRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    pub fn new(invoice_repo: Arc<R>, cache: Arc<C>) -> Self {
        Self {
            invoice_repo,
            cache,
        }
    }

    pub async fn list(&self, facility_id: Uuid) -> UseCaseResult<Vec<InvoiceDto>> {
        let invoices = self.invoice_repo.list(facility_id).await.map_err(|err| {
            error!(%facility_id, db_error = ?err, "invoices: failed to list invoices");
            UseCaseError::Internal(err)
        })?;
        Ok(invoices.into_iter().map(InvoiceDto::from).collect())
    }

    pub async fn get(&self, invoice_id: Uuid, facility_id: Uuid) -> UseCaseResult<InvoiceDto> {
        let invoice = self
            .invoice_repo
            .find_by_id(invoice_id, facility_id)
            .await
            .map_err(|err| {
                error!(%invoice_id, db_error = ?err, "invoices: failed to load invoice");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("invoice"))?;
        Ok(InvoiceDto::from(invoice))
    }

    /// Manual transitions only (cancel, mark overdue); payment-driven
    /// transitions flow through the payment status update.
    pub async fn update_status(
        &self,
        invoice_id: Uuid,
        facility_id: Uuid,
        actor_id: Uuid,
        status: InvoiceStatus,
    ) -> UseCaseResult<InvoiceDto> {
        let previous = self
            .invoice_repo
            .find_by_id(invoice_id, facility_id)
            .await
            .map_err(|err| {
                error!(%invoice_id, db_error = ?err, "invoices: failed to load invoice");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("invoice"))?;

        let type_ = TransactionType(EntityKind::Invoice, AuditAction::StatusUpdated);
        let side_effects = MutationSideEffects::new()
            .with_transaction(audit_record(
                type_,
                actor_id,
                facility_id,
                Some(invoice_id),
                json!({ "from": previous.status, "to": status.as_str() }),
            ))
            .with_notification(staff_notification(
                type_,
                actor_id,
                facility_id,
                Some(invoice_id),
                format!("Invoice status changed to {}", status),
            ));

        let invoice = self
            .invoice_repo
            .update_status(invoice_id, facility_id, status, side_effects)
            .await
            .map_err(|err| {
                error!(%invoice_id, db_error = ?err, "invoices: failed to update invoice status");
                UseCaseError::Internal(err)
            })?;

        info!(%facility_id, %invoice_id, status = %status, "invoices: updated invoice status");
        self.cache.invalidate(EntityKind::Invoice.cache_path());

        Ok(InvoiceDto::from(invoice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::invoices::InvoiceEntity;
    use crate::domain::repositories::cache_invalidator::MockCacheInvalidator;
    use crate::domain::repositories::invoices::MockInvoiceRepository;
    use chrono::Utc;

    fn sample_invoice(invoice_id: Uuid, facility_id: Uuid, status: InvoiceStatus) -> InvoiceEntity {
        let now = Utc::now();
        InvoiceEntity {
            id: invoice_id,
            facility_id,
            payment_id: None,
            user_id: Uuid::new_v4(),
            plan_id: None,
            amount_minor: 90_000,
            status: status.to_string(),
            issue_date: now,
            due_date: None,
            period: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn canceling_an_invoice_audits_the_transition() {
        let invoice_id = Uuid::new_v4();
        let facility_id = Uuid::new_v4();

        let mut invoice_repo = MockInvoiceRepository::new();
        let before = sample_invoice(invoice_id, facility_id, InvoiceStatus::Pending);
        invoice_repo.expect_find_by_id().returning(move |_, _| {
            let invoice = before.clone();
            Box::pin(async move { Ok(Some(invoice)) })
        });
        let after = sample_invoice(invoice_id, facility_id, InvoiceStatus::Canceled);
        invoice_repo
            .expect_update_status()
            .withf(|_, _, status, side_effects| {
                *status == InvoiceStatus::Canceled
                    && side_effects.transactions.len() == 1
                    && side_effects.transactions[0].type_ == "invoice_status_updated"
                    && side_effects.transactions[0].details["from"] == "PENDING"
                    && side_effects.transactions[0].details["to"] == "CANCELED"
            })
            .returning(move |_, _, _, _| {
                let invoice = after.clone();
                Box::pin(async move { Ok(invoice) })
            });

        let mut cache = MockCacheInvalidator::new();
        cache
            .expect_invalidate()
            .withf(|path| path == "/invoices")
            .times(1)
            .return_const(());

        let usecase = InvoiceUseCase::new(Arc::new(invoice_repo), Arc::new(cache));
        let dto = usecase
            .update_status(
                invoice_id,
                facility_id,
                Uuid::new_v4(),
                InvoiceStatus::Canceled,
            )
            .await
            .unwrap();

        assert_eq!(dto.status, "CANCELED");
    }

    #[tokio::test]
    async fn missing_invoice_is_not_found() {
        let mut invoice_repo = MockInvoiceRepository::new();
        invoice_repo
            .expect_find_by_id()
            .returning(|_, _| Box::pin(async { Ok(None) }));

        let usecase = InvoiceUseCase::new(
            Arc::new(invoice_repo),
            Arc::new(MockCacheInvalidator::new()),
        );
        let err = usecase
            .get(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }
}
