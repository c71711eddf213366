use std::sync::Arc;

use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::application::usecases::errors::{UseCaseError, UseCaseResult};
use crate::domain::entities::invoices::InsertInvoiceEntity;
use crate::domain::entities::payments::InsertPaymentEntity;
use crate::domain::repositories::cache_invalidator::CacheInvalidator;
use crate::domain::repositories::payments::PaymentRepository;
use crate::domain::value_objects::audit::{
    audit_record, staff_notification, MutationSideEffects, TransactionType,
};
use crate::domain::value_objects::enums::{
    audit_actions::AuditAction, entity_kinds::EntityKind, invoice_statuses::InvoiceStatus,
    payment_statuses::PaymentStatus,
};
use crate::domain::value_objects::payments::{InsertPaymentModel, InvoiceDto, PaymentDto};

pub struct PaymentUseCase<R, C>
where
    R: PaymentRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    payment_repo: Arc<R>,
    cache: Arc<C>,
}

impl<R, C> PaymentUseCase<R, C>
where
    R: PaymentRepository + Send + Sync + 'static,
    C: CacheInvalidator + 'static,
{
    pub fn new(payment_repo: Arc<R>, cache: Arc<C>) -> Self {
        Self {
            payment_repo,
            cache,
        }
    }

    pub async fn create(
        &self,
        facility_id: Uuid,
        actor_id: Uuid,
        model: InsertPaymentModel,
    ) -> UseCaseResult<Uuid> {
        if model.amount_minor <= 0 {
            return Err(UseCaseError::InvalidInput(
                "payment amount must be positive".to_string(),
            ));
        }

        let status = PaymentStatus::Pending;
        let payment = InsertPaymentEntity {
            facility_id,
            user_id: model.user_id,
            plan_id: model.plan_id,
            amount_minor: model.amount_minor,
            status: status.to_string(),
            payment_date: model.payment_date,
            notes: model.notes.clone(),
        };

        // The linked invoice mirrors the payment's initial status; its
        // payment_id is filled in once the payment row exists.
        let invoice = model.generate_invoice.then(|| InsertInvoiceEntity {
            facility_id,
            payment_id: None,
            user_id: model.user_id,
            plan_id: model.plan_id,
            amount_minor: model.amount_minor,
            status: InvoiceStatus::from_payment(status).to_string(),
            issue_date: model.payment_date,
            due_date: model.due_date,
            period: model.period.clone(),
            notes: model.notes.clone(),
        });

        let type_ = TransactionType(EntityKind::Payment, AuditAction::Created);
        let side_effects = MutationSideEffects::new()
            .with_transaction(audit_record(
                type_,
                actor_id,
                facility_id,
                None,
                json!({
                    "user_id": model.user_id,
                    "amount_minor": model.amount_minor,
                    "generate_invoice": model.generate_invoice,
                }),
            ))
            .with_notification(staff_notification(
                type_,
                actor_id,
                facility_id,
                None,
                format!("Payment of {} was registered", model.amount_minor),
            ));

        let payment_id = self
            .payment_repo
            .create(payment, invoice, side_effects)
            .await
            .map_err(|err| {
                error!(%facility_id, db_error = ?err, "payments: failed to create payment");
                UseCaseError::Internal(err)
            })?;

        info!(%facility_id, %payment_id, "payments: created payment");
        self.cache.invalidate(EntityKind::Payment.cache_path());

        Ok(payment_id)
    }

    pub async fn update_status(
        &self,
        payment_id: Uuid,
        facility_id: Uuid,
        actor_id: Uuid,
        status: PaymentStatus,
    ) -> UseCaseResult<PaymentDto> {
        let previous = self
            .payment_repo
            .find_by_id(payment_id, facility_id)
            .await
            .map_err(|err| {
                error!(%payment_id, db_error = ?err, "payments: failed to load payment");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("payment"))?;

        let type_ = TransactionType(EntityKind::Payment, AuditAction::StatusUpdated);
        let side_effects = MutationSideEffects::new()
            .with_transaction(audit_record(
                type_,
                actor_id,
                facility_id,
                Some(payment_id),
                json!({
                    "from": previous.status,
                    "to": status.as_str(),
                    "invoice_status": InvoiceStatus::from_payment(status).as_str(),
                }),
            ))
            .with_notification(staff_notification(
                type_,
                actor_id,
                facility_id,
                Some(payment_id),
                format!("Payment status changed to {}", status),
            ));

        let payment = self
            .payment_repo
            .update_status(payment_id, facility_id, status, side_effects)
            .await
            .map_err(|err| {
                error!(%payment_id, db_error = ?err, "payments: failed to update payment status");
                UseCaseError::Internal(err)
            })?;

        info!(%facility_id, %payment_id, status = %status, "payments: updated payment status");
        self.cache.invalidate(EntityKind::Payment.cache_path());
        self.cache.invalidate(EntityKind::Invoice.cache_path());

        Ok(PaymentDto::from(payment))
    }

    pub async fn list(&self, facility_id: Uuid) -> UseCaseResult<Vec<PaymentDto>> {
        let payments = self.payment_repo.list(facility_id).await.map_err(|err| {
            error!(%facility_id, db_error = ?err, "payments: failed to list payments");
            UseCaseError::Internal(err)
        })?;
        Ok(payments.into_iter().map(PaymentDto::from).collect())
    }

    pub async fn get(&self, payment_id: Uuid, facility_id: Uuid) -> UseCaseResult<PaymentDto> {
        let payment = self
            .payment_repo
            .find_by_id(payment_id, facility_id)
            .await
            .map_err(|err| {
                error!(%payment_id, db_error = ?err, "payments: failed to load payment");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("payment"))?;
        Ok(PaymentDto::from(payment))
    }

    pub async fn get_linked_invoice(&self, payment_id: Uuid) -> UseCaseResult<Option<InvoiceDto>> {
        let invoice = self
            .payment_repo
            .find_invoice_by_payment(payment_id)
            .await
            .map_err(|err| {
                error!(%payment_id, db_error = ?err, "payments: failed to load linked invoice");
                UseCaseError::Internal(err)
            })?;
        Ok(invoice.map(InvoiceDto::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::payments::PaymentEntity;
    use crate::domain::repositories::cache_invalidator::MockCacheInvalidator;
    use crate::domain::repositories::payments::MockPaymentRepository;
    use chrono::Utc;

    fn sample_model(generate_invoice: bool) -> InsertPaymentModel {
        InsertPaymentModel {
            user_id: Uuid::new_v4(),
            plan_id: Some(Uuid::new_v4()),
            amount_minor: 150_000,
            payment_date: Utc::now(),
            notes: None,
            generate_invoice,
            due_date: None,
            period: Some("2026-08".to_string()),
        }
    }

    fn sample_payment(payment_id: Uuid, facility_id: Uuid, status: PaymentStatus) -> PaymentEntity {
        let now = Utc::now();
        PaymentEntity {
            id: payment_id,
            facility_id,
            user_id: Uuid::new_v4(),
            plan_id: None,
            amount_minor: 150_000,
            status: status.to_string(),
            payment_date: now,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn create_with_generate_invoice_carries_a_pending_invoice() {
        let payment_id = Uuid::new_v4();

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_create()
            .withf(|payment, invoice, side_effects| {
                payment.status == "PENDING"
                    && invoice
                        .as_ref()
                        .is_some_and(|invoice| invoice.status == "PENDING")
                    && side_effects.transactions.len() == 1
                    && side_effects.transactions[0].type_ == "payment_created"
            })
            .returning(move |_, _, _| Box::pin(async move { Ok(payment_id) }));

        let mut cache = MockCacheInvalidator::new();
        cache.expect_invalidate().return_const(());

        let usecase = PaymentUseCase::new(Arc::new(payment_repo), Arc::new(cache));
        let created = usecase
            .create(Uuid::new_v4(), Uuid::new_v4(), sample_model(true))
            .await
            .unwrap();

        assert_eq!(created, payment_id);
    }

    #[tokio::test]
    async fn completing_a_payment_audits_the_paid_invoice_status() {
        let payment_id = Uuid::new_v4();
        let facility_id = Uuid::new_v4();

        let mut payment_repo = MockPaymentRepository::new();
        let before = sample_payment(payment_id, facility_id, PaymentStatus::Pending);
        payment_repo
            .expect_find_by_id()
            .returning(move |_, _| {
                let payment = before.clone();
                Box::pin(async move { Ok(Some(payment)) })
            });
        let after = sample_payment(payment_id, facility_id, PaymentStatus::Completed);
        payment_repo
            .expect_update_status()
            .withf(|_, _, status, side_effects| {
                *status == PaymentStatus::Completed
                    && side_effects.transactions[0].details["invoice_status"] == "PAID"
            })
            .returning(move |_, _, _, _| {
                let payment = after.clone();
                Box::pin(async move { Ok(payment) })
            });

        let mut cache = MockCacheInvalidator::new();
        cache.expect_invalidate().times(2).return_const(());

        let usecase = PaymentUseCase::new(Arc::new(payment_repo), Arc::new(cache));
        let dto = usecase
            .update_status(payment_id, facility_id, Uuid::new_v4(), PaymentStatus::Completed)
            .await
            .unwrap();

        assert_eq!(dto.status, "COMPLETED");
    }

    #[tokio::test]
    async fn refunding_a_payment_pulls_the_invoice_back_to_pending() {
        let payment_id = Uuid::new_v4();
        let facility_id = Uuid::new_v4();

        let mut payment_repo = MockPaymentRepository::new();
        let before = sample_payment(payment_id, facility_id, PaymentStatus::Completed);
        payment_repo.expect_find_by_id().returning(move |_, _| {
            let payment = before.clone();
            Box::pin(async move { Ok(Some(payment)) })
        });
        let after = sample_payment(payment_id, facility_id, PaymentStatus::Refunded);
        payment_repo
            .expect_update_status()
            .withf(|_, _, _, side_effects| {
                side_effects.transactions[0].details["invoice_status"] == "PENDING"
            })
            .returning(move |_, _, _, _| {
                let payment = after.clone();
                Box::pin(async move { Ok(payment) })
            });

        let mut cache = MockCacheInvalidator::new();
        cache.expect_invalidate().return_const(());

        let usecase = PaymentUseCase::new(Arc::new(payment_repo), Arc::new(cache));
        usecase
            .update_status(payment_id, facility_id, Uuid::new_v4(), PaymentStatus::Refunded)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected() {
        let usecase = PaymentUseCase::new(
            Arc::new(MockPaymentRepository::new()),
            Arc::new(MockCacheInvalidator::new()),
        );

        let mut model = sample_model(false);
        model.amount_minor = 0;

        let err = usecase
            .create(Uuid::new_v4(), Uuid::new_v4(), model)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
