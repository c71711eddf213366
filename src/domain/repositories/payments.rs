use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::invoices::{InsertInvoiceEntity, InvoiceEntity};
use crate::domain::entities::payments::{InsertPaymentEntity, PaymentEntity};
use crate::domain::value_objects::audit::MutationSideEffects;
use crate::domain::value_objects::enums::payment_statuses::PaymentStatus;

#[async_trait]
#[automock]
pub trait PaymentRepository {
    /// Inserts the payment, the optional linked invoice (re-parented to the
    /// fresh payment id) and the side effects in one transaction.
    async fn create(
        &self,
        payment: InsertPaymentEntity,
        invoice: Option<InsertInvoiceEntity>,
        side_effects: MutationSideEffects,
    ) -> Result<Uuid>;

    /// Transitions the payment status and mirrors it onto the linked invoice
    /// if one exists, in one transaction.
    async fn update_status(
        &self,
        payment_id: Uuid,
        facility_id: Uuid,
        status: PaymentStatus,
        side_effects: MutationSideEffects,
    ) -> Result<PaymentEntity>;

    async fn list(&self, facility_id: Uuid) -> Result<Vec<PaymentEntity>>;
    async fn find_by_id(&self, payment_id: Uuid, facility_id: Uuid)
        -> Result<Option<PaymentEntity>>;
    async fn find_invoice_by_payment(&self, payment_id: Uuid) -> Result<Option<InvoiceEntity>>;
}
