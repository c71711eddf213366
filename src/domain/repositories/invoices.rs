use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::invoices::InvoiceEntity;
use crate::domain::value_objects::audit::MutationSideEffects;
use crate::domain::value_objects::enums::invoice_statuses::InvoiceStatus;

#[async_trait]
#[automock]
pub trait InvoiceRepository {
    async fn list(&self, facility_id: Uuid) -> Result<Vec<InvoiceEntity>>;
    async fn find_by_id(&self, invoice_id: Uuid, facility_id: Uuid)
        -> Result<Option<InvoiceEntity>>;

    /// Manual status transition (cancel, mark overdue) with its audit trail.
    async fn update_status(
        &self,
        invoice_id: Uuid,
        facility_id: Uuid,
        status: InvoiceStatus,
        side_effects: MutationSideEffects,
    ) -> Result<InvoiceEntity>;
}
