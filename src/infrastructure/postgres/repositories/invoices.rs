use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, prelude::*, update};
use uuid::Uuid;

use crate::domain::entities::invoices::InvoiceEntity;
use crate::domain::repositories::invoices::InvoiceRepository;
use crate::domain::value_objects::audit::MutationSideEffects;
use crate::domain::value_objects::enums::invoice_statuses::InvoiceStatus;
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::schema::invoices;
use crate::infrastructure::postgres::side_effects;

pub struct InvoicePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl InvoicePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl InvoiceRepository for InvoicePostgres {
    async fn list(&self, facility_id: Uuid) -> Result<Vec<InvoiceEntity>> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Vec<InvoiceEntity>> {
            let mut conn = pool.get()?;
            let results = invoices::table
                .filter(invoices::facility_id.eq(facility_id))
                .order(invoices::issue_date.desc())
                .select(InvoiceEntity::as_select())
                .load::<InvoiceEntity>(&mut conn)?;
            Ok(results)
        })
        .await?
    }

    async fn find_by_id(
        &self,
        invoice_id: Uuid,
        facility_id: Uuid,
    ) -> Result<Option<InvoiceEntity>> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Option<InvoiceEntity>> {
            let mut conn = pool.get()?;
            let invoice = invoices::table
                .filter(invoices::id.eq(invoice_id))
                .filter(invoices::facility_id.eq(facility_id))
                .select(InvoiceEntity::as_select())
                .first::<InvoiceEntity>(&mut conn)
                .optional()?;
            Ok(invoice)
        })
        .await?
    }

    async fn update_status(
        &self,
        invoice_id: Uuid,
        facility_id: Uuid,
        status: InvoiceStatus,
        side_effects: MutationSideEffects,
    ) -> Result<InvoiceEntity> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<InvoiceEntity> {
            let mut conn = pool.get()?;
            let invoice = conn.transaction::<InvoiceEntity, diesel::result::Error, _>(|tx| {
                let invoice = update(invoices::table)
                    .filter(invoices::id.eq(invoice_id))
                    .filter(invoices::facility_id.eq(facility_id))
                    .set((
                        invoices::status.eq(status.to_string()),
                        invoices::updated_at.eq(Utc::now()),
                    ))
                    .returning(InvoiceEntity::as_returning())
                    .get_result::<InvoiceEntity>(tx)?;

                side_effects::apply(tx, &side_effects)?;
                Ok(invoice)
            })?;
            Ok(invoice)
        })
        .await?
    }
}
