use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::domain::entities::invoices::{InsertInvoiceEntity, InvoiceEntity};
use crate::domain::entities::payments::{InsertPaymentEntity, PaymentEntity};
use crate::domain::repositories::payments::PaymentRepository;
use crate::domain::value_objects::audit::MutationSideEffects;
use crate::domain::value_objects::enums::{
    invoice_statuses::InvoiceStatus, payment_statuses::PaymentStatus,
};
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::schema::{invoices, payments};
use crate::infrastructure::postgres::side_effects;

pub struct PaymentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentRepository for PaymentPostgres {
    async fn create(
        &self,
        payment: InsertPaymentEntity,
        invoice: Option<InsertInvoiceEntity>,
        side_effects: MutationSideEffects,
    ) -> Result<Uuid> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Uuid> {
            let mut conn = pool.get()?;
            let payment_id = conn.transaction::<Uuid, diesel::result::Error, _>(|tx| {
                let payment_id = insert_into(payments::table)
                    .values(&payment)
                    .returning(payments::id)
                    .get_result::<Uuid>(tx)?;

                if let Some(mut invoice) = invoice {
                    invoice.payment_id = Some(payment_id);
                    insert_into(invoices::table).values(&invoice).execute(tx)?;
                }

                side_effects::apply(tx, &side_effects)?;
                Ok(payment_id)
            })?;
            Ok(payment_id)
        })
        .await?
    }

    async fn update_status(
        &self,
        payment_id: Uuid,
        facility_id: Uuid,
        status: PaymentStatus,
        side_effects: MutationSideEffects,
    ) -> Result<PaymentEntity> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<PaymentEntity> {
            let mut conn = pool.get()?;
            let payment = conn.transaction::<PaymentEntity, diesel::result::Error, _>(|tx| {
                let payment = update(payments::table)
                    .filter(payments::id.eq(payment_id))
                    .filter(payments::facility_id.eq(facility_id))
                    .set((
                        payments::status.eq(status.to_string()),
                        payments::updated_at.eq(Utc::now()),
                    ))
                    .returning(PaymentEntity::as_returning())
                    .get_result::<PaymentEntity>(tx)?;

                // The linked invoice mirrors the payment.
                update(invoices::table)
                    .filter(invoices::payment_id.eq(payment_id))
                    .set((
                        invoices::status.eq(InvoiceStatus::from_payment(status).to_string()),
                        invoices::updated_at.eq(Utc::now()),
                    ))
                    .execute(tx)?;

                side_effects::apply(tx, &side_effects)?;
                Ok(payment)
            })?;
            Ok(payment)
        })
        .await?
    }

    async fn list(&self, facility_id: Uuid) -> Result<Vec<PaymentEntity>> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Vec<PaymentEntity>> {
            let mut conn = pool.get()?;
            let results = payments::table
                .filter(payments::facility_id.eq(facility_id))
                .order(payments::payment_date.desc())
                .select(PaymentEntity::as_select())
                .load::<PaymentEntity>(&mut conn)?;
            Ok(results)
        })
        .await?
    }

    async fn find_by_id(
        &self,
        payment_id: Uuid,
        facility_id: Uuid,
    ) -> Result<Option<PaymentEntity>> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Option<PaymentEntity>> {
            let mut conn = pool.get()?;
            let payment = payments::table
                .filter(payments::id.eq(payment_id))
                .filter(payments::facility_id.eq(facility_id))
                .select(PaymentEntity::as_select())
                .first::<PaymentEntity>(&mut conn)
                .optional()?;
            Ok(payment)
        })
        .await?
    }

    async fn find_invoice_by_payment(&self, payment_id: Uuid) -> Result<Option<InvoiceEntity>> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Option<InvoiceEntity>> {
            let mut conn = pool.get()?;
            let invoice = invoices::table
                .filter(invoices::payment_id.eq(payment_id))
                .select(InvoiceEntity::as_select())
                .first::<InvoiceEntity>(&mut conn)
                .optional()?;
            Ok(invoice)
        })
        .await?
    }
}
