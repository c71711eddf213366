use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*};
use uuid::Uuid;

use crate::domain::entities::transactions::TransactionEntity;
use crate::domain::repositories::transactions::TransactionLogRepository;
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::schema::transactions;

pub struct TransactionLogPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl TransactionLogPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl TransactionLogRepository for TransactionLogPostgres {
    async fn list(&self, facility_id: Uuid, limit: i64) -> Result<Vec<TransactionEntity>> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Vec<TransactionEntity>> {
            let mut conn = pool.get()?;
            let results = transactions::table
                .filter(transactions::facility_id.eq(facility_id))
                .order(transactions::created_at.desc())
                .limit(limit)
                .select(TransactionEntity::as_select())
                .load::<TransactionEntity>(&mut conn)?;
            Ok(results)
        })
        .await?
    }
}
