use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::transactions::TransactionEntity;

#[async_trait]
#[automock]
pub trait TransactionLogRepository {
    /// Audit rows for a facility, newest first.
    async fn list(&self, facility_id: Uuid, limit: i64) -> Result<Vec<TransactionEntity>>;
}
