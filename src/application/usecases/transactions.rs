use std::sync::Arc;

use tracing::error;
use uuid::Uuid;

use crate::application::usecases::errors::{UseCaseError, UseCaseResult};
use crate::domain::repositories::transactions::TransactionLogRepository;
use crate::domain::value_objects::audit::TransactionDto;

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 500;

pub struct TransactionLogUseCase<R>
where
    R: TransactionLogRepository + Send + Sync + 'static,
{
    transaction_repo: Arc<R>,
}

impl<R> TransactionLogUseCase<R>
where
    R: TransactionLogRepository + Send + Sync + 'static,
{
    pub fn new(transaction_repo: Arc<R>) -> Self {
        Self { transaction_repo }
    }

    pub async fn list(
        &self,
        facility_id: Uuid,
        limit: Option<i64>,
    ) -> UseCaseResult<Vec<TransactionDto>> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let rows = self
            .transaction_repo
            .list(facility_id, limit)
            .await
            .map_err(|err| {
                error!(%facility_id, db_error = ?err, "transactions: failed to list audit log");
                UseCaseError::Internal(err)
            })?;
        Ok(rows.into_iter().map(TransactionDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::transactions::MockTransactionLogRepository;

    #[tokio::test]
    async fn list_clamps_oversized_limits() {
        let mut transaction_repo = MockTransactionLogRepository::new();
        transaction_repo
            .expect_list()
            .withf(|_, limit| *limit == MAX_LIMIT)
            .returning(|_, _| Box::pin(async { Ok(vec![]) }));

        let usecase = TransactionLogUseCase::new(Arc::new(transaction_repo));
        let rows = usecase
            .list(Uuid::new_v4(), Some(10_000))
            .await
            .unwrap();

        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn list_defaults_the_limit_when_absent() {
        let mut transaction_repo = MockTransactionLogRepository::new();
        transaction_repo
            .expect_list()
            .withf(|_, limit| *limit == DEFAULT_LIMIT)
            .returning(|_, _| Box::pin(async { Ok(vec![]) }));

        let usecase = TransactionLogUseCase::new(Arc::new(transaction_repo));
        usecase.list(Uuid::new_v4(), None).await.unwrap();
    }
}
