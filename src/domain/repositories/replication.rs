use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::value_objects::enums::entity_kinds::EntityKind;
use crate::domain::value_objects::replication::ReplicaRecord;

#[async_trait]
#[automock]
pub trait ReplicationRepository {
    /// Copies each source graph into each target facility inside one
    /// serializable transaction: fresh ids at every level, one audit row per
    /// (source × target) pair with aggregate child counts, one staff
    /// notification per target facility. Sources must belong to the source
    /// facility. Failure rolls back every copy.
    async fn replicate(
        &self,
        kind: EntityKind,
        source_ids: Vec<Uuid>,
        source_facility_id: Uuid,
        target_facility_ids: Vec<Uuid>,
        actor_id: Uuid,
    ) -> Result<Vec<ReplicaRecord>>;
}
