use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::enums::entity_kinds::EntityKind;

#[derive(Debug, Clone, Deserialize)]
pub struct ReplicateModel {
    pub kind: EntityKind,
    pub source_ids: Vec<Uuid>,
    pub target_facility_ids: Vec<Uuid>,
}

/// One (source × target facility) copy produced by the replication engine.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReplicaRecord {
    pub source_id: Uuid,
    pub target_facility_id: Uuid,
    pub new_entity_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ReplicationReport {
    pub kind: EntityKind,
    pub replicas: Vec<ReplicaRecord>,
}

impl ReplicationReport {
    pub fn replica_count(&self) -> usize {
        self.replicas.len()
    }
}
