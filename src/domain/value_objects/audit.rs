use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::notifications::{
    InsertClientNotificationEntity, InsertNotificationEntity,
};
use crate::domain::entities::transactions::{InsertTransactionEntity, TransactionEntity};
use crate::domain::value_objects::enums::{
    audit_actions::AuditAction, entity_kinds::EntityKind,
};

/// Audit `type` wire value, composed as `<entity>_<action>` (e.g.
/// `plan_created`, `routine_replicated`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionType(pub EntityKind, pub AuditAction);

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.0.as_str(), self.1.as_str())
    }
}

/// Everything a mutation writes alongside its primary rows, inside the same
/// database transaction. Built by the use case, applied by the repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationSideEffects {
    pub transactions: Vec<InsertTransactionEntity>,
    pub notifications: Vec<InsertNotificationEntity>,
    pub client_notifications: Vec<InsertClientNotificationEntity>,
}

impl MutationSideEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transaction(mut self, transaction: InsertTransactionEntity) -> Self {
        self.transactions.push(transaction);
        self
    }

    pub fn with_notification(mut self, notification: InsertNotificationEntity) -> Self {
        self.notifications.push(notification);
        self
    }

    pub fn with_client_notification(
        mut self,
        notification: InsertClientNotificationEntity,
    ) -> Self {
        self.client_notifications.push(notification);
        self
    }
}

pub fn audit_record(
    type_: TransactionType,
    actor_id: Uuid,
    facility_id: Uuid,
    entity_id: Option<Uuid>,
    details: serde_json::Value,
) -> InsertTransactionEntity {
    InsertTransactionEntity {
        type_: type_.to_string(),
        actor_id,
        facility_id,
        entity_id,
        target_facility_id: None,
        details,
    }
}

pub fn staff_notification(
    type_: TransactionType,
    actor_id: Uuid,
    facility_id: Uuid,
    entity_id: Option<Uuid>,
    message: String,
) -> InsertNotificationEntity {
    InsertNotificationEntity {
        facility_id,
        actor_id,
        type_: type_.to_string(),
        entity_id,
        message,
    }
}

pub fn client_notification(
    type_: TransactionType,
    user_id: Uuid,
    facility_id: Uuid,
    entity_id: Option<Uuid>,
    replaced_by_id: Option<Uuid>,
    message: String,
) -> InsertClientNotificationEntity {
    InsertClientNotificationEntity {
        user_id,
        facility_id,
        type_: type_.to_string(),
        entity_id,
        replaced_by_id,
        message,
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionDto {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub type_: String,
    pub actor_id: Uuid,
    pub facility_id: Uuid,
    pub entity_id: Option<Uuid>,
    pub target_facility_id: Option<Uuid>,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<TransactionEntity> for TransactionDto {
    fn from(value: TransactionEntity) -> Self {
        Self {
            id: value.id,
            type_: value.type_,
            actor_id: value.actor_id,
            facility_id: value.facility_id,
            entity_id: value.entity_id,
            target_facility_id: value.target_facility_id,
            details: value.details,
            created_at: value.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_type_composes_entity_and_action() {
        assert_eq!(
            TransactionType(EntityKind::Plan, AuditAction::Created).to_string(),
            "plan_created"
        );
        assert_eq!(
            TransactionType(EntityKind::NutritionalPlan, AuditAction::Assigned).to_string(),
            "nutritional_plan_assigned"
        );
        assert_eq!(
            TransactionType(EntityKind::PresetRoutine, AuditAction::Replicated).to_string(),
            "preset_routine_replicated"
        );
    }
}
