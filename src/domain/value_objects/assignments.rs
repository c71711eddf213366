use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::assignments::UserAssignmentEntity;
use crate::domain::value_objects::enums::assignment_categories::AssignmentCategory;

#[derive(Debug, Clone, Deserialize)]
pub struct AssignModel {
    pub category: AssignmentCategory,
    pub entity_id: Uuid,
    pub user_ids: Vec<Uuid>,
}

/// Users whose active assignment to `previous_entity_id` is replaced by the
/// target entity.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConflictGroup {
    pub previous_entity_id: Uuid,
    pub user_ids: Vec<Uuid>,
}

/// How a set of requested user ids splits against the active assignments in
/// the same category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentChanges {
    /// Already hold an active row for the target entity; nothing to do.
    pub already_assigned: Vec<Uuid>,
    /// Hold an active row for a different entity; soft-unassigned first.
    pub conflicts: Vec<ConflictGroup>,
    /// Get a fresh active row.
    pub to_assign: Vec<Uuid>,
}

/// Splits the requested users against their currently active assignments.
/// Conflicts only arise in exclusive categories; a user never ends up in
/// both `conflicts` and `already_assigned`.
pub fn partition_assignments(
    category: AssignmentCategory,
    entity_id: Uuid,
    user_ids: &[Uuid],
    active: &[UserAssignmentEntity],
) -> AssignmentChanges {
    let mut changes = AssignmentChanges::default();
    let mut conflicts: BTreeMap<Uuid, Vec<Uuid>> = BTreeMap::new();

    for &user_id in user_ids {
        let held = active
            .iter()
            .filter(|row| row.user_id == user_id && row.is_active)
            .collect::<Vec<_>>();

        if held.iter().any(|row| row.entity_id == entity_id) {
            changes.already_assigned.push(user_id);
            continue;
        }

        if category.is_exclusive() {
            for row in &held {
                conflicts.entry(row.entity_id).or_default().push(user_id);
            }
        }

        changes.to_assign.push(user_id);
    }

    changes.conflicts = conflicts
        .into_iter()
        .map(|(previous_entity_id, user_ids)| ConflictGroup {
            previous_entity_id,
            user_ids,
        })
        .collect();

    changes
}

#[derive(Debug, Serialize, Default)]
pub struct AssignmentOutcome {
    pub assigned: Vec<Uuid>,
    pub already_assigned: Vec<Uuid>,
    pub replaced: Vec<ConflictGroup>,
}

#[derive(Debug, Serialize, Default)]
pub struct UnassignmentOutcome {
    pub unassigned: Vec<Uuid>,
    pub not_assigned: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct UserAssignmentDto {
    pub id: Uuid,
    pub category: String,
    pub entity_id: Uuid,
    pub user_id: Uuid,
    pub facility_id: Uuid,
    pub is_active: bool,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub replaced_by: Option<Uuid>,
}

impl From<UserAssignmentEntity> for UserAssignmentDto {
    fn from(value: UserAssignmentEntity) -> Self {
        Self {
            id: value.id,
            category: value.category,
            entity_id: value.entity_id,
            user_id: value.user_id,
            facility_id: value.facility_id,
            is_active: value.is_active,
            start_date: value.start_date,
            end_date: value.end_date,
            replaced_by: value.replaced_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_row(
        category: AssignmentCategory,
        entity_id: Uuid,
        user_id: Uuid,
    ) -> UserAssignmentEntity {
        let now = Utc::now();
        UserAssignmentEntity {
            id: Uuid::new_v4(),
            category: category.to_string(),
            entity_id,
            user_id,
            facility_id: Uuid::new_v4(),
            is_active: true,
            start_date: now,
            end_date: None,
            replaced_by: None,
            created_at: now,
        }
    }

    #[test]
    fn holder_of_a_different_entity_becomes_a_conflict() {
        let target = Uuid::new_v4();
        let previous = Uuid::new_v4();
        let user = Uuid::new_v4();
        let active = vec![active_row(AssignmentCategory::Routine, previous, user)];

        let changes =
            partition_assignments(AssignmentCategory::Routine, target, &[user], &active);

        assert_eq!(changes.to_assign, vec![user]);
        assert_eq!(
            changes.conflicts,
            vec![ConflictGroup {
                previous_entity_id: previous,
                user_ids: vec![user],
            }]
        );
        assert!(changes.already_assigned.is_empty());
    }

    #[test]
    fn holder_of_the_target_entity_is_a_no_op() {
        let target = Uuid::new_v4();
        let user = Uuid::new_v4();
        let active = vec![active_row(AssignmentCategory::Plan, target, user)];

        let changes = partition_assignments(AssignmentCategory::Plan, target, &[user], &active);

        assert_eq!(changes.already_assigned, vec![user]);
        assert!(changes.to_assign.is_empty());
        assert!(changes.conflicts.is_empty());
    }

    #[test]
    fn conflicts_group_all_affected_users_per_entity() {
        let target = Uuid::new_v4();
        let previous = Uuid::new_v4();
        let user_a = Uuid::new_v4();
        let user_b = Uuid::new_v4();
        let active = vec![
            active_row(AssignmentCategory::NutritionalPlan, previous, user_a),
            active_row(AssignmentCategory::NutritionalPlan, previous, user_b),
        ];

        let changes = partition_assignments(
            AssignmentCategory::NutritionalPlan,
            target,
            &[user_a, user_b],
            &active,
        );

        assert_eq!(changes.conflicts.len(), 1);
        assert_eq!(changes.conflicts[0].previous_entity_id, previous);
        assert_eq!(changes.conflicts[0].user_ids.len(), 2);
        assert_eq!(changes.to_assign.len(), 2);
    }

    #[test]
    fn diary_assignments_never_conflict() {
        let target = Uuid::new_v4();
        let other_class = Uuid::new_v4();
        let user = Uuid::new_v4();
        let active = vec![active_row(AssignmentCategory::Diary, other_class, user)];

        let changes = partition_assignments(AssignmentCategory::Diary, target, &[user], &active);

        assert!(changes.conflicts.is_empty());
        assert_eq!(changes.to_assign, vec![user]);
    }

    #[test]
    fn unknown_user_is_simply_assigned() {
        let target = Uuid::new_v4();
        let user = Uuid::new_v4();

        let changes = partition_assignments(AssignmentCategory::Plan, target, &[user], &[]);

        assert_eq!(changes.to_assign, vec![user]);
        assert!(changes.conflicts.is_empty());
        assert!(changes.already_assigned.is_empty());
    }
}
