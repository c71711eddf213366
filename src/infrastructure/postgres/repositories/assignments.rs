use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{PgConnection, QueryResult, RunQueryDsl, insert_into, prelude::*, update};
use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::assignments::{InsertUserAssignmentEntity, UserAssignmentEntity};
use crate::domain::repositories::assignments::{AssignableEntity, AssignmentRepository};
use crate::domain::value_objects::assignments::{
    AssignmentOutcome, UnassignmentOutcome, partition_assignments,
};
use crate::domain::value_objects::audit::{
    MutationSideEffects, TransactionType, audit_record, client_notification, staff_notification,
};
use crate::domain::value_objects::enums::{
    assignment_categories::AssignmentCategory, audit_actions::AuditAction,
    entity_kinds::EntityKind,
};
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::schema::{
    diaries, nutritional_plans, plans, routines, user_assignments,
};
use crate::infrastructure::postgres::side_effects;

pub struct AssignmentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl AssignmentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn entity_kind(category: AssignmentCategory) -> EntityKind {
    match category {
        AssignmentCategory::Plan => EntityKind::Plan,
        AssignmentCategory::Diary => EntityKind::Diary,
        AssignmentCategory::Routine => EntityKind::Routine,
        AssignmentCategory::NutritionalPlan => EntityKind::NutritionalPlan,
    }
}

fn load_active_for_users(
    conn: &mut PgConnection,
    category: AssignmentCategory,
    facility_id: Uuid,
    user_ids: &[Uuid],
) -> QueryResult<Vec<UserAssignmentEntity>> {
    user_assignments::table
        .filter(user_assignments::category.eq(category.to_string()))
        .filter(user_assignments::facility_id.eq(facility_id))
        .filter(user_assignments::user_id.eq_any(user_ids))
        .filter(user_assignments::is_active.eq(true))
        .select(UserAssignmentEntity::as_select())
        .load::<UserAssignmentEntity>(conn)
}

#[async_trait]
impl AssignmentRepository for AssignmentPostgres {
    async fn find_assignable(
        &self,
        category: AssignmentCategory,
        entity_id: Uuid,
        facility_id: Uuid,
    ) -> Result<Option<AssignableEntity>> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Option<AssignableEntity>> {
            let mut conn = pool.get()?;
            let found = match category {
                AssignmentCategory::Plan => plans::table
                    .filter(plans::id.eq(entity_id))
                    .filter(plans::facility_id.eq(facility_id))
                    .select((plans::id, plans::name))
                    .first::<(Uuid, String)>(&mut conn)
                    .optional()?
                    .map(|(id, name)| AssignableEntity {
                        id,
                        name,
                        is_preset: false,
                    }),
                AssignmentCategory::Diary => diaries::table
                    .filter(diaries::id.eq(entity_id))
                    .filter(diaries::facility_id.eq(facility_id))
                    .select((diaries::id, diaries::name))
                    .first::<(Uuid, String)>(&mut conn)
                    .optional()?
                    .map(|(id, name)| AssignableEntity {
                        id,
                        name,
                        is_preset: false,
                    }),
                AssignmentCategory::Routine => routines::table
                    .filter(routines::id.eq(entity_id))
                    .filter(routines::facility_id.eq(facility_id))
                    .select((routines::id, routines::name, routines::is_preset))
                    .first::<(Uuid, String, bool)>(&mut conn)
                    .optional()?
                    .map(|(id, name, is_preset)| AssignableEntity {
                        id,
                        name,
                        is_preset,
                    }),
                AssignmentCategory::NutritionalPlan => nutritional_plans::table
                    .filter(nutritional_plans::id.eq(entity_id))
                    .filter(nutritional_plans::facility_id.eq(facility_id))
                    .select((
                        nutritional_plans::id,
                        nutritional_plans::name,
                        nutritional_plans::is_preset,
                    ))
                    .first::<(Uuid, String, bool)>(&mut conn)
                    .optional()?
                    .map(|(id, name, is_preset)| AssignableEntity {
                        id,
                        name,
                        is_preset,
                    }),
            };
            Ok(found)
        })
        .await?
    }

    async fn assign(
        &self,
        category: AssignmentCategory,
        entity_id: Uuid,
        entity_name: String,
        facility_id: Uuid,
        user_ids: Vec<Uuid>,
        actor_id: Uuid,
    ) -> Result<AssignmentOutcome> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<AssignmentOutcome> {
            let mut conn = pool.get()?;
            let outcome = conn.transaction::<AssignmentOutcome, diesel::result::Error, _>(|tx| {
                let active = load_active_for_users(tx, category, facility_id, &user_ids)?;
                let changes = partition_assignments(category, entity_id, &user_ids, &active);
                let now = Utc::now();

                let mut effects = MutationSideEffects::new();

                // Conflicting active rows go inactive first, recording the
                // successor entity.
                for group in &changes.conflicts {
                    update(user_assignments::table)
                        .filter(user_assignments::category.eq(category.to_string()))
                        .filter(user_assignments::entity_id.eq(group.previous_entity_id))
                        .filter(user_assignments::user_id.eq_any(&group.user_ids))
                        .filter(user_assignments::is_active.eq(true))
                        .set((
                            user_assignments::is_active.eq(false),
                            user_assignments::end_date.eq(Some(now)),
                            user_assignments::replaced_by.eq(Some(entity_id)),
                        ))
                        .execute(tx)?;

                    let type_ = TransactionType(entity_kind(category), AuditAction::Unassigned);
                    effects = effects
                        .with_transaction(audit_record(
                            type_,
                            actor_id,
                            facility_id,
                            Some(group.previous_entity_id),
                            json!({
                                "replaced_by": entity_id,
                                "user_ids": group.user_ids,
                            }),
                        ))
                        .with_notification(staff_notification(
                            type_,
                            actor_id,
                            facility_id,
                            Some(group.previous_entity_id),
                            format!(
                                "{} user(s) were moved off a replaced {}",
                                group.user_ids.len(),
                                category
                            ),
                        ));
                    for &user_id in &group.user_ids {
                        effects = effects.with_client_notification(client_notification(
                            type_,
                            user_id,
                            facility_id,
                            Some(group.previous_entity_id),
                            Some(entity_id),
                            format!("Your {} was replaced by \"{}\"", category, entity_name),
                        ));
                    }
                }

                if !changes.to_assign.is_empty() {
                    let rows: Vec<InsertUserAssignmentEntity> = changes
                        .to_assign
                        .iter()
                        .map(|&user_id| InsertUserAssignmentEntity {
                            category: category.to_string(),
                            entity_id,
                            user_id,
                            facility_id,
                            is_active: true,
                            start_date: now,
                        })
                        .collect();
                    insert_into(user_assignments::table)
                        .values(&rows)
                        .on_conflict_do_nothing()
                        .execute(tx)?;

                    let type_ = TransactionType(entity_kind(category), AuditAction::Assigned);
                    effects = effects
                        .with_transaction(audit_record(
                            type_,
                            actor_id,
                            facility_id,
                            Some(entity_id),
                            json!({
                                "entity": entity_name,
                                "user_ids": changes.to_assign,
                            }),
                        ))
                        .with_notification(staff_notification(
                            type_,
                            actor_id,
                            facility_id,
                            Some(entity_id),
                            format!(
                                "{} user(s) were assigned to \"{}\"",
                                changes.to_assign.len(),
                                entity_name
                            ),
                        ));
                    for &user_id in &changes.to_assign {
                        effects = effects.with_client_notification(client_notification(
                            type_,
                            user_id,
                            facility_id,
                            Some(entity_id),
                            None,
                            format!("You were assigned to \"{}\"", entity_name),
                        ));
                    }
                }

                side_effects::apply(tx, &effects)?;

                Ok(AssignmentOutcome {
                    assigned: changes.to_assign,
                    already_assigned: changes.already_assigned,
                    replaced: changes.conflicts,
                })
            })?;
            Ok(outcome)
        })
        .await?
    }

    async fn unassign(
        &self,
        category: AssignmentCategory,
        entity_id: Uuid,
        entity_name: String,
        facility_id: Uuid,
        user_ids: Vec<Uuid>,
        actor_id: Uuid,
    ) -> Result<UnassignmentOutcome> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<UnassignmentOutcome> {
            let mut conn = pool.get()?;
            let outcome =
                conn.transaction::<UnassignmentOutcome, diesel::result::Error, _>(|tx| {
                    let active: Vec<Uuid> = user_assignments::table
                        .filter(user_assignments::category.eq(category.to_string()))
                        .filter(user_assignments::entity_id.eq(entity_id))
                        .filter(user_assignments::facility_id.eq(facility_id))
                        .filter(user_assignments::user_id.eq_any(&user_ids))
                        .filter(user_assignments::is_active.eq(true))
                        .select(user_assignments::user_id)
                        .load::<Uuid>(tx)?;

                    let not_assigned: Vec<Uuid> = user_ids
                        .iter()
                        .copied()
                        .filter(|user_id| !active.contains(user_id))
                        .collect();

                    if active.is_empty() {
                        return Ok(UnassignmentOutcome {
                            unassigned: active,
                            not_assigned,
                        });
                    }

                    let now = Utc::now();
                    update(user_assignments::table)
                        .filter(user_assignments::category.eq(category.to_string()))
                        .filter(user_assignments::entity_id.eq(entity_id))
                        .filter(user_assignments::user_id.eq_any(&active))
                        .filter(user_assignments::is_active.eq(true))
                        .set((
                            user_assignments::is_active.eq(false),
                            user_assignments::end_date.eq(Some(now)),
                        ))
                        .execute(tx)?;

                    let type_ = TransactionType(entity_kind(category), AuditAction::Unassigned);
                    let mut effects = MutationSideEffects::new()
                        .with_transaction(audit_record(
                            type_,
                            actor_id,
                            facility_id,
                            Some(entity_id),
                            json!({ "entity": entity_name, "user_ids": active }),
                        ))
                        .with_notification(staff_notification(
                            type_,
                            actor_id,
                            facility_id,
                            Some(entity_id),
                            format!(
                                "{} user(s) were unassigned from \"{}\"",
                                active.len(),
                                entity_name
                            ),
                        ));
                    for &user_id in &active {
                        effects = effects.with_client_notification(client_notification(
                            type_,
                            user_id,
                            facility_id,
                            Some(entity_id),
                            None,
                            format!("You were unassigned from \"{}\"", entity_name),
                        ));
                    }
                    side_effects::apply(tx, &effects)?;

                    Ok(UnassignmentOutcome {
                        unassigned: active,
                        not_assigned,
                    })
                })?;
            Ok(outcome)
        })
        .await?
    }

    async fn list_active_for_entity(
        &self,
        category: AssignmentCategory,
        entity_id: Uuid,
        facility_id: Uuid,
    ) -> Result<Vec<UserAssignmentEntity>> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Vec<UserAssignmentEntity>> {
            let mut conn = pool.get()?;
            let rows = user_assignments::table
                .filter(user_assignments::category.eq(category.to_string()))
                .filter(user_assignments::entity_id.eq(entity_id))
                .filter(user_assignments::facility_id.eq(facility_id))
                .filter(user_assignments::is_active.eq(true))
                .order(user_assignments::start_date.desc())
                .select(UserAssignmentEntity::as_select())
                .load::<UserAssignmentEntity>(&mut conn)?;
            Ok(rows)
        })
        .await?
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<UserAssignmentEntity>> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Vec<UserAssignmentEntity>> {
            let mut conn = pool.get()?;
            let rows = user_assignments::table
                .filter(user_assignments::user_id.eq(user_id))
                .filter(user_assignments::is_active.eq(true))
                .order(user_assignments::start_date.desc())
                .select(UserAssignmentEntity::as_select())
                .load::<UserAssignmentEntity>(&mut conn)?;
            Ok(rows)
        })
        .await?
    }
}
