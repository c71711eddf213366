use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{PgConnection, QueryResult, RunQueryDsl, prelude::*};
use serde_json::json;
use uuid::Uuid;

use crate::domain::repositories::replication::ReplicationRepository;
use crate::domain::value_objects::audit::{
    MutationSideEffects, TransactionType, audit_record, staff_notification,
};
use crate::domain::value_objects::enums::{
    audit_actions::AuditAction, entity_kinds::EntityKind,
};
use crate::domain::value_objects::replication::ReplicaRecord;
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::repositories::{
    diaries::{insert_diary_graph, load_diary_graph},
    nutritional_plans::{insert_nutritional_plan_graph, load_nutritional_plan_graph},
    plans::{insert_plan_graph, load_plan_graph},
    routines::{insert_routine_graph, load_routine_graph},
};
use crate::infrastructure::postgres::side_effects;

pub struct ReplicationPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ReplicationPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

/// Copies one source graph into one target facility and reports the new root
/// id plus the child counts recorded by the audit row.
fn replicate_one(
    conn: &mut PgConnection,
    kind: EntityKind,
    source_id: Uuid,
    source_facility_id: Uuid,
    target_facility_id: Uuid,
) -> QueryResult<(Uuid, serde_json::Value)> {
    match kind {
        EntityKind::Plan => {
            let graph = load_plan_graph(conn, source_id, source_facility_id)?
                .ok_or(diesel::result::Error::NotFound)?;
            let (plan, slots) = graph.copy_for(target_facility_id);
            let new_id = insert_plan_graph(conn, &plan, slots)?;
            Ok((new_id, json!({ "diary_plans": graph.diary_plans.len() })))
        }
        EntityKind::Diary => {
            let graph = load_diary_graph(conn, source_id, source_facility_id)?
                .ok_or(diesel::result::Error::NotFound)?;
            let (diary, days, offers) = graph.copy_for(target_facility_id);
            let new_id = insert_diary_graph(conn, &diary, days, offers)?;
            Ok((
                new_id,
                json!({
                    "days_available": graph.days_available.len(),
                    "offer_days": graph.offer_days.len(),
                }),
            ))
        }
        EntityKind::Routine | EntityKind::PresetRoutine => {
            let graph = load_routine_graph(conn, source_id, source_facility_id)?
                .filter(|graph| graph.routine.is_preset == kind.is_preset())
                .ok_or(diesel::result::Error::NotFound)?;
            let (routine, days) = graph.copy_for(target_facility_id);
            let new_id = insert_routine_graph(conn, &routine, days)?;
            Ok((
                new_id,
                json!({
                    "daily_exercises": graph.days.len(),
                    "exercises": graph.exercise_count(),
                }),
            ))
        }
        EntityKind::NutritionalPlan | EntityKind::PresetNutritionalPlan => {
            let graph = load_nutritional_plan_graph(conn, source_id, source_facility_id)?
                .filter(|graph| graph.plan.is_preset == kind.is_preset())
                .ok_or(diesel::result::Error::NotFound)?;
            let (plan, days) = graph.copy_for(target_facility_id);
            let new_id = insert_nutritional_plan_graph(conn, &plan, days)?;
            Ok((new_id, json!(graph.counts())))
        }
        // The use case rejects these before reaching the repository.
        EntityKind::Payment | EntityKind::Invoice => {
            Err(diesel::result::Error::RollbackTransaction)
        }
    }
}

#[async_trait]
impl ReplicationRepository for ReplicationPostgres {
    async fn replicate(
        &self,
        kind: EntityKind,
        source_ids: Vec<Uuid>,
        source_facility_id: Uuid,
        target_facility_ids: Vec<Uuid>,
        actor_id: Uuid,
    ) -> Result<Vec<ReplicaRecord>> {
        let pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> Result<Vec<ReplicaRecord>> {
            let mut conn = pool.get()?;
            let replicas = conn
                .build_transaction()
                .serializable()
                .run::<_, diesel::result::Error, _>(|tx| {
                    diesel::sql_query("SET LOCAL statement_timeout = '30s'").execute(tx)?;

                    let type_ = TransactionType(kind, AuditAction::Replicated);
                    let mut effects = MutationSideEffects::new();
                    let mut replicas = Vec::new();

                    for &source_id in &source_ids {
                        for &target_facility_id in &target_facility_ids {
                            let (new_entity_id, counts) = replicate_one(
                                tx,
                                kind,
                                source_id,
                                source_facility_id,
                                target_facility_id,
                            )?;

                            let mut record = audit_record(
                                type_,
                                actor_id,
                                source_facility_id,
                                Some(source_id),
                                json!({
                                    "new_entity_id": new_entity_id,
                                    "children": counts,
                                }),
                            );
                            record.target_facility_id = Some(target_facility_id);
                            effects = effects.with_transaction(record);

                            replicas.push(ReplicaRecord {
                                source_id,
                                target_facility_id,
                                new_entity_id,
                            });
                        }
                    }

                    // One digest notification per target facility.
                    for &target_facility_id in &target_facility_ids {
                        effects = effects.with_notification(staff_notification(
                            type_,
                            actor_id,
                            target_facility_id,
                            None,
                            format!(
                                "{} {} record(s) were replicated into this facility",
                                source_ids.len(),
                                kind
                            ),
                        ));
                    }

                    side_effects::apply(tx, &effects)?;
                    Ok(replicas)
                })?;
            Ok(replicas)
        })
        .await?
    }
}
