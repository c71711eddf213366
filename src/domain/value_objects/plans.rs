use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::plans::{
    DiaryPlanEntity, InsertDiaryPlanEntity, InsertPlanEntity, PlanEntity,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiaryPlanModel {
    pub activity_id: Uuid,
    pub name: String,
    pub days_of_week: Vec<bool>,
    pub sessions_per_week: i32,
    pub vacancies: i32,
}

impl DiaryPlanModel {
    pub fn into_insert(self, plan_id: Uuid) -> InsertDiaryPlanEntity {
        InsertDiaryPlanEntity {
            plan_id,
            activity_id: self.activity_id,
            name: self.name,
            days_of_week: self.days_of_week,
            sessions_per_week: self.sessions_per_week,
            vacancies: self.vacancies,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertPlanModel {
    pub name: String,
    pub description: String,
    pub price_minor: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
    pub generate_invoice: bool,
    pub payment_type: String,
    pub plan_type: String,
    #[serde(default)]
    pub free_test: bool,
    #[serde(default)]
    pub diary_plans: Vec<DiaryPlanModel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteEntitiesModel {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct DiaryPlanDto {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub name: String,
    pub days_of_week: Vec<bool>,
    pub sessions_per_week: i32,
    pub vacancies: i32,
}

impl From<DiaryPlanEntity> for DiaryPlanDto {
    fn from(value: DiaryPlanEntity) -> Self {
        Self {
            id: value.id,
            activity_id: value.activity_id,
            name: value.name,
            days_of_week: value.days_of_week,
            sessions_per_week: value.sessions_per_week,
            vacancies: value.vacancies,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanDto {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub name: String,
    pub description: String,
    pub price_minor: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
    pub generate_invoice: bool,
    pub payment_type: String,
    pub plan_type: String,
    pub free_test: bool,
    pub is_current: bool,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diary_plans: Vec<DiaryPlanDto>,
}

impl From<PlanEntity> for PlanDto {
    fn from(value: PlanEntity) -> Self {
        Self {
            id: value.id,
            facility_id: value.facility_id,
            name: value.name,
            description: value.description,
            price_minor: value.price_minor,
            start_date: value.start_date,
            end_date: value.end_date,
            expiration_date: value.expiration_date,
            generate_invoice: value.generate_invoice,
            payment_type: value.payment_type,
            plan_type: value.plan_type,
            free_test: value.free_test,
            is_current: value.is_current,
            is_active: value.is_active,
            diary_plans: Vec::new(),
        }
    }
}

/// A plan with its diary-plan slots, as loaded for reads and replication.
#[derive(Debug, Clone)]
pub struct PlanGraph {
    pub plan: PlanEntity,
    pub diary_plans: Vec<DiaryPlanEntity>,
}

impl PlanGraph {
    /// Produces a fresh copy of the graph under the target facility. Ids and
    /// the source facility key are stripped; children become plain models so
    /// the insert path re-parents them to the new plan id.
    pub fn copy_for(&self, target_facility_id: Uuid) -> (InsertPlanEntity, Vec<DiaryPlanModel>) {
        let plan = InsertPlanEntity {
            facility_id: target_facility_id,
            name: self.plan.name.clone(),
            description: self.plan.description.clone(),
            price_minor: self.plan.price_minor,
            start_date: self.plan.start_date,
            end_date: self.plan.end_date,
            expiration_date: self.plan.expiration_date,
            generate_invoice: self.plan.generate_invoice,
            payment_type: self.plan.payment_type.clone(),
            plan_type: self.plan.plan_type.clone(),
            free_test: self.plan.free_test,
            is_current: self.plan.is_current,
            is_active: self.plan.is_active,
        };

        let diary_plans = self
            .diary_plans
            .iter()
            .map(|child| DiaryPlanModel {
                activity_id: child.activity_id,
                name: child.name.clone(),
                days_of_week: child.days_of_week.clone(),
                sessions_per_week: child.sessions_per_week,
                vacancies: child.vacancies,
            })
            .collect();

        (plan, diary_plans)
    }

    pub fn into_dto(self) -> PlanDto {
        let mut dto = PlanDto::from(self.plan);
        dto.diary_plans = self.diary_plans.into_iter().map(DiaryPlanDto::from).collect();
        dto
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> PlanGraph {
        let now = Utc::now();
        let plan_id = Uuid::new_v4();
        PlanGraph {
            plan: PlanEntity {
                id: plan_id,
                facility_id: Uuid::new_v4(),
                name: "Monthly".to_string(),
                description: "Full access".to_string(),
                price_minor: 150_000,
                start_date: now,
                end_date: now,
                expiration_date: now,
                generate_invoice: true,
                payment_type: "CASH".to_string(),
                plan_type: "MEMBERSHIP".to_string(),
                free_test: false,
                is_current: true,
                is_active: true,
                created_at: now,
                updated_at: now,
            },
            diary_plans: vec![DiaryPlanEntity {
                id: Uuid::new_v4(),
                plan_id,
                activity_id: Uuid::new_v4(),
                name: "Spinning".to_string(),
                days_of_week: vec![true, false, true, false, true, false, false],
                sessions_per_week: 3,
                vacancies: 20,
            }],
        }
    }

    #[test]
    fn copy_reparents_to_target_facility_and_drops_ids() {
        let graph = sample_graph();
        let target = Uuid::new_v4();

        let (plan, diary_plans) = graph.copy_for(target);

        assert_eq!(plan.facility_id, target);
        assert_ne!(plan.facility_id, graph.plan.facility_id);
        assert_eq!(plan.name, graph.plan.name);
        assert_eq!(diary_plans.len(), 1);
        assert_eq!(diary_plans[0].name, "Spinning");
    }
}
