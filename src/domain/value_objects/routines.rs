use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::routines::{
    DailyExerciseEntity, ExerciseEntity, InsertExerciseEntity, InsertRoutineEntity, RoutineEntity,
};
use crate::domain::value_objects::enums::day_of_week::DayOfWeek;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExerciseModel {
    pub name: String,
    pub body_zone: String,
    pub series: i32,
    pub count: i32,
    pub measure: Option<String>,
    pub rest: Option<i32>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
}

impl ExerciseModel {
    pub fn into_insert(self, daily_exercise_id: Uuid) -> InsertExerciseEntity {
        InsertExerciseEntity {
            daily_exercise_id,
            name: self.name,
            body_zone: self.body_zone,
            series: self.series,
            count: self.count,
            measure: self.measure,
            rest: self.rest,
            description: self.description,
            photo_url: self.photo_url,
        }
    }
}

/// Day-keyed input: only days that carry exercises produce daily rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertRoutineModel {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub daily_exercises: BTreeMap<DayOfWeek, Vec<ExerciseModel>>,
}

#[derive(Debug, Serialize)]
pub struct ExerciseDto {
    pub id: Uuid,
    pub name: String,
    pub body_zone: String,
    pub series: i32,
    pub count: i32,
    pub measure: Option<String>,
    pub rest: Option<i32>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
}

impl From<ExerciseEntity> for ExerciseDto {
    fn from(value: ExerciseEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            body_zone: value.body_zone,
            series: value.series,
            count: value.count,
            measure: value.measure,
            rest: value.rest,
            description: value.description,
            photo_url: value.photo_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoutineDto {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub name: String,
    pub description: String,
    pub is_preset: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub daily_exercises: BTreeMap<DayOfWeek, Vec<ExerciseDto>>,
}

impl From<RoutineEntity> for RoutineDto {
    fn from(value: RoutineEntity) -> Self {
        Self {
            id: value.id,
            facility_id: value.facility_id,
            name: value.name,
            description: value.description,
            is_preset: value.is_preset,
            daily_exercises: BTreeMap::new(),
        }
    }
}

/// A routine with its per-day exercise lists, as loaded for reads and
/// replication.
#[derive(Debug, Clone)]
pub struct RoutineGraph {
    pub routine: RoutineEntity,
    pub days: Vec<(DailyExerciseEntity, Vec<ExerciseEntity>)>,
}

impl RoutineGraph {
    pub fn exercise_count(&self) -> usize {
        self.days.iter().map(|(_, exercises)| exercises.len()).sum()
    }

    pub fn copy_for(
        &self,
        target_facility_id: Uuid,
    ) -> (InsertRoutineEntity, BTreeMap<DayOfWeek, Vec<ExerciseModel>>) {
        let routine = InsertRoutineEntity {
            facility_id: target_facility_id,
            name: self.routine.name.clone(),
            description: self.routine.description.clone(),
            is_preset: self.routine.is_preset,
        };

        let mut daily_exercises = BTreeMap::new();
        for (daily, exercises) in &self.days {
            let Some(day_of_week) = DayOfWeek::from_str(&daily.day_of_week) else {
                continue;
            };
            let copies: Vec<ExerciseModel> = exercises
                .iter()
                .map(|exercise| ExerciseModel {
                    name: exercise.name.clone(),
                    body_zone: exercise.body_zone.clone(),
                    series: exercise.series,
                    count: exercise.count,
                    measure: exercise.measure.clone(),
                    rest: exercise.rest,
                    description: exercise.description.clone(),
                    photo_url: exercise.photo_url.clone(),
                })
                .collect();
            daily_exercises.insert(day_of_week, copies);
        }

        (routine, daily_exercises)
    }

    pub fn into_dto(self) -> RoutineDto {
        let mut dto = RoutineDto::from(self.routine);
        for (daily, exercises) in self.days {
            if let Some(day_of_week) = DayOfWeek::from_str(&daily.day_of_week) {
                dto.daily_exercises
                    .insert(day_of_week, exercises.into_iter().map(ExerciseDto::from).collect());
            }
        }
        dto
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_graph() -> RoutineGraph {
        let now = Utc::now();
        let routine_id = Uuid::new_v4();
        let daily_id = Uuid::new_v4();
        RoutineGraph {
            routine: RoutineEntity {
                id: routine_id,
                facility_id: Uuid::new_v4(),
                name: "Push day".to_string(),
                description: "Chest and triceps".to_string(),
                is_preset: false,
                created_at: now,
                updated_at: now,
            },
            days: vec![(
                DailyExerciseEntity {
                    id: daily_id,
                    routine_id,
                    day_of_week: "MONDAY".to_string(),
                },
                vec![ExerciseEntity {
                    id: Uuid::new_v4(),
                    daily_exercise_id: daily_id,
                    name: "Bench press".to_string(),
                    body_zone: "chest".to_string(),
                    series: 4,
                    count: 8,
                    measure: Some("kg".to_string()),
                    rest: Some(90),
                    description: None,
                    photo_url: None,
                }],
            )],
        }
    }

    #[test]
    fn copy_strips_ids_and_keeps_day_structure() {
        let graph = sample_graph();
        let target = Uuid::new_v4();

        let (routine, days) = graph.copy_for(target);

        assert_eq!(routine.facility_id, target);
        assert_eq!(days.len(), 1);
        assert_eq!(days[&DayOfWeek::Monday].len(), 1);
        assert_eq!(days[&DayOfWeek::Monday][0].name, "Bench press");
        assert_eq!(graph.exercise_count(), 1);
    }
}
