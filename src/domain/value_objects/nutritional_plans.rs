use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::nutritional_plans::{
    DailyMealEntity, FoodItemEntity, InsertFoodItemEntity, InsertMealEntity,
    InsertNutritionalPlanEntity, MealEntity, NutritionalPlanEntity,
};
use crate::domain::value_objects::enums::day_of_week::DayOfWeek;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodItemModel {
    pub name: String,
    pub portion: Option<f64>,
    pub unit: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

impl FoodItemModel {
    pub fn into_insert(self, meal_id: Uuid) -> InsertFoodItemEntity {
        InsertFoodItemEntity {
            meal_id,
            name: self.name,
            portion: self.portion,
            unit: self.unit,
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealModel {
    pub meal_type: String,
    pub time: Option<String>,
    pub observations: Option<String>,
    #[serde(default)]
    pub food_items: Vec<FoodItemModel>,
}

impl MealModel {
    pub fn into_insert(self, daily_meal_id: Uuid) -> (InsertMealEntity, Vec<FoodItemModel>) {
        let meal = InsertMealEntity {
            daily_meal_id,
            meal_type: self.meal_type,
            time: self.time,
            observations: self.observations,
        };
        (meal, self.food_items)
    }
}

/// Day-keyed input: only days that carry meals produce daily rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertNutritionalPlanModel {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub daily_meals: BTreeMap<DayOfWeek, Vec<MealModel>>,
}

#[derive(Debug, Serialize)]
pub struct FoodItemDto {
    pub id: Uuid,
    pub name: String,
    pub portion: Option<f64>,
    pub unit: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

impl From<FoodItemEntity> for FoodItemDto {
    fn from(value: FoodItemEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            portion: value.portion,
            unit: value.unit,
            calories: value.calories,
            protein: value.protein,
            carbs: value.carbs,
            fat: value.fat,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MealDto {
    pub id: Uuid,
    pub meal_type: String,
    pub time: Option<String>,
    pub observations: Option<String>,
    pub food_items: Vec<FoodItemDto>,
}

#[derive(Debug, Serialize)]
pub struct NutritionalPlanDto {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub name: String,
    pub description: String,
    pub is_preset: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub daily_meals: BTreeMap<DayOfWeek, Vec<MealDto>>,
}

impl From<NutritionalPlanEntity> for NutritionalPlanDto {
    fn from(value: NutritionalPlanEntity) -> Self {
        Self {
            id: value.id,
            facility_id: value.facility_id,
            name: value.name,
            description: value.description,
            is_preset: value.is_preset,
            daily_meals: BTreeMap::new(),
        }
    }
}

/// A nutritional plan with its daily meals and food items.
#[derive(Debug, Clone)]
pub struct NutritionalPlanGraph {
    pub plan: NutritionalPlanEntity,
    pub days: Vec<(DailyMealEntity, Vec<(MealEntity, Vec<FoodItemEntity>)>)>,
}

/// Aggregate child counts captured by the per-pair replication audit row.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct NutritionCounts {
    pub daily_meals: usize,
    pub meals: usize,
    pub food_items: usize,
}

impl NutritionalPlanGraph {
    pub fn counts(&self) -> NutritionCounts {
        let meals: usize = self.days.iter().map(|(_, meals)| meals.len()).sum();
        let food_items: usize = self
            .days
            .iter()
            .flat_map(|(_, meals)| meals.iter().map(|(_, items)| items.len()))
            .sum();
        NutritionCounts {
            daily_meals: self.days.len(),
            meals,
            food_items,
        }
    }

    pub fn copy_for(
        &self,
        target_facility_id: Uuid,
    ) -> (
        InsertNutritionalPlanEntity,
        BTreeMap<DayOfWeek, Vec<MealModel>>,
    ) {
        let plan = InsertNutritionalPlanEntity {
            facility_id: target_facility_id,
            name: self.plan.name.clone(),
            description: self.plan.description.clone(),
            is_preset: self.plan.is_preset,
        };

        let mut daily_meals = BTreeMap::new();
        for (daily, meals) in &self.days {
            let Some(day_of_week) = DayOfWeek::from_str(&daily.day_of_week) else {
                continue;
            };
            let copies: Vec<MealModel> = meals
                .iter()
                .map(|(meal, items)| MealModel {
                    meal_type: meal.meal_type.clone(),
                    time: meal.time.clone(),
                    observations: meal.observations.clone(),
                    food_items: items
                        .iter()
                        .map(|item| FoodItemModel {
                            name: item.name.clone(),
                            portion: item.portion,
                            unit: item.unit.clone(),
                            calories: item.calories,
                            protein: item.protein,
                            carbs: item.carbs,
                            fat: item.fat,
                        })
                        .collect(),
                })
                .collect();
            daily_meals.insert(day_of_week, copies);
        }

        (plan, daily_meals)
    }

    pub fn into_dto(self) -> NutritionalPlanDto {
        let mut dto = NutritionalPlanDto::from(self.plan);
        for (daily, meals) in self.days {
            let Some(day_of_week) = DayOfWeek::from_str(&daily.day_of_week) else {
                continue;
            };
            dto.daily_meals.insert(
                day_of_week,
                meals
                    .into_iter()
                    .map(|(meal, items)| MealDto {
                        id: meal.id,
                        meal_type: meal.meal_type,
                        time: meal.time,
                        observations: meal.observations,
                        food_items: items.into_iter().map(FoodItemDto::from).collect(),
                    })
                    .collect(),
            );
        }
        dto
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn monday_only_graph() -> NutritionalPlanGraph {
        let now = Utc::now();
        let plan_id = Uuid::new_v4();
        let daily_id = Uuid::new_v4();
        let meal_id = Uuid::new_v4();
        NutritionalPlanGraph {
            plan: NutritionalPlanEntity {
                id: plan_id,
                facility_id: Uuid::new_v4(),
                name: "Cut".to_string(),
                description: "Caloric deficit".to_string(),
                is_preset: false,
                created_at: now,
                updated_at: now,
            },
            days: vec![(
                DailyMealEntity {
                    id: daily_id,
                    nutritional_plan_id: plan_id,
                    day_of_week: "MONDAY".to_string(),
                },
                vec![(
                    MealEntity {
                        id: meal_id,
                        daily_meal_id: daily_id,
                        meal_type: "BREAKFAST".to_string(),
                        time: None,
                        observations: None,
                    },
                    vec![FoodItemEntity {
                        id: Uuid::new_v4(),
                        meal_id,
                        name: "Oats".to_string(),
                        portion: Some(50.0),
                        unit: Some("g".to_string()),
                        calories: None,
                        protein: None,
                        carbs: None,
                        fat: None,
                    }],
                )],
            )],
        }
    }

    #[test]
    fn counts_aggregate_each_child_level() {
        let graph = monday_only_graph();
        assert_eq!(
            graph.counts(),
            NutritionCounts {
                daily_meals: 1,
                meals: 1,
                food_items: 1,
            }
        );
    }

    #[test]
    fn copy_keeps_only_populated_days() {
        let graph = monday_only_graph();
        let target = Uuid::new_v4();

        let (plan, daily_meals) = graph.copy_for(target);

        assert_eq!(plan.facility_id, target);
        assert_eq!(daily_meals.len(), 1);
        let monday = &daily_meals[&DayOfWeek::Monday];
        assert_eq!(monday.len(), 1);
        assert_eq!(monday[0].food_items[0].name, "Oats");
    }
}
