use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::diaries::{
    DayAvailableEntity, DiaryEntity, InsertDayAvailableEntity, InsertDiaryEntity,
    InsertOfferDayEntity, OfferDayEntity,
};
use crate::domain::value_objects::enums::day_of_week::DayOfWeek;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayAvailableModel {
    pub day_of_week: DayOfWeek,
    pub time_start: String,
    pub time_end: String,
    pub available: bool,
}

impl DayAvailableModel {
    pub fn into_insert(self, diary_id: Uuid) -> InsertDayAvailableEntity {
        InsertDayAvailableEntity {
            diary_id,
            day_of_week: self.day_of_week.to_string(),
            time_start: self.time_start,
            time_end: self.time_end,
            available: self.available,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfferDayModel {
    pub day_of_week: DayOfWeek,
    pub is_offer: bool,
    pub discount_percentage: Option<f64>,
}

impl OfferDayModel {
    pub fn into_insert(self, diary_id: Uuid) -> InsertOfferDayEntity {
        InsertOfferDayEntity {
            diary_id,
            day_of_week: self.day_of_week.to_string(),
            is_offer: self.is_offer,
            discount_percentage: self.discount_percentage,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertDiaryModel {
    pub activity_id: Uuid,
    pub name: String,
    pub type_of_schedule: String,
    pub date_from: DateTime<Utc>,
    pub date_until: DateTime<Utc>,
    pub repeat_for: Option<i32>,
    pub term_duration: i32,
    pub amount_of_people: i32,
    pub genre_exclusive: String,
    #[serde(default)]
    pub works_holidays: bool,
    pub observations: Option<String>,
    #[serde(default)]
    pub days_available: Vec<DayAvailableModel>,
    #[serde(default)]
    pub offer_days: Vec<OfferDayModel>,
}

#[derive(Debug, Serialize)]
pub struct DayAvailableDto {
    pub id: Uuid,
    pub day_of_week: String,
    pub time_start: String,
    pub time_end: String,
    pub available: bool,
}

impl From<DayAvailableEntity> for DayAvailableDto {
    fn from(value: DayAvailableEntity) -> Self {
        Self {
            id: value.id,
            day_of_week: value.day_of_week,
            time_start: value.time_start,
            time_end: value.time_end,
            available: value.available,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OfferDayDto {
    pub id: Uuid,
    pub day_of_week: String,
    pub is_offer: bool,
    pub discount_percentage: Option<f64>,
}

impl From<OfferDayEntity> for OfferDayDto {
    fn from(value: OfferDayEntity) -> Self {
        Self {
            id: value.id,
            day_of_week: value.day_of_week,
            is_offer: value.is_offer,
            discount_percentage: value.discount_percentage,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DiaryDto {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub activity_id: Uuid,
    pub name: String,
    pub type_of_schedule: String,
    pub date_from: DateTime<Utc>,
    pub date_until: DateTime<Utc>,
    pub repeat_for: Option<i32>,
    pub term_duration: i32,
    pub amount_of_people: i32,
    pub is_active: bool,
    pub genre_exclusive: String,
    pub works_holidays: bool,
    pub observations: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub days_available: Vec<DayAvailableDto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub offer_days: Vec<OfferDayDto>,
}

impl From<DiaryEntity> for DiaryDto {
    fn from(value: DiaryEntity) -> Self {
        Self {
            id: value.id,
            facility_id: value.facility_id,
            activity_id: value.activity_id,
            name: value.name,
            type_of_schedule: value.type_of_schedule,
            date_from: value.date_from,
            date_until: value.date_until,
            repeat_for: value.repeat_for,
            term_duration: value.term_duration,
            amount_of_people: value.amount_of_people,
            is_active: value.is_active,
            genre_exclusive: value.genre_exclusive,
            works_holidays: value.works_holidays,
            observations: value.observations,
            days_available: Vec::new(),
            offer_days: Vec::new(),
        }
    }
}

/// A diary with its weekly time windows and offer flags.
#[derive(Debug, Clone)]
pub struct DiaryGraph {
    pub diary: DiaryEntity,
    pub days_available: Vec<DayAvailableEntity>,
    pub offer_days: Vec<OfferDayEntity>,
}

impl DiaryGraph {
    pub fn copy_for(
        &self,
        target_facility_id: Uuid,
    ) -> (InsertDiaryEntity, Vec<DayAvailableModel>, Vec<OfferDayModel>) {
        let diary = InsertDiaryEntity {
            facility_id: target_facility_id,
            activity_id: self.diary.activity_id,
            name: self.diary.name.clone(),
            type_of_schedule: self.diary.type_of_schedule.clone(),
            date_from: self.diary.date_from,
            date_until: self.diary.date_until,
            repeat_for: self.diary.repeat_for,
            term_duration: self.diary.term_duration,
            amount_of_people: self.diary.amount_of_people,
            is_active: self.diary.is_active,
            genre_exclusive: self.diary.genre_exclusive.clone(),
            works_holidays: self.diary.works_holidays,
            observations: self.diary.observations.clone(),
        };

        let days_available = self
            .days_available
            .iter()
            .filter_map(|day| {
                DayOfWeek::from_str(&day.day_of_week).map(|day_of_week| DayAvailableModel {
                    day_of_week,
                    time_start: day.time_start.clone(),
                    time_end: day.time_end.clone(),
                    available: day.available,
                })
            })
            .collect();

        let offer_days = self
            .offer_days
            .iter()
            .filter_map(|day| {
                DayOfWeek::from_str(&day.day_of_week).map(|day_of_week| OfferDayModel {
                    day_of_week,
                    is_offer: day.is_offer,
                    discount_percentage: day.discount_percentage,
                })
            })
            .collect();

        (diary, days_available, offer_days)
    }

    pub fn into_dto(self) -> DiaryDto {
        let mut dto = DiaryDto::from(self.diary);
        dto.days_available = self
            .days_available
            .into_iter()
            .map(DayAvailableDto::from)
            .collect();
        dto.offer_days = self.offer_days.into_iter().map(OfferDayDto::from).collect();
        dto
    }
}
