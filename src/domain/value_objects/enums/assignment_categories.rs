use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The four assignable entity families, persisted as the `category` column of
/// `user_assignments`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentCategory {
    Plan,
    Diary,
    Routine,
    NutritionalPlan,
}

impl AssignmentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentCategory::Plan => "plan",
            AssignmentCategory::Diary => "diary",
            AssignmentCategory::Routine => "routine",
            AssignmentCategory::NutritionalPlan => "nutritional_plan",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "plan" => Some(AssignmentCategory::Plan),
            "diary" => Some(AssignmentCategory::Diary),
            "routine" => Some(AssignmentCategory::Routine),
            "nutritional_plan" => Some(AssignmentCategory::NutritionalPlan),
            _ => None,
        }
    }

    /// Exclusive categories allow at most one active assignment per user;
    /// diaries are not exclusive (a member may attend several classes).
    pub fn is_exclusive(&self) -> bool {
        !matches!(self, AssignmentCategory::Diary)
    }
}

impl Display for AssignmentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
