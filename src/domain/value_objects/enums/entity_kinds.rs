use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Every entity family the audit log, the replication engine and the cache
/// invalidator can refer to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Plan,
    Diary,
    Routine,
    PresetRoutine,
    NutritionalPlan,
    PresetNutritionalPlan,
    Payment,
    Invoice,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Plan => "plan",
            EntityKind::Diary => "diary",
            EntityKind::Routine => "routine",
            EntityKind::PresetRoutine => "preset_routine",
            EntityKind::NutritionalPlan => "nutritional_plan",
            EntityKind::PresetNutritionalPlan => "preset_nutritional_plan",
            EntityKind::Payment => "payment",
            EntityKind::Invoice => "invoice",
        }
    }

    /// Preset kinds are template copy sources, never assignable to a user.
    pub fn is_preset(&self) -> bool {
        matches!(
            self,
            EntityKind::PresetRoutine | EntityKind::PresetNutritionalPlan
        )
    }

    pub fn is_replicable(&self) -> bool {
        !matches!(self, EntityKind::Payment | EntityKind::Invoice)
    }

    /// Path key handed to the cache invalidator after a successful mutation.
    pub fn cache_path(&self) -> &'static str {
        match self {
            EntityKind::Plan => "/plans",
            EntityKind::Diary => "/diaries",
            EntityKind::Routine => "/routines",
            EntityKind::PresetRoutine => "/preset-routines",
            EntityKind::NutritionalPlan => "/nutritional-plans",
            EntityKind::PresetNutritionalPlan => "/preset-nutritional-plans",
            EntityKind::Payment => "/payments",
            EntityKind::Invoice => "/invoices",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
