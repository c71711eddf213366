pub mod assignments;
pub mod audit;
pub mod diaries;
pub mod enums;
pub mod notifications;
pub mod nutritional_plans;
pub mod payments;
pub mod plans;
pub mod replication;
pub mod routines;
