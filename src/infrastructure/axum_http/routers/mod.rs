pub mod assignments;
pub mod diaries;
pub mod invoices;
pub mod notifications;
pub mod nutritional_plans;
pub mod payments;
pub mod plans;
pub mod replication;
pub mod routines;
pub mod transactions;
