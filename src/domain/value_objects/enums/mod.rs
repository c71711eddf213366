pub mod assignment_categories;
pub mod audit_actions;
pub mod day_of_week;
pub mod entity_kinds;
pub mod invoice_statuses;
pub mod payment_statuses;
