pub mod ledger;
pub mod leave_workflow;
pub mod reports;
pub mod slot_registry;
