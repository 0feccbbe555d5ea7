pub mod audit_record;
pub mod change_descriptor;
pub mod change_operation;
pub mod lifecycle_event;
