pub mod array_reconciler;
pub mod audit_service;
pub mod change_auditor;
pub mod change_classifier;
pub mod diff_adapter;
pub mod record_builder;
