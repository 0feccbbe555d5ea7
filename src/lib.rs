//! Change detection and audit records for document stores.
//!
//! Given a document before and after a mutation, doctrail works out what
//! changed (added, edited and deleted fields, whole arrays, identity-bearing
//! sub-documents) and turns it into an audit record attributed to an actor.
//!
//! The entry point for persistence hooks is
//! [`AuditService`](core::services::audit_service::AuditService).

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
