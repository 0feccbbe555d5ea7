use crate::core::errors::{DocTrailError, Result};
use crate::core::models::audit_record::AuditRecord;
use crate::core::traits::audit::AuditSink;

/// `tracing` target of the records written by [`LogSink`].
pub const AUDIT_TARGET: &str = "doctrail::audit";

/// Sink used when no persistent storage is configured: each record is
/// written to the `tracing` stream at info level for an operator to see.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AuditSink for LogSink {
    fn store(&self, record: &AuditRecord) -> Result<()> {
        let line = serde_json::to_string(record).map_err(|e| DocTrailError::SinkFailure {
            detail: format!("Failed to serialize audit record: {e}"),
        })?;

        tracing::info!(
            target: AUDIT_TARGET,
            action = record.action.as_deref().unwrap_or("-"),
            item = %record.subject_id,
            changes = record.changes.len(),
            "{line}"
        );
        Ok(())
    }

    fn has_storage(&self) -> bool {
        false
    }
}
