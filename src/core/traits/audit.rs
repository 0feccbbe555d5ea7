use crate::core::errors::Result;
use crate::core::models::audit_record::AuditRecord;

/// Port for handing finished audit records to storage.
pub trait AuditSink: Send + Sync {
    /// Persist (or surface) one record.
    fn store(&self, record: &AuditRecord) -> Result<()>;

    /// Whether records end up in persistent storage rather than a log stream.
    fn has_storage(&self) -> bool;
}
