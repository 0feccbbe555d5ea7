use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::core::errors::Result;
use crate::core::models::audit_record::AuditRecord;
use crate::core::traits::audit::AuditSink;

/// In-memory sink that keeps every stored record, in store order.
///
/// Useful for embedding callers that forward records themselves, and for
/// tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored records.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove and return all stored records.
    pub fn drain(&self) -> Vec<AuditRecord> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<AuditRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AuditSink for MemorySink {
    fn store(&self, record: &AuditRecord) -> Result<()> {
        self.lock().push(record.clone());
        Ok(())
    }

    fn has_storage(&self) -> bool {
        true
    }
}
