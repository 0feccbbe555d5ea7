use chrono::Utc;
use serde_json::{Map, Value};

use crate::core::errors::{DocTrailError, Result};
use crate::core::models::audit_record::{Actor, AuditRecord};
use crate::core::models::change_descriptor::ChangeMap;

/// Assembles audit records from a classified change map.
pub struct RecordBuilder;

impl RecordBuilder {
    /// Build the audit record for one mutation.
    ///
    /// # Errors
    ///
    /// - `MissingActor` if `actor` is `None`, whether or not anything changed.
    ///
    /// Returns `Ok(None)` when `changes` is empty: nothing worth recording.
    pub fn build(
        &self,
        current: Option<&Value>,
        original: Option<&Value>,
        changes: ChangeMap,
        actor: Option<&Actor>,
        action: Option<&str>,
        subject_type: Option<&str>,
    ) -> Result<Option<AuditRecord>> {
        let actor = actor.ok_or(DocTrailError::MissingActor)?;

        if changes.is_empty() {
            return Ok(None);
        }

        let subject_id = current
            .and_then(|doc| doc.get("_id"))
            .cloned()
            .unwrap_or(Value::Null);

        Ok(Some(AuditRecord {
            subject_id,
            subject_type: subject_type.map(str::to_string),
            action: action.map(str::to_string),
            changes,
            original_document: original
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new())),
            actor: actor.clone(),
            recorded_at: Utc::now(),
        }))
    }
}
