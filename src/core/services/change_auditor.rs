use std::sync::Arc;

use serde_json::Value;

use crate::core::errors::{DocTrailError, Result};
use crate::core::models::audit_record::{Actor, AuditRecord};
use crate::core::services::change_classifier::ChangeClassifier;
use crate::core::services::diff_adapter::DiffAdapter;
use crate::core::services::record_builder::RecordBuilder;
use crate::core::traits::audit::AuditSink;

/// Root-level payload field through which a caller can name the actor of
/// a single operation. It is stripped before diffing.
pub const ACTOR_OVERRIDE_FIELD: &str = "__user";

/// Turns one before/after pair into a stored audit record.
///
/// Needs no document store: both snapshots are supplied by the caller.
pub struct ChangeAuditor {
    subject_type: String,
    diff: DiffAdapter,
    sink: Arc<dyn AuditSink>,
}

impl ChangeAuditor {
    pub fn new(subject_type: impl Into<String>, sink: Arc<dyn AuditSink>) -> Self {
        Self {
            subject_type: subject_type.into(),
            diff: DiffAdapter::default(),
            sink,
        }
    }

    /// Replace the diff adapter (e.g. to change the ignored fields).
    pub fn with_diff_adapter(mut self, diff: DiffAdapter) -> Self {
        self.diff = diff;
        self
    }

    pub fn subject_type(&self) -> &str {
        &self.subject_type
    }

    /// Whether records end up in persistent storage.
    pub fn has_storage(&self) -> bool {
        self.sink.has_storage()
    }

    /// Diff one before/after pair, build its record and store it.
    ///
    /// A root-level `__user` in `current` takes precedence over `actor`.
    /// Returns `Ok(None)` when nothing worth auditing changed. A sink
    /// failure is logged and does not fail the call.
    ///
    /// # Errors
    ///
    /// - `MissingActor` if no actor can be resolved.
    pub fn audit(
        &self,
        original: Option<&Value>,
        current: Option<&Value>,
        action: &str,
        actor: Option<&Actor>,
    ) -> Result<Option<AuditRecord>> {
        let actor = resolve_actor(current, actor)?;
        let current = current.map(without_actor_override);

        let operations = self.diff.compute_changes(original, current.as_ref());
        let changes = ChangeClassifier.classify(&operations, original, current.as_ref());

        let record = RecordBuilder.build(
            current.as_ref(),
            original,
            changes,
            Some(&actor),
            Some(action),
            Some(&self.subject_type),
        )?;

        if let Some(record) = &record {
            self.emit(record);
        }
        Ok(record)
    }

    fn emit(&self, record: &AuditRecord) {
        if let Err(e) = self.sink.store(record) {
            tracing::warn!(
                action = record.action.as_deref().unwrap_or("-"),
                item = %record.subject_id,
                error = %e,
                "could not store audit record"
            );
        }
    }
}

/// Pick the actor for a payload: a non-null root-level `__user` wins over
/// the explicit one.
pub fn resolve_actor(payload: Option<&Value>, explicit: Option<&Actor>) -> Result<Actor> {
    payload
        .and_then(|doc| doc.get(ACTOR_OVERRIDE_FIELD))
        .filter(|actor| !actor.is_null())
        .or(explicit)
        .cloned()
        .ok_or(DocTrailError::MissingActor)
}

pub(crate) fn without_actor_override(document: &Value) -> Value {
    let mut document = document.clone();
    if let Some(fields) = document.as_object_mut() {
        fields.remove(ACTOR_OVERRIDE_FIELD);
    }
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::audit::log_sink::LogSink;
    use crate::adapters::audit::memory_sink::MemorySink;
    use serde_json::json;

    struct FailingSink;

    impl AuditSink for FailingSink {
        fn store(&self, _record: &AuditRecord) -> Result<()> {
            Err(DocTrailError::SinkFailure {
                detail: "disk full".into(),
            })
        }

        fn has_storage(&self) -> bool {
            true
        }
    }

    #[test]
    fn audits_two_snapshots_without_a_store() {
        let sink = Arc::new(MemorySink::new());
        let auditor = ChangeAuditor::new("Ticket", sink.clone());

        let record = auditor
            .audit(
                Some(&json!({"_id": "1", "status": "open"})),
                Some(&json!({"_id": "1", "status": "closed"})),
                "save",
                Some(&json!("alice")),
            )
            .unwrap()
            .unwrap();

        assert_eq!(record.subject_type.as_deref(), Some("Ticket"));
        assert_eq!(record.changes.len(), 1);
        assert_eq!(sink.records(), vec![record]);
    }

    #[test]
    fn absent_original_is_a_new_object() {
        let auditor = ChangeAuditor::new("Ticket", Arc::new(MemorySink::new()));

        let record = auditor
            .audit(None, Some(&json!({"_id": "1"})), "save", Some(&json!("alice")))
            .unwrap()
            .unwrap();
        assert!(record.changes.contains_key("newObject"));
    }

    #[test]
    fn sink_failure_still_returns_the_record() {
        let auditor = ChangeAuditor::new("Ticket", Arc::new(FailingSink));

        let record = auditor
            .audit(Some(&json!({"a": 1})), Some(&json!({"a": 2})), "save", Some(&json!("x")))
            .unwrap();
        assert!(record.is_some());
    }

    #[test]
    fn storage_follows_the_sink() {
        assert!(!ChangeAuditor::new("T", Arc::new(LogSink)).has_storage());
        assert!(ChangeAuditor::new("T", Arc::new(FailingSink)).has_storage());
    }

    #[test]
    fn resolve_actor_prefers_payload() {
        let explicit = json!("svc");
        assert_eq!(
            resolve_actor(Some(&json!({"__user": "me"})), Some(&explicit)).unwrap(),
            json!("me")
        );
        assert_eq!(
            resolve_actor(Some(&json!({"__user": null})), Some(&explicit)).unwrap(),
            explicit
        );
        assert!(resolve_actor(Some(&json!({})), None).is_err());
    }
}
