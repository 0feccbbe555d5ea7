use std::sync::Arc;

use serde_json::{Map, Value};

use crate::core::errors::{DocTrailError, Result};
use crate::core::models::audit_record::{Actor, AuditRecord};
use crate::core::models::lifecycle_event::{LifecycleEvent, UpdateKind};
use crate::core::services::change_auditor::{ChangeAuditor, resolve_actor, without_actor_override};
use crate::core::services::diff_adapter::DiffAdapter;
use crate::core::traits::audit::AuditSink;
use crate::core::traits::document_store::DocumentStore;

/// Audits lifecycle events of one kind of document.
///
/// For every event the service fetches the before-images it needs from
/// the store and hands each before/after pair to its [`ChangeAuditor`].
/// Auditing never blocks the operation it observes: the only error that
/// leaves the service is `MissingActor`.
pub struct AuditService {
    auditor: ChangeAuditor,
    store: Arc<dyn DocumentStore>,
}

impl AuditService {
    /// Service for documents labelled `subject_type` in audit records.
    pub fn new(
        subject_type: impl Into<String>,
        store: Arc<dyn DocumentStore>,
        sink: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            auditor: ChangeAuditor::new(subject_type, sink),
            store,
        }
    }

    /// Replace the diff adapter (e.g. to change the ignored fields).
    pub fn with_diff_adapter(mut self, diff: DiffAdapter) -> Self {
        self.auditor = self.auditor.with_diff_adapter(diff);
        self
    }

    pub fn subject_type(&self) -> &str {
        self.auditor.subject_type()
    }

    /// Audit `event`, then resume the interrupted operation through `next`.
    ///
    /// `next` is always called. It receives `Err(MissingActor)` when the
    /// event cannot be attributed, `Ok(())` otherwise, including when the
    /// audit itself failed internally.
    pub fn handle<F, R>(&self, event: LifecycleEvent, next: F) -> R
    where
        F: FnOnce(Result<()>) -> R,
    {
        next(self.process(event).map(|_| ()))
    }

    /// Audit `event` and return the records that were handed to the sink.
    ///
    /// # Errors
    ///
    /// - `MissingActor` if neither the event nor the payload names an actor.
    ///   Batches are checked in full before anything is recorded.
    pub fn process(&self, event: LifecycleEvent) -> Result<Vec<AuditRecord>> {
        let action = event.action();
        tracing::debug!(action, subject = %self.subject_type(), "auditing lifecycle event");

        match event {
            LifecycleEvent::Save { document, actor } => {
                let actor = resolve_actor(Some(&document), actor.as_ref())?;
                let original = match document.get("_id") {
                    Some(id) => match self.store.find_by_id(id) {
                        Ok(found) => found,
                        Err(e) => return Ok(self.skip(action, &e)),
                    },
                    None => None,
                };
                self.audit_change(original.as_ref(), Some(&document), action, Some(&actor))
                    .map(Vec::from_iter)
            }
            LifecycleEvent::Update {
                kind,
                conditions,
                update,
                multi,
                actor,
            } => {
                let actor = resolve_actor(None, actor.as_ref())?;
                let stored = match self.store.find(&conditions) {
                    Ok(found) => found,
                    Err(e) => return Ok(self.skip(action, &e)),
                };
                let limit = if multi { usize::MAX } else { 1 };

                let mut records = Vec::new();
                for before in stored.into_iter().take(limit) {
                    let after = match kind {
                        UpdateKind::ReplaceOne => replace_document(&before, &update),
                        _ => apply_update(&before, &update),
                    };
                    records.extend(self.audit_change(
                        Some(&before),
                        Some(&after),
                        action,
                        Some(&actor),
                    )?);
                }
                Ok(records)
            }
            LifecycleEvent::Remove { document, actor } => {
                let actor = resolve_actor(Some(&document), actor.as_ref())?;
                self.audit_removal(document, action, &actor)
                    .map(Vec::from_iter)
            }
            LifecycleEvent::DeleteByQuery {
                kind,
                conditions,
                actor,
            } => {
                let actor = resolve_actor(None, actor.as_ref())?;
                let stored = match self.store.find(&conditions) {
                    Ok(found) => found,
                    Err(e) => return Ok(self.skip(action, &e)),
                };
                let limit = if kind.multi() { usize::MAX } else { 1 };

                let mut records = Vec::new();
                for document in stored.into_iter().take(limit) {
                    records.extend(self.audit_removal(document, action, &actor)?);
                }
                Ok(records)
            }
            LifecycleEvent::Insert { document, actor } => {
                let actor = resolve_actor(Some(&document), actor.as_ref())?;
                self.audit_insertion(document, action, &actor)
                    .map(Vec::from_iter)
            }
            LifecycleEvent::InsertMany { documents, actor } => {
                if documents.is_empty() {
                    resolve_actor(None, actor.as_ref())?;
                }
                let actors = documents
                    .iter()
                    .map(|document| resolve_actor(Some(document), actor.as_ref()))
                    .collect::<Result<Vec<_>>>()?;

                let mut records = Vec::new();
                for (document, actor) in documents.into_iter().zip(actors) {
                    records.extend(self.audit_insertion(document, action, &actor)?);
                }
                Ok(records)
            }
        }
    }

    /// Audit one before/after pair with the service's auditor.
    ///
    /// # Errors
    ///
    /// - `MissingActor` if no actor can be resolved.
    pub fn audit_change(
        &self,
        original: Option<&Value>,
        current: Option<&Value>,
        action: &str,
        actor: Option<&Actor>,
    ) -> Result<Option<AuditRecord>> {
        self.auditor.audit(original, current, action, actor)
    }

    /// Deleted documents are diffed against an identity-only stub, so every
    /// remaining field shows up as a deletion.
    fn audit_removal(
        &self,
        document: Value,
        action: &str,
        actor: &Actor,
    ) -> Result<Option<AuditRecord>> {
        let original = without_actor_override(&document);
        let stub = identity_stub(&original);
        self.audit_change(Some(&original), Some(&stub), action, Some(actor))
    }

    /// Inserted documents are diffed from an identity-only stub, so every
    /// field shows up as an addition.
    fn audit_insertion(
        &self,
        document: Value,
        action: &str,
        actor: &Actor,
    ) -> Result<Option<AuditRecord>> {
        let stub = identity_stub(&document);
        self.audit_change(Some(&stub), Some(&document), action, Some(actor))
    }

    fn skip(&self, action: &str, error: &DocTrailError) -> Vec<AuditRecord> {
        tracing::warn!(
            action,
            subject = %self.subject_type(),
            error = %error,
            "could not load documents to audit"
        );
        Vec::new()
    }
}

fn identity_stub(document: &Value) -> Value {
    let mut stub = Map::new();
    if let Some(id) = document.get("_id") {
        stub.insert("_id".to_string(), id.clone());
    }
    Value::Object(stub)
}

/// Apply an update payload to a stored document.
///
/// Top-level `$`-operators are flattened: `$unset` removes the named
/// fields, every other operator has its fields assigned. Plain fields are
/// assigned as-is. Dotted names (`"address.city"`) address nested fields.
pub fn apply_update(stored: &Value, update: &Value) -> Value {
    let mut document = stored.clone();
    let Some(root) = document.as_object_mut() else {
        return document;
    };
    let Some(update) = update.as_object() else {
        return document;
    };

    for (key, value) in update {
        match (key.as_str(), value.as_object()) {
            ("$unset", Some(fields)) => {
                for name in fields.keys() {
                    unset_path(root, name);
                }
            }
            (operator, Some(fields)) if operator.starts_with('$') => {
                for (name, value) in fields {
                    set_path(root, name, value.clone());
                }
            }
            (operator, None) if operator.starts_with('$') => {}
            _ => set_path(root, key, value.clone()),
        }
    }

    document
}

/// A replacement keeps the stored identity unless it brings its own.
fn replace_document(stored: &Value, replacement: &Value) -> Value {
    let mut document = replacement.clone();
    if let (Some(fields), Some(id)) = (document.as_object_mut(), stored.get("_id")) {
        fields.entry("_id").or_insert_with(|| id.clone());
    }
    document
}

fn set_path(root: &mut Map<String, Value>, dotted: &str, value: Value) {
    let mut parts = dotted.split('.').peekable();
    let mut node = root;

    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            node.insert(part.to_string(), value);
            return;
        }

        let child = node
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !child.is_object() {
            *child = Value::Object(Map::new());
        }
        match child.as_object_mut() {
            Some(next) => node = next,
            None => return,
        }
    }
}

fn unset_path(root: &mut Map<String, Value>, dotted: &str) {
    match dotted.split_once('.') {
        None => {
            root.remove(dotted);
        }
        Some((head, rest)) => {
            if let Some(Value::Object(child)) = root.get_mut(head) {
                unset_path(child, rest);
            }
        }
    }
}
