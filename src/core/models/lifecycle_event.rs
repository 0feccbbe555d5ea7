use serde_json::Value;

use crate::core::models::audit_record::Actor;

/// The update flavours a document store can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    Update,
    UpdateOne,
    FindOneAndUpdate,
    UpdateMany,
    ReplaceOne,
}

impl UpdateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::UpdateOne => "updateOne",
            Self::FindOneAndUpdate => "findOneAndUpdate",
            Self::UpdateMany => "updateMany",
            Self::ReplaceOne => "replaceOne",
        }
    }

    /// Whether every matching document is affected by default.
    /// Plain `update` is single-document unless the caller asks otherwise.
    pub fn default_multi(&self) -> bool {
        matches!(self, Self::UpdateMany)
    }
}

/// Query-driven delete flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteKind {
    FindOneAndDelete,
    FindOneAndRemove,
    DeleteMany,
}

impl DeleteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FindOneAndDelete => "findOneAndDelete",
            Self::FindOneAndRemove => "findOneAndRemove",
            Self::DeleteMany => "deleteMany",
        }
    }

    pub fn multi(&self) -> bool {
        matches!(self, Self::DeleteMany)
    }
}

/// A persistence-layer event about to mutate one or more documents.
///
/// `actor` is who performs the mutation; `None` means no actor was supplied,
/// which the audit service rejects with `MissingActor`.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    /// A document is saved (created or replaced in full).
    Save {
        document: Value,
        actor: Option<Actor>,
    },
    /// An update query: `update` may use `$`-operators such as `$set`.
    Update {
        kind: UpdateKind,
        conditions: Value,
        update: Value,
        multi: bool,
        actor: Option<Actor>,
    },
    /// A loaded document is removed.
    Remove {
        document: Value,
        actor: Option<Actor>,
    },
    /// Documents matching `conditions` are removed.
    DeleteByQuery {
        kind: DeleteKind,
        conditions: Value,
        actor: Option<Actor>,
    },
    /// A single document is inserted.
    Insert {
        document: Value,
        actor: Option<Actor>,
    },
    /// A batch of documents is inserted.
    InsertMany {
        documents: Vec<Value>,
        actor: Option<Actor>,
    },
}

impl LifecycleEvent {
    /// Build an update event with the kind's default `multi` flag.
    pub fn update(kind: UpdateKind, conditions: Value, update: Value, actor: Option<Actor>) -> Self {
        Self::Update {
            kind,
            conditions,
            update,
            multi: kind.default_multi(),
            actor,
        }
    }

    /// Operation label recorded as the audit record's `action`.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Save { .. } => "save",
            Self::Update { kind, .. } => kind.as_str(),
            Self::Remove { .. } => "remove",
            Self::DeleteByQuery { kind, .. } => kind.as_str(),
            Self::Insert { .. } => "insert",
            Self::InsertMany { .. } => "insertMany",
        }
    }

    pub fn actor(&self) -> Option<&Actor> {
        match self {
            Self::Save { actor, .. }
            | Self::Update { actor, .. }
            | Self::Remove { actor, .. }
            | Self::DeleteByQuery { actor, .. }
            | Self::Insert { actor, .. }
            | Self::InsertMany { actor, .. } => actor.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_many_defaults_to_multi() {
        let event = LifecycleEvent::update(UpdateKind::UpdateMany, json!({}), json!({}), None);
        assert!(matches!(event, LifecycleEvent::Update { multi: true, .. }));

        let event = LifecycleEvent::update(UpdateKind::UpdateOne, json!({}), json!({}), None);
        assert!(matches!(event, LifecycleEvent::Update { multi: false, .. }));
    }

    #[test]
    fn action_labels_match_store_operations() {
        let actor = Some(json!("u1"));
        let cases = [
            (
                LifecycleEvent::Save {
                    document: json!({}),
                    actor: actor.clone(),
                },
                "save",
            ),
            (
                LifecycleEvent::update(
                    UpdateKind::FindOneAndUpdate,
                    json!({}),
                    json!({}),
                    actor.clone(),
                ),
                "findOneAndUpdate",
            ),
            (
                LifecycleEvent::DeleteByQuery {
                    kind: DeleteKind::DeleteMany,
                    conditions: json!({}),
                    actor: actor.clone(),
                },
                "deleteMany",
            ),
            (
                LifecycleEvent::InsertMany {
                    documents: vec![],
                    actor,
                },
                "insertMany",
            ),
        ];

        for (event, label) in cases {
            assert_eq!(event.action(), label);
            assert_eq!(event.actor(), Some(&json!("u1")));
        }
    }
}
