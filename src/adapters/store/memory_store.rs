use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::core::errors::Result;
use crate::core::traits::document_store::DocumentStore;

/// Document store kept in memory, in insertion order.
///
/// Conditions are matched by top-level equality: every field of the
/// condition object must equal the document's field of the same name.
/// An empty (or non-object) condition matches every document.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<Vec<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<Value>) -> Self {
        Self {
            documents: Mutex::new(documents),
        }
    }

    /// Insert `document`, replacing any stored document with the same `_id`.
    pub fn upsert(&self, document: Value) {
        let mut documents = self.lock();
        let existing = document
            .get("_id")
            .and_then(|id| documents.iter().position(|d| d.get("_id") == Some(id)));

        match existing {
            Some(index) => documents[index] = document,
            None => documents.push(document),
        }
    }

    /// Remove the document with this `_id`, returning it if it was stored.
    pub fn remove(&self, id: &Value) -> Option<Value> {
        let mut documents = self.lock();
        let index = documents.iter().position(|d| d.get("_id") == Some(id))?;
        Some(documents.remove(index))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Value>> {
        self.documents.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn matches(document: &Value, conditions: &Value) -> bool {
    match conditions.as_object() {
        Some(fields) => fields
            .iter()
            .all(|(name, expected)| document.get(name) == Some(expected)),
        None => true,
    }
}

impl DocumentStore for MemoryStore {
    fn find_by_id(&self, id: &Value) -> Result<Option<Value>> {
        Ok(self
            .lock()
            .iter()
            .find(|d| d.get("_id") == Some(id))
            .cloned())
    }

    fn find(&self, conditions: &Value) -> Result<Vec<Value>> {
        Ok(self
            .lock()
            .iter()
            .filter(|d| matches(d, conditions))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> MemoryStore {
        MemoryStore::with_documents(vec![
            json!({"_id": "1", "team": "red", "name": "ann"}),
            json!({"_id": "2", "team": "blue", "name": "bob"}),
            json!({"_id": "3", "team": "red", "name": "cid"}),
        ])
    }

    #[test]
    fn find_by_id_returns_snapshot() {
        let found = store().find_by_id(&json!("2")).unwrap();
        assert_eq!(found.unwrap()["name"], json!("bob"));
        assert!(store().find_by_id(&json!("9")).unwrap().is_none());
    }

    #[test]
    fn find_matches_all_condition_fields() {
        let red = store().find(&json!({"team": "red"})).unwrap();
        assert_eq!(red.len(), 2);

        let one = store().find(&json!({"team": "red", "name": "cid"})).unwrap();
        assert_eq!(one, vec![json!({"_id": "3", "team": "red", "name": "cid"})]);
    }

    #[test]
    fn empty_conditions_match_everything() {
        assert_eq!(store().find(&json!({})).unwrap().len(), 3);
        assert_eq!(store().find(&Value::Null).unwrap().len(), 3);
    }

    #[test]
    fn upsert_replaces_by_id() {
        let s = store();
        s.upsert(json!({"_id": "1", "team": "green"}));
        s.upsert(json!({"_id": "4"}));

        assert_eq!(s.len(), 4);
        assert_eq!(s.find_by_id(&json!("1")).unwrap().unwrap()["team"], json!("green"));
    }

    #[test]
    fn remove_by_id() {
        let s = store();
        assert!(s.remove(&json!("1")).is_some());
        assert!(s.remove(&json!("1")).is_none());
        assert_eq!(s.len(), 2);
    }
}
