use serde_json::Value;

use crate::core::errors::Result;

/// Port for reading the persisted state of documents before a mutation.
pub trait DocumentStore: Send + Sync {
    /// Fetch the stored snapshot of the document with this identity.
    fn find_by_id(&self, id: &Value) -> Result<Option<Value>>;

    /// Fetch every stored document matching `conditions`, in store order.
    fn find(&self, conditions: &Value) -> Result<Vec<Value>>;
}
