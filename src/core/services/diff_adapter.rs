use serde::Serialize;
use serde_json::Value;

use crate::adapters::diff::deep_diff::DeepDiff;
use crate::core::errors::{DocTrailError, Result};
use crate::core::models::change_operation::{ChangeOperation, PathSegment};
use crate::core::traits::tree_diff::TreeDiff;

/// Root-level bookkeeping fields that never appear in an audit trail.
pub const DEFAULT_IGNORED_FIELDS: [&str; 4] = ["_id", "__v", "createdAt", "updatedAt"];

/// Convert any serializable document into a plain JSON tree.
///
/// The result is a detached copy: only data survives, never behaviour.
pub fn to_plain<T: Serialize + ?Sized>(document: &T) -> Result<Value> {
    serde_json::to_value(document).map_err(|e| DocTrailError::InvalidDocument {
        detail: format!("document is not serializable: {e}"),
    })
}

/// Produces the low-level change operations between two snapshots,
/// skipping bookkeeping fields at the document root.
pub struct DiffAdapter {
    differ: Box<dyn TreeDiff>,
    ignored_fields: Vec<String>,
}

impl DiffAdapter {
    /// Adapter over `differ` ignoring the given root-level fields.
    pub fn new(differ: Box<dyn TreeDiff>, ignored_fields: Vec<String>) -> Self {
        Self {
            differ,
            ignored_fields,
        }
    }

    /// Names of the root-level fields left out of the diff.
    pub fn ignored_fields(&self) -> &[String] {
        &self.ignored_fields
    }

    /// Diff `original` against `current`. A `None` side is a document that
    /// does not exist (yet, or any more).
    ///
    /// Operations keep the order of the underlying diff.
    pub fn compute_changes(
        &self,
        original: Option<&Value>,
        current: Option<&Value>,
    ) -> Vec<ChangeOperation> {
        let filter = |parent: &[PathSegment], key: &PathSegment| self.is_ignored(parent, key);
        self.differ.diff(original, current, &filter)
    }

    /// Same as [`compute_changes`](Self::compute_changes) for any
    /// serializable document type.
    pub fn compute_changes_of<T: Serialize + ?Sized>(
        &self,
        original: Option<&T>,
        current: Option<&T>,
    ) -> Result<Vec<ChangeOperation>> {
        let original = original.map(to_plain).transpose()?;
        let current = current.map(to_plain).transpose()?;
        Ok(self.compute_changes(original.as_ref(), current.as_ref()))
    }

    fn is_ignored(&self, parent: &[PathSegment], key: &PathSegment) -> bool {
        parent.is_empty()
            && matches!(key, PathSegment::Key(name) if self.ignored_fields.iter().any(|f| f == name))
    }
}

impl Default for DiffAdapter {
    fn default() -> Self {
        Self::new(
            Box::new(DeepDiff),
            DEFAULT_IGNORED_FIELDS.iter().map(|f| f.to_string()).collect(),
        )
    }
}
