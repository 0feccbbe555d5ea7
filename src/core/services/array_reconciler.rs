use serde_json::Value;

use crate::core::models::change_descriptor::{ChangeDescriptor, ChangeType};
use crate::core::models::change_operation::PathSegment;

/// Recovers whole arrays for changes reported inside an array field.
pub struct ArrayReconciler;

impl ArrayReconciler {
    /// Describe the net change of the array at `path`.
    ///
    /// Both sides are resolved in full from the snapshots, not just the
    /// element the diff pointed at. The type follows the resolved lengths:
    ///
    /// - both non-empty → `Edit`
    /// - only the original non-empty → `Delete`
    /// - only the current non-empty → `Add`
    /// - both empty → `Edit` with two empty arrays
    pub fn reconcile(
        &self,
        path: &[PathSegment],
        original: Option<&Value>,
        current: Option<&Value>,
    ) -> ChangeDescriptor {
        let from = Self::extract_array(original, path);
        let to = Self::extract_array(current, path);

        let change_type = match (from.is_empty(), to.is_empty()) {
            (false, true) => ChangeType::Delete,
            (true, false) => ChangeType::Add,
            _ => ChangeType::Edit,
        };

        ChangeDescriptor {
            from: Some(Value::Array(from)),
            to: Some(Value::Array(to)),
            change_type,
        }
    }

    /// Walk `path` from `document` and return the array found there.
    ///
    /// A segment that does not resolve, or a final value that is not an
    /// array, yields an empty array.
    pub fn extract_array(document: Option<&Value>, path: &[PathSegment]) -> Vec<Value> {
        let Some((last, parents)) = path.split_last() else {
            return Vec::new();
        };

        let container = document.and_then(|root| {
            parents
                .iter()
                .try_fold(root, |node, segment| step(node, segment))
        });

        match container.and_then(|node| step(node, last)) {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        }
    }
}

fn step<'a>(node: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match segment {
        PathSegment::Key(key) => node.as_object()?.get(key),
        PathSegment::Index(index) => node.as_array()?.get(*index),
    }
}
