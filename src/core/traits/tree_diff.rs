use serde_json::Value;

use crate::core::models::change_operation::{ChangeOperation, PathSegment};

/// Returns `true` when `key` under the parent path should not be diffed.
pub type PathFilter<'a> = &'a dyn Fn(&[PathSegment], &PathSegment) -> bool;

/// Port for a generic structural diff between two JSON trees.
///
/// `None` on either side means the document does not exist.
pub trait TreeDiff: Send + Sync {
    fn diff(
        &self,
        lhs: Option<&Value>,
        rhs: Option<&Value>,
        filter: PathFilter<'_>,
    ) -> Vec<ChangeOperation>;
}
