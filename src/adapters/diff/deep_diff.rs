use serde_json::Value;

use crate::core::models::change_operation::{ChangeOperation, PathSegment};
use crate::core::traits::tree_diff::{PathFilter, TreeDiff};

/// Recursive structural diff over `serde_json::Value` trees.
///
/// Operations are reported in walk order:
/// - object keys of the left side first (recursing into shared keys),
///   then keys only present on the right side;
/// - array elements by ascending index. Elements past the end of the
///   shorter array are reported as `Array` operations on the array path.
/// - values of different kinds, or differing scalars, are `Edited`.
pub struct DeepDiff;

impl TreeDiff for DeepDiff {
    fn diff(
        &self,
        lhs: Option<&Value>,
        rhs: Option<&Value>,
        filter: PathFilter<'_>,
    ) -> Vec<ChangeOperation> {
        let mut changes = Vec::new();
        let mut path = Vec::new();
        walk(lhs, rhs, &mut path, filter, &mut changes);
        changes
    }
}

fn walk(
    lhs: Option<&Value>,
    rhs: Option<&Value>,
    path: &mut Vec<PathSegment>,
    filter: PathFilter<'_>,
    changes: &mut Vec<ChangeOperation>,
) {
    match (lhs, rhs) {
        (None, None) => {}
        (None, Some(rhs)) => changes.push(ChangeOperation::New {
            path: path.clone(),
            rhs: rhs.clone(),
        }),
        (Some(lhs), None) => changes.push(ChangeOperation::Deleted {
            path: path.clone(),
            lhs: lhs.clone(),
        }),
        (Some(Value::Object(left)), Some(Value::Object(right))) => {
            for (key, left_value) in left {
                let segment = PathSegment::Key(key.clone());
                if filter(path, &segment) {
                    continue;
                }
                path.push(segment);
                walk(Some(left_value), right.get(key), path, filter, changes);
                path.pop();
            }

            for (key, right_value) in right {
                if left.contains_key(key) {
                    continue;
                }
                let segment = PathSegment::Key(key.clone());
                if filter(path, &segment) {
                    continue;
                }
                path.push(segment);
                walk(None, Some(right_value), path, filter, changes);
                path.pop();
            }
        }
        (Some(Value::Array(left)), Some(Value::Array(right))) => {
            for (index, left_value) in left.iter().enumerate() {
                let segment = PathSegment::Index(index);
                if filter(path, &segment) {
                    continue;
                }
                match right.get(index) {
                    Some(right_value) => {
                        path.push(segment);
                        walk(Some(left_value), Some(right_value), path, filter, changes);
                        path.pop();
                    }
                    None => changes.push(array_change(
                        path,
                        index,
                        ChangeOperation::Deleted {
                            path: Vec::new(),
                            lhs: left_value.clone(),
                        },
                    )),
                }
            }

            for (index, right_value) in right.iter().enumerate().skip(left.len()) {
                if filter(path, &PathSegment::Index(index)) {
                    continue;
                }
                changes.push(array_change(
                    path,
                    index,
                    ChangeOperation::New {
                        path: Vec::new(),
                        rhs: right_value.clone(),
                    },
                ));
            }
        }
        (Some(lhs), Some(rhs)) => {
            if lhs != rhs {
                changes.push(ChangeOperation::Edited {
                    path: path.clone(),
                    lhs: lhs.clone(),
                    rhs: rhs.clone(),
                });
            }
        }
    }
}

fn array_change(path: &[PathSegment], index: usize, item: ChangeOperation) -> ChangeOperation {
    ChangeOperation::Array {
        path: path.to_vec(),
        index,
        item: Box::new(item),
    }
}
