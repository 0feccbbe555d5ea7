use std::fmt;

use serde_json::Value;

/// Key used in the change map when an operation targets the document root.
pub const ROOT_CHANGE_KEY: &str = "newObject";

/// One step of a path from the document root: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A low-level difference reported by the tree-diff primitive.
///
/// `Array` describes a length change of the array at `path`; the element
/// affected sits at `index` and `item` is the `New` or `Deleted` operation
/// for that element (its own path is empty).
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOperation {
    Deleted {
        path: Vec<PathSegment>,
        lhs: Value,
    },
    New {
        path: Vec<PathSegment>,
        rhs: Value,
    },
    Edited {
        path: Vec<PathSegment>,
        lhs: Value,
        rhs: Value,
    },
    Array {
        path: Vec<PathSegment>,
        index: usize,
        item: Box<ChangeOperation>,
    },
}

impl ChangeOperation {
    /// Path from the document root to the changed value (or to the array,
    /// for `Array` operations).
    pub fn path(&self) -> &[PathSegment] {
        match self {
            Self::Deleted { path, .. }
            | Self::New { path, .. }
            | Self::Edited { path, .. }
            | Self::Array { path, .. } => path,
        }
    }

    /// The change-map key for this operation: the path joined with `_`,
    /// or [`ROOT_CHANGE_KEY`] when the path is empty.
    pub fn change_key(&self) -> String {
        change_key(self.path())
    }
}

/// Join a path into a change-map key.
pub fn change_key(path: &[PathSegment]) -> String {
    if path.is_empty() {
        return ROOT_CHANGE_KEY.to_string();
    }

    path.iter()
        .map(|segment| segment.to_string())
        .collect::<Vec<_>>()
        .join("_")
}
