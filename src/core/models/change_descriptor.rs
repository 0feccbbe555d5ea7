use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Net effect of a change on one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeType {
    Add,
    Edit,
    Delete,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "Add"),
            Self::Edit => write!(f, "Edit"),
            Self::Delete => write!(f, "Delete"),
        }
    }
}

/// Which side of a descriptor a sub-object payload fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    From,
    To,
}

/// Normalized `{from, to, type}` description of one logical change.
///
/// At least one of `from` / `to` is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeDescriptor {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub from: Option<Value>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub to: Option<Value>,
    #[serde(rename = "type")]
    pub change_type: ChangeType,
}

impl ChangeDescriptor {
    /// An in-place edit from `from` to `to`.
    pub fn edit(from: Value, to: Value) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            change_type: ChangeType::Edit,
        }
    }

    /// A one-sided descriptor: the value lands on `target`.
    pub fn one_sided(target: Target, value: Value, change_type: ChangeType) -> Self {
        let (from, to) = match target {
            Target::From => (Some(value), None),
            Target::To => (None, Some(value)),
        };
        Self {
            from,
            to,
            change_type,
        }
    }
}

/// A side that is present in the input stays `Some`, even when it is `null`.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Flat mapping of change-key to descriptor, sorted by key.
pub type ChangeMap = BTreeMap<String, ChangeDescriptor>;
