use std::path::Path;

use serde_json::Value;

use crate::core::errors::{DocTrailError, Result};

/// Argument meaning "this document does not exist".
pub const ABSENT: &str = "-";

/// Read a JSON document from `path`.
pub fn read_document(path: &str) -> Result<Value> {
    let file = Path::new(path);
    if !file.exists() {
        return Err(DocTrailError::FileNotFound {
            path: file.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(file)?;
    serde_json::from_str(&content).map_err(|e| DocTrailError::InvalidDocument {
        detail: format!("{path} is not valid JSON: {e}"),
    })
}

/// Read a JSON document, or `None` when `path` is [`ABSENT`].
pub fn read_optional_document(path: &str) -> Result<Option<Value>> {
    if path == ABSENT {
        return Ok(None);
    }
    read_document(path).map(Some)
}
