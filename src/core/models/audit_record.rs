use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::models::change_descriptor::ChangeMap;

/// Opaque identity of whoever performed an operation.
pub type Actor = Value;

/// A single audit entry: one mutation of one document (JSON lines format).
///
/// Field names on the wire follow the audit collection layout:
/// `itemId`, `itemName`, `action`, `changes`, `originalDocument`, `user`,
/// `createdAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    #[serde(rename = "itemId", default)]
    pub subject_id: Value,
    #[serde(rename = "itemName", default)]
    pub subject_type: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    pub changes: ChangeMap,
    #[serde(rename = "originalDocument", default)]
    pub original_document: Value,
    #[serde(rename = "user")]
    pub actor: Actor,
    #[serde(rename = "createdAt")]
    pub recorded_at: DateTime<Utc>,
}

impl AuditRecord {
    /// The actor rendered as plain text (strings without quotes).
    pub fn actor_label(&self) -> String {
        match &self.actor {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::change_descriptor::ChangeDescriptor;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample() -> AuditRecord {
        let mut changes = ChangeMap::new();
        changes.insert("name".into(), ChangeDescriptor::edit(json!("A"), json!("B")));
        AuditRecord {
            subject_id: json!("1"),
            subject_type: Some("User".into()),
            action: Some("save".into()),
            changes,
            original_document: json!({"_id": "1", "name": "A"}),
            actor: json!("alice"),
            recorded_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn serializes_with_storage_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["itemId"], json!("1"));
        assert_eq!(value["itemName"], json!("User"));
        assert_eq!(value["user"], json!("alice"));
        assert_eq!(value["originalDocument"]["name"], json!("A"));
        assert_eq!(
            value["changes"]["name"],
            json!({"from": "A", "to": "B", "type": "Edit"})
        );
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn json_round_trip_preserves_record() {
        let record = sample();
        let line = serde_json::to_string(&record).unwrap();
        let back: AuditRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn actor_label_strips_quotes_from_strings() {
        let mut record = sample();
        assert_eq!(record.actor_label(), "alice");

        record.actor = json!({"id": 7});
        assert_eq!(record.actor_label(), r#"{"id":7}"#);
    }
}
