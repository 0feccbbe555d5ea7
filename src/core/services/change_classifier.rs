use serde_json::{Map, Value};

use crate::core::models::change_descriptor::{ChangeDescriptor, ChangeMap, ChangeType, Target};
use crate::core::models::change_operation::ChangeOperation;
use crate::core::services::array_reconciler::ArrayReconciler;

/// Folds low-level change operations into a flat change map.
pub struct ChangeClassifier;

impl ChangeClassifier {
    /// Classify `operations` into `change-key → descriptor` entries.
    ///
    /// - `Deleted` / `New` payloads go through the sub-object rules
    ///   (identity-bearing objects stay whole, plain objects are split per
    ///   field, empty fields are dropped).
    /// - `Edited` becomes an `Edit` descriptor with both sides, unless both
    ///   sides are empty values.
    /// - `Array` resolves the whole array on both sides. Only the first
    ///   array operation per key produces a descriptor; later ones for the
    ///   same key are ignored.
    ///
    /// For every other kind a later operation on the same key replaces the
    /// earlier descriptor.
    pub fn classify(
        &self,
        operations: &[ChangeOperation],
        original: Option<&Value>,
        current: Option<&Value>,
    ) -> ChangeMap {
        let mut changes = ChangeMap::new();

        for operation in operations {
            let key = operation.change_key();

            match operation {
                ChangeOperation::Deleted { lhs, .. } => {
                    record_payload(&mut changes, key, lhs, Target::From, ChangeType::Delete);
                }
                ChangeOperation::New { rhs, .. } => {
                    record_payload(&mut changes, key, rhs, Target::To, ChangeType::Add);
                }
                ChangeOperation::Edited { lhs, rhs, .. } => {
                    if is_empty_value(lhs) && is_empty_value(rhs) {
                        continue;
                    }
                    changes.insert(key, ChangeDescriptor::edit(lhs.clone(), rhs.clone()));
                }
                ChangeOperation::Array { path, .. } => {
                    if path.is_empty() {
                        continue;
                    }
                    changes
                        .entry(key)
                        .or_insert_with(|| ArrayReconciler.reconcile(path, original, current));
                }
            }
        }

        tracing::debug!(
            operations = operations.len(),
            changes = changes.len(),
            "classified document changes"
        );

        changes
    }
}

/// `null`, `{}`, `[]` and blank strings carry no information worth auditing.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(fields) => fields.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.trim().is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// An object with its own `_id` or `id` is audited as one unit.
pub fn has_identity(fields: &Map<String, Value>) -> bool {
    fields.contains_key("_id") || fields.contains_key("id")
}

fn record_payload(
    changes: &mut ChangeMap,
    key: String,
    payload: &Value,
    target: Target,
    change_type: ChangeType,
) {
    let descriptor = |value: &Value| ChangeDescriptor::one_sided(target, value.clone(), change_type);

    match payload {
        Value::Object(fields) if has_identity(fields) => {
            changes.insert(key, descriptor(payload));
        }
        Value::Object(fields) => {
            for (name, value) in fields {
                if !is_empty_value(value) {
                    changes.insert(format!("{key}_{name}"), descriptor(value));
                }
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                if !is_empty_value(value) {
                    changes.insert(format!("{key}_{index}"), descriptor(value));
                }
            }
        }
        _ if is_empty_value(payload) => {}
        _ => {
            changes.insert(key, descriptor(payload));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::diff_adapter::DiffAdapter;
    use serde_json::json;

    fn classify(original: &Value, current: &Value) -> ChangeMap {
        let ops = DiffAdapter::default().compute_changes(Some(original), Some(current));
        ChangeClassifier.classify(&ops, Some(original), Some(current))
    }

    #[test]
    fn scalar_edit() {
        let changes = classify(&json!({"age": 30}), &json!({"age": 31}));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes["age"], ChangeDescriptor::edit(json!(30), json!(31)));
    }

    #[test]
    fn deleted_identity_sub_object_is_one_descriptor() {
        let owner = json!({"_id": "x", "name": "Ann", "role": "admin"});
        let changes = classify(&json!({"owner": owner.clone()}), &json!({}));

        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes["owner"],
            ChangeDescriptor::one_sided(Target::From, owner, ChangeType::Delete)
        );
    }

    #[test]
    fn plain_id_field_also_marks_identity() {
        let tag = json!({"id": 4, "label": "red"});
        let changes = classify(&json!({}), &json!({"tag": tag.clone()}));

        assert_eq!(
            changes["tag"],
            ChangeDescriptor::one_sided(Target::To, tag, ChangeType::Add)
        );
    }

    #[test]
    fn deleted_plain_object_split_per_field_without_empties() {
        let changes = classify(&json!({"meta": {"a": 1, "b": ""}}), &json!({}));

        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes["meta_a"],
            ChangeDescriptor::one_sided(Target::From, json!(1), ChangeType::Delete)
        );
    }

    #[test]
    fn empty_values_are_suppressed() {
        let added = json!({"x": {
            "null": null,
            "obj": {},
            "arr": [],
            "blank": "   ",
            "zero": 0,
            "no": false
        }});
        let changes = classify(&json!({}), &added);

        let keys: Vec<&str> = changes.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["x_no", "x_zero"]);
    }

    #[test]
    fn added_primitive_field() {
        let changes = classify(&json!({}), &json!({"nick": "al"}));
        assert_eq!(
            changes["nick"],
            ChangeDescriptor::one_sided(Target::To, json!("al"), ChangeType::Add)
        );
    }

    #[test]
    fn null_and_blank_fields_leave_no_trace() {
        let changes = classify(
            &json!({"gone": null, "note": ""}),
            &json!({"added": null, "note": "  "}),
        );
        assert!(changes.is_empty());
    }

    #[test]
    fn edit_from_null_keeps_both_sides() {
        let changes = classify(&json!({"nick": null}), &json!({"nick": "al"}));
        assert_eq!(changes["nick"], ChangeDescriptor::edit(Value::Null, json!("al")));
    }

    #[test]
    fn array_growth_is_edit_of_whole_array() {
        let changes = classify(&json!({"n": [1, 2]}), &json!({"n": [1, 2, 3]}));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes["n"], ChangeDescriptor::edit(json!([1, 2]), json!([1, 2, 3])));
    }

    #[test]
    fn array_from_empty_is_add_and_to_empty_is_delete() {
        let added = classify(&json!({"n": []}), &json!({"n": [1]}));
        assert_eq!(added["n"].change_type, ChangeType::Add);

        let removed = classify(&json!({"n": [1]}), &json!({"n": []}));
        assert_eq!(removed["n"].change_type, ChangeType::Delete);
    }

    #[test]
    fn first_array_operation_wins() {
        let ops = vec![
            ChangeOperation::Array {
                path: vec!["n".into()],
                index: 1,
                item: Box::new(ChangeOperation::New {
                    path: Vec::new(),
                    rhs: json!(2),
                }),
            },
            ChangeOperation::Array {
                path: vec!["n".into()],
                index: 2,
                item: Box::new(ChangeOperation::New {
                    path: Vec::new(),
                    rhs: json!(3),
                }),
            },
        ];
        let original = json!({"n": [1]});
        let current = json!({"n": [1, 2, 3]});

        let changes = ChangeClassifier.classify(&ops, Some(&original), Some(&current));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes["n"], ChangeDescriptor::edit(json!([1]), json!([1, 2, 3])));
    }

    #[test]
    fn existing_key_blocks_array_reconciliation() {
        let ops = vec![
            ChangeOperation::Edited {
                path: vec!["n".into()],
                lhs: json!("a"),
                rhs: json!("b"),
            },
            ChangeOperation::Array {
                path: vec!["n".into()],
                index: 0,
                item: Box::new(ChangeOperation::New {
                    path: Vec::new(),
                    rhs: json!(1),
                }),
            },
        ];

        let changes = ChangeClassifier.classify(&ops, None, None);
        assert_eq!(changes["n"], ChangeDescriptor::edit(json!("a"), json!("b")));
    }

    #[test]
    fn array_operation_at_root_is_skipped() {
        let ops = vec![ChangeOperation::Array {
            path: Vec::new(),
            index: 0,
            item: Box::new(ChangeOperation::New {
                path: Vec::new(),
                rhs: json!(1),
            }),
        }];
        assert!(ChangeClassifier.classify(&ops, None, None).is_empty());
    }

    #[test]
    fn element_edit_inside_array_is_keyed_by_index() {
        let changes = classify(&json!({"tags": ["x"]}), &json!({"tags": ["z"]}));
        assert_eq!(changes["tags_0"], ChangeDescriptor::edit(json!("x"), json!("z")));
    }

    #[test]
    fn whole_new_document_uses_root_key() {
        let doc = json!({"_id": "9", "name": "fresh"});
        let ops = DiffAdapter::default().compute_changes(None, Some(&doc));
        let changes = ChangeClassifier.classify(&ops, None, Some(&doc));

        assert_eq!(
            changes["newObject"],
            ChangeDescriptor::one_sided(Target::To, doc, ChangeType::Add)
        );
    }

    #[test]
    fn nested_plain_object_added_under_existing_parent() {
        let changes = classify(
            &json!({"profile": {}}),
            &json!({"profile": {"address": {"city": "Oslo", "zip": ""}}}),
        );
        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes["profile_address_city"],
            ChangeDescriptor::one_sided(Target::To, json!("Oslo"), ChangeType::Add)
        );
    }

    #[test]
    fn identical_documents_classify_to_nothing() {
        let doc = json!({"_id": "1", "a": [1, {"b": 2}], "c": {"d": null}});
        assert!(classify(&doc, &doc.clone()).is_empty());
    }

    #[test]
    fn is_empty_value_rules() {
        assert!(is_empty_value(&Value::Null));
        assert!(is_empty_value(&json!({})));
        assert!(is_empty_value(&json!([])));
        assert!(is_empty_value(&json!(" \t\n")));
        assert!(!is_empty_value(&json!(0)));
        assert!(!is_empty_value(&json!(false)));
        assert!(!is_empty_value(&json!("a")));
        assert!(!is_empty_value(&json!([null])));
    }
}
