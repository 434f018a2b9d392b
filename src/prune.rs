//! Removal of extension definitions.
//!
//! A `$defs` entry whose `allOf` references a schema in another document
//! is an extension of that external schema. The downstream generator
//! can't follow cross-file inheritance chains, so these definitions are
//! dropped wholesale before flattening.

use serde_json::Value;

/// Remove `$defs` entries that extend external schemas via `allOf`.
///
/// A definition is removed when any `allOf` element is a pure-reference
/// node whose target does not start with `#/`. An emptied `$defs` map is
/// removed entirely. Documents without `$defs` pass through unchanged.
pub fn remove_extension_defs(mut schema: Value) -> Value {
    let Some(root) = schema.as_object_mut() else {
        return schema;
    };
    let Some(defs) = root.get_mut("$defs").and_then(Value::as_object_mut) else {
        return schema;
    };

    let to_remove: Vec<String> = defs
        .iter()
        .filter(|(_, def)| extends_external(def))
        .map(|(name, _)| name.clone())
        .collect();

    for name in &to_remove {
        defs.remove(name);
    }

    if defs.is_empty() {
        root.remove("$defs");
    }

    schema
}

/// True when any `allOf` element is a pure reference to another document.
fn extends_external(def: &Value) -> bool {
    let Some(all_of) = def.get("allOf").and_then(Value::as_array) else {
        return false;
    };

    all_of.iter().any(|item| {
        item.as_object()
            .filter(|map| map.len() == 1)
            .and_then(|map| map.get("$ref"))
            .and_then(Value::as_str)
            .map(|r| !r.starts_with("#/"))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn removes_def_extending_external_schema() {
        let schema = json!({
            "$defs": {
                "order_extension": {
                    "allOf": [
                        { "$ref": "../order.json#/$defs/order" },
                        { "properties": { "note": { "type": "string" } } }
                    ]
                },
                "local": { "type": "string" }
            }
        });

        let result = remove_extension_defs(schema);
        assert!(result["$defs"].get("order_extension").is_none());
        assert!(result["$defs"].get("local").is_some());
    }

    #[test]
    fn keeps_def_with_internal_allof() {
        let schema = json!({
            "$defs": {
                "a": { "allOf": [{ "$ref": "#/$defs/b" }] },
                "b": { "type": "object" }
            }
        });

        let result = remove_extension_defs(schema.clone());
        assert_eq!(result, schema);
    }

    #[test]
    fn removes_empty_defs_key() {
        let schema = json!({
            "title": "Thing",
            "$defs": {
                "ext": { "allOf": [{ "$ref": "other.json" }] }
            }
        });

        let result = remove_extension_defs(schema);
        assert!(result.get("$defs").is_none());
        assert_eq!(result["title"], "Thing");
    }

    #[test]
    fn ref_with_siblings_is_not_external_extension() {
        // Only pure-reference nodes classify a def as an extension.
        let schema = json!({
            "$defs": {
                "a": {
                    "allOf": [{ "$ref": "other.json", "description": "annotated" }]
                }
            }
        });

        let result = remove_extension_defs(schema.clone());
        assert_eq!(result, schema);
    }

    #[test]
    fn no_defs_is_noop() {
        let schema = json!({ "type": "object", "properties": {} });
        assert_eq!(remove_extension_defs(schema.clone()), schema);
    }

    #[test]
    fn pruning_is_monotonic() {
        let schema = json!({
            "$defs": {
                "keep_a": { "type": "string" },
                "drop": { "allOf": [{ "$ref": "ext.json#/$defs/x" }] },
                "keep_b": { "allOf": [{ "$ref": "#/$defs/keep_a" }] }
            }
        });

        let result = remove_extension_defs(schema);
        let keys: Vec<&String> = result["$defs"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["keep_a", "keep_b"]);
    }
}
