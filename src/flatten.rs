//! Flattening of internal `allOf` compositions.
//!
//! The generator models `allOf` inheritance as class hierarchies, which
//! breaks down once definitions reference each other across `$defs`.
//! Merging each internal-only composition into a single flat definition
//! sidesteps that entirely.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::inline::inline_local_refs;

/// Flatten `allOf` compositions in `$defs` that use only internal refs.
///
/// Each qualifying definition is replaced by the key-wise merge of its
/// inlined `allOf` elements: `properties` maps are unioned (later elements
/// win on collision), `required` lists are unioned as a set, and any other
/// key except `title`/`description`/`allOf` takes the latest value. The
/// wrapping definition's own `title` and `description` are preserved
/// verbatim. Definitions whose `allOf` references an external document are
/// left untouched (normally already pruned, but checked independently).
///
/// Definitions are processed in declaration order, and later definitions
/// inline the already-flattened form of earlier ones.
pub fn flatten_allof_defs(mut schema: Value) -> Value {
    let Some(defs) = schema
        .as_object_mut()
        .and_then(|root| root.get_mut("$defs"))
        .and_then(Value::as_object_mut)
    else {
        return schema;
    };

    let names: Vec<String> = defs.keys().cloned().collect();
    for name in names {
        let snapshot = defs.clone();
        let Some(def) = snapshot.get(&name) else {
            continue;
        };
        if let Some(flattened) = flatten_one(def, &snapshot) {
            defs.insert(name, flattened);
        }
    }

    schema
}

fn flatten_one(def: &Value, defs: &Map<String, Value>) -> Option<Value> {
    let all_of = def.get("allOf")?.as_array()?;
    if references_external(all_of) {
        return None;
    }

    let mut merged = Map::new();
    for item in all_of {
        let resolved = inline_local_refs(item, defs, &HashSet::new());
        let Some(resolved) = resolved.as_object() else {
            continue;
        };

        for (key, value) in resolved {
            match key.as_str() {
                "properties" => merge_properties(&mut merged, value),
                "required" => merge_required(&mut merged, value),
                "title" | "description" | "allOf" => {}
                _ => {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }
    }

    // The wrapping definition's own metadata wins.
    for key in ["title", "description"] {
        if let Some(value) = def.get(key) {
            merged.insert(key.to_string(), value.clone());
        }
    }

    Some(Value::Object(merged))
}

/// True when any `allOf` element references another document.
///
/// Broader than the pruner's pure-reference check: here a `$ref` with a
/// non-local target disqualifies the composition regardless of sibling
/// keys, since the element can't be inlined and its keys would otherwise
/// be hoisted into the merge.
fn references_external(all_of: &[Value]) -> bool {
    all_of.iter().any(|item| {
        item.get("$ref")
            .and_then(Value::as_str)
            .map(|r| !r.starts_with("#/"))
            .unwrap_or(false)
    })
}

/// Union `properties` maps; later entries overwrite on key collision.
fn merge_properties(merged: &mut Map<String, Value>, value: &Value) {
    match (
        merged.get_mut("properties").and_then(Value::as_object_mut),
        value.as_object(),
    ) {
        (Some(existing), Some(incoming)) => {
            for (k, v) in incoming {
                existing.insert(k.clone(), v.clone());
            }
        }
        _ => {
            merged.insert("properties".to_string(), value.clone());
        }
    }
}

/// Union `required` lists as a set, preserving first-seen order.
fn merge_required(merged: &mut Map<String, Value>, value: &Value) {
    match (
        merged.get_mut("required").and_then(Value::as_array_mut),
        value.as_array(),
    ) {
        (Some(existing), Some(incoming)) => {
            for entry in incoming {
                if !existing.contains(entry) {
                    existing.push(entry.clone());
                }
            }
        }
        _ => {
            merged.insert("required".to_string(), value.clone());
        }
    }
}
