//! Inlining of local `$ref` pointers.
//!
//! Replaces pure-reference nodes targeting `#/$defs/...` with a copy of
//! the referenced definition, recursively. Used by the `allOf` flattener
//! to collapse internal composition chains.

use std::collections::HashSet;

use serde_json::{Map, Value};

const LOCAL_DEFS_PREFIX: &str = "#/$defs/";

/// Recursively inline local definition references in a node.
///
/// A pure-reference node (an object whose only key is `$ref`) targeting
/// `#/$defs/<name>` is replaced by a copy of that definition with the same
/// inlining applied. The `expanding` set holds definition names on the
/// active expansion path; re-entering one would recurse forever, so the
/// innermost cyclic reference is left as-is. Each recursion level gets its
/// own extended copy of the set, so sibling branches can't observe each
/// other's expansion state.
///
/// References to external documents, unknown definitions, and `$ref` keys
/// alongside other keys all pass through unchanged. This stage is a
/// best-effort rewrite, not a validator.
pub fn inline_local_refs(
    node: &Value,
    defs: &Map<String, Value>,
    expanding: &HashSet<String>,
) -> Value {
    match node {
        Value::Object(map) => {
            if let Some(name) = pure_local_ref(map) {
                if !expanding.contains(name) {
                    if let Some(definition) = defs.get(name) {
                        let mut inner = expanding.clone();
                        inner.insert(name.to_string());
                        return inline_local_refs(definition, defs, &inner);
                    }
                }
                // Cyclic or unresolvable reference - pass through unchanged.
                return node.clone();
            }

            let mut result = Map::new();
            for (key, value) in map {
                result.insert(key.clone(), inline_local_refs(value, defs, expanding));
            }
            Value::Object(result)
        }
        Value::Array(arr) => Value::Array(
            arr.iter()
                .map(|item| inline_local_refs(item, defs, expanding))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// If `map` is a pure-reference node with a local `#/$defs/` target,
/// returns the definition name.
fn pure_local_ref(map: &Map<String, Value>) -> Option<&str> {
    if map.len() != 1 {
        return None;
    }
    let ref_val = map.get("$ref")?.as_str()?;
    ref_val.strip_prefix(LOCAL_DEFS_PREFIX)
}
