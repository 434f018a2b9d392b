//! `$ref` target rewriting.
//!
//! Two structural rewrites over reference strings: pointing refs at
//! scenario-specific sibling files, and absolutizing sibling references
//! for documents the generator resolves from the wrong base directory.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::loader::normalize_path;
use crate::types::SCHEMA_EXTENSION;

/// Sibling-reference fixup for one well-known top-level document.
///
/// Historically the generator resolved that document's relative sibling
/// references against the wrong base directory; rewriting them to absolute
/// filesystem paths works around it. Whether the workaround is still
/// needed depends on the generator version, so it is configuration, not a
/// built-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFixup {
    /// Input-root-relative path of the document to fix up.
    pub document: PathBuf,
    /// File names of the problematic siblings.
    pub siblings: Vec<String>,
}

/// Rewrite document references to point at scenario-specific variants.
///
/// A `$ref` ending in `.{json}` is resolved against `current_dir` (the
/// document's directory relative to the input root) and, if the normalized
/// path names a scenario-bearing document, rewritten from `<name>.json` to
/// `<name>_<scenario>_request.json`. Internal refs (`#/...`) and fragment
/// refs (`...#/$defs/...`) are never scenario-specific and pass through
/// unchanged, as does everything else.
pub fn rewrite_scenario_refs(
    node: &Value,
    scenario: &str,
    scenario_docs: &BTreeSet<PathBuf>,
    current_dir: &Path,
) -> Value {
    map_refs(node, &|ref_val| {
        if ref_val.starts_with("#/") || ref_val.contains("#/$defs/") {
            return None;
        }
        let suffix = format!(".{}", SCHEMA_EXTENSION);
        let stem = ref_val.strip_suffix(&suffix)?;

        let resolved = normalize_path(&current_dir.join(ref_val));
        if scenario_docs.contains(&resolved) {
            Some(format!("{}_{}_request.{}", stem, scenario, SCHEMA_EXTENSION))
        } else {
            None
        }
    })
}

/// Rewrite configured sibling references to absolute paths.
///
/// A `$ref` whose file part (before any fragment) matches one of the
/// fixup's sibling file names is replaced by the absolute path of that
/// sibling under `target_dir`, keeping the fragment intact.
pub fn absolutize_sibling_refs(node: &Value, fixup: &PathFixup, target_dir: &Path) -> Value {
    map_refs(node, &|ref_val| {
        let (file_part, fragment) = match ref_val.find('#') {
            Some(idx) => (&ref_val[..idx], &ref_val[idx..]),
            None => (ref_val, ""),
        };

        if !fixup.siblings.iter().any(|s| s == file_part) {
            return None;
        }

        let absolute = target_dir.join(file_part);
        Some(format!("{}{}", absolute.display(), fragment))
    })
}

/// Rebuild a tree, applying `rewrite` to every `$ref` string value.
///
/// `rewrite` returns `Some(new_target)` to replace a reference or `None`
/// to keep it.
fn map_refs(node: &Value, rewrite: &dyn Fn(&str) -> Option<String>) -> Value {
    match node {
        Value::Object(map) => {
            let mut result = Map::new();
            for (key, value) in map {
                let rewritten = match (key.as_str(), value.as_str()) {
                    ("$ref", Some(target)) => rewrite(target).map(Value::String),
                    _ => None,
                };
                result.insert(key.clone(), rewritten.unwrap_or_else(|| map_refs(value, rewrite)));
            }
            Value::Object(result)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(|item| map_refs(item, rewrite)).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scenario_docs(paths: &[&str]) -> BTreeSet<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn rewrites_ref_to_scenario_document() {
        let docs = scenario_docs(&["types/order.json"]);
        let node = json!({ "$ref": "order.json" });

        let result = rewrite_scenario_refs(&node, "create", &docs, Path::new("types"));
        assert_eq!(result, json!({ "$ref": "order_create_request.json" }));
    }

    #[test]
    fn resolves_parent_segments_before_membership_check() {
        let docs = scenario_docs(&["order.json"]);
        let node = json!({ "$ref": "../order.json" });

        let result = rewrite_scenario_refs(&node, "update", &docs, Path::new("types"));
        assert_eq!(result, json!({ "$ref": "../order_update_request.json" }));
    }

    #[test]
    fn non_member_ref_unchanged() {
        let docs = scenario_docs(&["types/order.json"]);
        let node = json!({ "$ref": "buyer.json" });

        let result = rewrite_scenario_refs(&node, "create", &docs, Path::new("types"));
        assert_eq!(result, node);
    }

    #[test]
    fn internal_and_fragment_refs_unchanged() {
        let docs = scenario_docs(&["types/order.json", "order.json"]);

        let internal = json!({ "$ref": "#/$defs/order" });
        assert_eq!(
            rewrite_scenario_refs(&internal, "create", &docs, Path::new("types")),
            internal
        );

        let fragment = json!({ "$ref": "order.json#/$defs/line_item" });
        assert_eq!(
            rewrite_scenario_refs(&fragment, "create", &docs, Path::new("types")),
            fragment
        );
    }

    #[test]
    fn rewrites_nested_refs() {
        let docs = scenario_docs(&["item.json"]);
        let node = json!({
            "properties": {
                "items": {
                    "type": "array",
                    "items": { "$ref": "item.json" }
                }
            }
        });

        let result = rewrite_scenario_refs(&node, "complete", &docs, Path::new(""));
        assert_eq!(
            result["properties"]["items"]["items"],
            json!({ "$ref": "item_complete_request.json" })
        );
    }

    #[test]
    fn ref_alongside_other_keys_still_rewritten() {
        // The rewriter targets every $ref string, not only pure-ref nodes.
        let docs = scenario_docs(&["order.json"]);
        let node = json!({ "$ref": "order.json", "description": "the order" });

        let result = rewrite_scenario_refs(&node, "create", &docs, Path::new(""));
        assert_eq!(result["$ref"], "order_create_request.json");
        assert_eq!(result["description"], "the order");
    }

    #[test]
    fn absolutizes_configured_sibling() {
        let fixup = PathFixup {
            document: PathBuf::from("checkout.json"),
            siblings: vec!["order.json".to_string()],
        };
        let node = json!({
            "properties": {
                "order": { "$ref": "order.json#/$defs/order" },
                "buyer": { "$ref": "buyer.json" }
            }
        });

        let result = absolutize_sibling_refs(&node, &fixup, Path::new("/abs/out"));
        assert_eq!(
            result["properties"]["order"]["$ref"],
            "/abs/out/order.json#/$defs/order"
        );
        // Unlisted sibling untouched.
        assert_eq!(result["properties"]["buyer"]["$ref"], "buyer.json");
    }

    #[test]
    fn absolutize_without_fragment() {
        let fixup = PathFixup {
            document: PathBuf::from("checkout.json"),
            siblings: vec!["order.json".to_string()],
        };
        let node = json!({ "$ref": "order.json" });

        let result = absolutize_sibling_refs(&node, &fixup, Path::new("/abs/out"));
        assert_eq!(result["$ref"], "/abs/out/order.json");
    }
}
