//! Codegen metadata cleanup.

use serde_json::Value;

use crate::types::CODEGEN_STRIP_KEYS;

/// Strip top-level `$id` and `$schema` from a copy of the document.
///
/// The generator resolves `$id` as a base URL, which breaks for generated
/// scenario files whose `$id` still names the base document. Only the top
/// level is stripped; nested occurrences are harmless to the generator
/// and left alone.
pub fn strip_codegen_keys(schema: &Value) -> Value {
    let mut cleaned = schema.clone();
    if let Some(root) = cleaned.as_object_mut() {
        for key in CODEGEN_STRIP_KEYS {
            root.remove(*key);
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_top_level_metadata() {
        let schema = json!({
            "$id": "https://ucp.dev/schemas/order.json",
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "title": "Order"
        });

        let cleaned = strip_codegen_keys(&schema);
        assert!(cleaned.get("$id").is_none());
        assert!(cleaned.get("$schema").is_none());
        assert_eq!(cleaned["title"], "Order");
    }

    #[test]
    fn nested_metadata_untouched() {
        let schema = json!({
            "$id": "https://ucp.dev/schemas/order.json",
            "$defs": {
                "inner": { "$id": "https://ucp.dev/schemas/inner.json" }
            }
        });

        let cleaned = strip_codegen_keys(&schema);
        assert_eq!(
            cleaned["$defs"]["inner"]["$id"],
            "https://ucp.dev/schemas/inner.json"
        );
    }

    #[test]
    fn cleaning_is_idempotent() {
        let schema = json!({
            "$id": "https://ucp.dev/schemas/order.json",
            "properties": { "id": { "type": "string" } }
        });

        let once = strip_codegen_keys(&schema);
        let twice = strip_codegen_keys(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn input_not_mutated() {
        let schema = json!({ "$id": "x", "title": "T" });
        let _ = strip_codegen_keys(&schema);
        assert_eq!(schema["$id"], "x");
    }
}
