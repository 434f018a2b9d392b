//! Scenario document generation.
//!
//! A schema whose top-level properties carry object-form `ucp_request`
//! annotations describes several request shapes at once (create, update,
//! complete, ...). The generator needs one concrete schema per shape, so
//! each discovered scenario becomes its own document with the directives
//! applied and the annotations stripped.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde_json::{Map, Value};

use crate::rewrite::rewrite_scenario_refs;
use crate::types::{Directive, REQUEST_ANNOTATION};

/// Key under which the unmodified document is returned when a schema
/// declares no scenarios.
pub const BASE_SCENARIO: &str = "base";

/// True when any top-level property carries an object-form `ucp_request`
/// annotation. Shorthand string annotations apply uniformly and don't
/// make a document scenario-bearing on their own.
pub fn has_scenario_annotations(schema: &Value) -> bool {
    !scenario_names(schema).is_empty()
}

/// Collect the scenario names declared by a document's top-level
/// properties: the union of keys across all object-form `ucp_request`
/// annotations.
pub fn scenario_names(schema: &Value) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return names;
    };

    for prop in properties.values() {
        if let Some(Value::Object(annotation)) = prop.get(REQUEST_ANNOTATION) {
            names.extend(annotation.keys().cloned());
        }
    }
    names
}

/// Derive request-shaped scenario documents from a base schema.
///
/// Returns one entry per scenario name discovered across the top-level
/// properties' annotations. When no scenarios are declared, the single
/// entry [`BASE_SCENARIO`] maps to the unchanged document.
///
/// Each scenario document is an independent copy of the base with the
/// title suffixed (`"Order"` becomes `"Order (Create Request)"`), every
/// property's directive applied, `required` recomputed as a sorted
/// de-duplicated list (absent when empty), and document references
/// rewritten to scenario-specific variants via
/// [`rewrite_scenario_refs`].
pub fn generate_scenarios(
    schema: &Value,
    scenario_docs: &BTreeSet<std::path::PathBuf>,
    current_dir: &Path,
) -> BTreeMap<String, Value> {
    let names = scenario_names(schema);

    let mut result = BTreeMap::new();
    if names.is_empty() {
        result.insert(BASE_SCENARIO.to_string(), schema.clone());
        return result;
    }

    for name in names {
        let derived = derive_scenario(schema, &name);
        let rewritten = rewrite_scenario_refs(&derived, &name, scenario_docs, current_dir);
        result.insert(name, rewritten);
    }
    result
}

fn derive_scenario(schema: &Value, scenario: &str) -> Value {
    let mut doc = schema.clone();
    let Some(root) = doc.as_object_mut() else {
        return doc;
    };

    retitle(root, scenario);

    let mut required: BTreeSet<String> = root
        .get("required")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default();

    if let Some(properties) = root.get_mut("properties").and_then(Value::as_object_mut) {
        let annotated: Vec<String> = properties
            .iter()
            .filter(|(_, prop)| prop.get(REQUEST_ANNOTATION).is_some())
            .map(|(name, _)| name.clone())
            .collect();

        for prop_name in annotated {
            let Some(prop) = properties.get_mut(&prop_name) else {
                continue;
            };
            let annotation = match prop.as_object_mut() {
                Some(map) => map.remove(REQUEST_ANNOTATION),
                None => None,
            };
            let directive = annotation
                .map(|a| Directive::resolve(&a, scenario))
                .unwrap_or_default();

            match directive {
                Directive::Omit => {
                    properties.remove(&prop_name);
                    required.remove(&prop_name);
                }
                Directive::Required => {
                    required.insert(prop_name);
                }
                Directive::Optional => {
                    required.remove(&prop_name);
                }
            }
        }
    }

    if required.is_empty() {
        root.remove("required");
    } else {
        root.insert(
            "required".to_string(),
            Value::Array(required.into_iter().map(Value::String).collect()),
        );
    }

    doc
}

/// Suffix the document title with the capitalized scenario name.
fn retitle(root: &mut Map<String, Value>, scenario: &str) {
    if let Some(title) = root.get("title").and_then(Value::as_str) {
        let suffixed = format!("{} ({} Request)", title, capitalize(scenario));
        root.insert("title".to_string(), Value::String(suffixed));
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
