//! UCP Schema Preprocessor
//!
//! Rewrites a tree of UCP JSON Schema documents into a form the downstream
//! code generator can consume: cross-file `allOf` inheritance is pruned,
//! internal `allOf` compositions are flattened, per-property `ucp_request`
//! annotations are expanded into scenario-specific request documents, and
//! generator-hostile metadata is stripped.
//!
//! The pipeline is pure tree rewriting over [`serde_json::Value`]; the only
//! I/O is reading the input tree and writing the mirrored output tree.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeSet;
//! use std::path::Path;
//! use serde_json::json;
//! use ucp_preprocess::generate_scenarios;
//!
//! let schema = json!({
//!     "title": "Order",
//!     "properties": {
//!         "id": {
//!             "type": "string",
//!             "ucp_request": { "create": "omit", "update": "required" }
//!         },
//!         "name": { "type": "string" }
//!     },
//!     "required": ["id", "name"]
//! });
//!
//! let scenarios = generate_scenarios(&schema, &BTreeSet::new(), Path::new(""));
//!
//! let create = &scenarios["create"];
//! assert!(create["properties"].get("id").is_none());
//! assert_eq!(create["required"], json!(["name"]));
//! assert_eq!(create["title"], "Order (Create Request)");
//! ```

mod clean;
mod error;
mod flatten;
mod inline;
mod loader;
mod pipeline;
mod prune;
mod rewrite;
mod scenario;
mod types;

pub use clean::strip_codegen_keys;
pub use error::PreprocessError;
pub use flatten::flatten_allof_defs;
pub use inline::inline_local_refs;
pub use loader::{
    collect_schema_files, load_schema, load_schema_str, normalize_path, write_schema,
};
pub use pipeline::{preprocess_tree, FileReport, PreprocessOptions, Report};
pub use prune::remove_extension_defs;
pub use rewrite::{absolutize_sibling_refs, rewrite_scenario_refs, PathFixup};
pub use scenario::{generate_scenarios, has_scenario_annotations, scenario_names, BASE_SCENARIO};
pub use types::{Directive, REQUEST_ANNOTATION};
