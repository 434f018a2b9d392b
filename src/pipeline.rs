//! The per-tree preprocessing driver.
//!
//! Discovers schema documents under the input root, runs a first pass to
//! find scenario-bearing documents, then applies the full rewrite chain
//! per file and materializes the output tree. The output root is rebuilt
//! from scratch on every run; the first error aborts the whole run.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::clean::strip_codegen_keys;
use crate::error::PreprocessError;
use crate::flatten::flatten_allof_defs;
use crate::loader::{collect_schema_files, load_schema, write_schema};
use crate::prune::remove_extension_defs;
use crate::rewrite::{absolutize_sibling_refs, PathFixup};
use crate::scenario::{generate_scenarios, has_scenario_annotations, BASE_SCENARIO};
use crate::types::SCHEMA_EXTENSION;

/// Options for one output-tree build.
#[derive(Debug, Clone)]
pub struct PreprocessOptions {
    /// Root of the source schema tree.
    pub input_root: PathBuf,
    /// Root of the generated tree; deleted and recreated on every run.
    pub output_root: PathBuf,
    /// Optional sibling-reference fixup for one top-level document.
    pub fixup: Option<PathFixup>,
}

/// Result of preprocessing one document.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Path relative to the input root.
    pub path: PathBuf,
    /// Scenario names for which sibling documents were written.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scenarios: Vec<String>,
}

/// Aggregated result of one run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub files_processed: usize,
    pub scenarios_generated: usize,
    pub files: Vec<FileReport>,
}

/// Preprocess every schema document under the input root.
///
/// Two passes: the first records which documents declare scenarios (so
/// `$ref` targets can be rewritten to scenario-specific siblings), the
/// second applies fixup, pruning, flattening, and scenario generation,
/// writing the base document to its mirrored path plus one
/// `<stem>_<scenario>_request` file per generated scenario.
///
/// # Errors
///
/// Fails on the first missing directory, unreadable or malformed file,
/// or write failure. No partial output is preserved on a later error; the
/// tool is meant to be re-run from scratch.
pub fn preprocess_tree(options: &PreprocessOptions) -> Result<Report, PreprocessError> {
    let files = collect_schema_files(&options.input_root)?;

    // Pass 1: load everything, record scenario-bearing documents.
    let mut documents: Vec<(PathBuf, Value)> = Vec::new();
    let mut scenario_docs: BTreeSet<PathBuf> = BTreeSet::new();
    for file in &files {
        let rel_path = file
            .strip_prefix(&options.input_root)
            .unwrap_or(file)
            .to_path_buf();
        let schema = load_schema(file)?;
        if has_scenario_annotations(&schema) {
            scenario_docs.insert(rel_path.clone());
        }
        documents.push((rel_path, schema));
    }

    let output_root = reset_output_root(&options.output_root)?;

    // Pass 2: rewrite and materialize.
    let mut reports = Vec::new();
    let mut scenarios_generated = 0;
    for (rel_path, schema) in documents {
        let report = preprocess_document(
            rel_path,
            schema,
            &scenario_docs,
            &output_root,
            options.fixup.as_ref(),
        )?;
        scenarios_generated += report.scenarios.len();
        reports.push(report);
    }

    Ok(Report {
        input_root: options.input_root.clone(),
        output_root,
        files_processed: reports.len(),
        scenarios_generated,
        files: reports,
    })
}

fn preprocess_document(
    rel_path: PathBuf,
    schema: Value,
    scenario_docs: &BTreeSet<PathBuf>,
    output_root: &Path,
    fixup: Option<&PathFixup>,
) -> Result<FileReport, PreprocessError> {
    let rel_dir = rel_path.parent().unwrap_or(Path::new("")).to_path_buf();

    let schema = match fixup {
        Some(fixup) if fixup.document == rel_path => {
            absolutize_sibling_refs(&schema, fixup, &output_root.join(&rel_dir))
        }
        _ => schema,
    };

    let schema = remove_extension_defs(schema);
    let schema = flatten_allof_defs(schema);

    let scenarios = generate_scenarios(&schema, scenario_docs, &rel_dir);

    // The base keeps its metadata; only scenario siblings are cleaned,
    // since their file names no longer match the original $id.
    write_schema(&output_root.join(&rel_path), &schema)?;

    let mut written = Vec::new();
    for (name, doc) in &scenarios {
        if name == BASE_SCENARIO {
            continue;
        }
        let out_path = output_root.join(scenario_file_name(&rel_path, name));
        write_schema(&out_path, &strip_codegen_keys(doc))?;
        written.push(name.clone());
    }

    Ok(FileReport {
        path: rel_path,
        scenarios: written,
    })
}

/// `types/order.json` + `create` -> `types/order_create_request.json`.
fn scenario_file_name(rel_path: &Path, scenario: &str) -> PathBuf {
    let stem = rel_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    rel_path.with_file_name(format!(
        "{}_{}_request.{}",
        stem, scenario, SCHEMA_EXTENSION
    ))
}

/// Delete and recreate the output root, returning its absolute path.
fn reset_output_root(output_root: &Path) -> Result<PathBuf, PreprocessError> {
    let write_err = |source| PreprocessError::WriteError {
        path: output_root.to_path_buf(),
        source,
    };

    if output_root.exists() {
        std::fs::remove_dir_all(output_root).map_err(write_err)?;
    }
    std::fs::create_dir_all(output_root).map_err(write_err)?;

    // Absolute so that fixed-up sibling references stay valid wherever
    // the generator runs from.
    output_root.canonicalize().map_err(write_err)
}
