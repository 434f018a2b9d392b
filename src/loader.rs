//! Schema document I/O.
//!
//! Loading, writing, and enumeration of schema files. All pipeline stages
//! operate on in-memory [`serde_json::Value`] trees; this module is the
//! only place that touches the filesystem.

use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use crate::error::PreprocessError;
use crate::types::SCHEMA_EXTENSION;

/// Load a schema document from a file path.
///
/// # Errors
///
/// Returns `PreprocessError::ReadError` if the file can't be read,
/// or `PreprocessError::InvalidJson` if it isn't valid JSON.
pub fn load_schema(path: &Path) -> Result<Value, PreprocessError> {
    let content = std::fs::read_to_string(path).map_err(|source| PreprocessError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| PreprocessError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a schema document from a JSON string.
///
/// # Errors
///
/// Returns `PreprocessError::InvalidJson` if the string isn't valid JSON.
/// The given path is only used for the diagnostic.
pub fn load_schema_str(content: &str, path: &Path) -> Result<Value, PreprocessError> {
    serde_json::from_str(content).map_err(|source| PreprocessError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a schema document with stable 2-space indentation.
///
/// Creates parent directories as needed.
///
/// # Errors
///
/// Returns `PreprocessError::WriteError` if a directory or the file
/// can't be created.
pub fn write_schema(path: &Path, schema: &Value) -> Result<(), PreprocessError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| PreprocessError::WriteError {
            path: path.to_path_buf(),
            source,
        })?;
    }

    let mut content =
        serde_json::to_string_pretty(schema).map_err(|source| PreprocessError::SerializeError {
            path: path.to_path_buf(),
            source,
        })?;
    content.push('\n');

    std::fs::write(path, content).map_err(|source| PreprocessError::WriteError {
        path: path.to_path_buf(),
        source,
    })
}

/// Collect all schema files under a root, sorted for deterministic runs.
///
/// # Errors
///
/// Returns `PreprocessError::InputNotFound` if the root doesn't exist,
/// or `PreprocessError::ReadError` for unreadable directories.
pub fn collect_schema_files(root: &Path) -> Result<Vec<PathBuf>, PreprocessError> {
    if !root.is_dir() {
        return Err(PreprocessError::InputNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            PreprocessError::ReadError {
                path,
                source: e.into(),
            }
        })?;
        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .map(|e| e == SCHEMA_EXTENSION)
                .unwrap_or(false)
        {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Normalize a relative path, resolving `.` and `..` components lexically.
///
/// Used to compare `$ref` targets against the scenario-membership set
/// without touching the filesystem. Leading `..` segments that escape the
/// root are kept as-is.
pub fn normalize_path(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(parts.last(), Some(Component::Normal(_))) {
                    parts.pop();
                } else {
                    parts.push(component);
                }
            }
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}
