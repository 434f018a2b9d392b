//! Core types for schema preprocessing.

use serde_json::Value;

/// The per-property request annotation key.
pub const REQUEST_ANNOTATION: &str = "ucp_request";

/// Top-level metadata keys stripped before code generation.
pub const CODEGEN_STRIP_KEYS: &[&str] = &["$id", "$schema"];

/// File extension of schema documents.
pub const SCHEMA_EXTENSION: &str = "json";

/// How a property is treated in a generated scenario document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Directive {
    /// Remove the property and drop it from `required`.
    Omit,
    /// Keep the property and ensure it's in `required`.
    Required,
    /// Keep the property but drop it from `required`.
    #[default]
    Optional,
}

impl Directive {
    /// Parse a directive from its annotation string.
    ///
    /// Returns `None` for unknown values; callers fall back to
    /// [`Directive::Optional`], the documented default.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "omit" => Some(Directive::Omit),
            "required" => Some(Directive::Required),
            "optional" => Some(Directive::Optional),
            _ => None,
        }
    }

    /// Resolve the directive for one scenario from a `ucp_request` annotation.
    ///
    /// Shorthand string annotations apply to every scenario; object-form
    /// annotations are looked up by scenario name. Missing keys and
    /// malformed annotations resolve to `Optional`.
    pub fn resolve(annotation: &Value, scenario: &str) -> Self {
        match annotation {
            Value::String(s) => Directive::parse(s).unwrap_or_default(),
            Value::Object(map) => match map.get(scenario) {
                Some(Value::String(s)) => Directive::parse(s).unwrap_or_default(),
                _ => Directive::Optional,
            },
            _ => Directive::Optional,
        }
    }
}
