//! Error types for inference and emission.
//!
//! Every failure is reported to the immediate caller. Nothing here is
//! recovered by guessing a type or renaming a colliding declaration.

use thiserror::Error;

/// Result alias used across the library.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The top-level document is `[]`, so there is no element to infer from.
    #[error("top-level array is empty; cannot infer an element type")]
    EmptyArray,

    /// The document root is neither an object nor an array (or, for a schema,
    /// the root `type` is not `object`).
    #[error("unsupported root type: expected an object, found {found}")]
    UnsupportedRootType { found: String },

    /// A schema node declares a `type` outside the supported subset.
    #[error("unsupported schema type `{type_name}` at {path}")]
    UnsupportedSchemaType { type_name: String, path: String },

    /// A keyword the schema node cannot do without is absent.
    #[error("missing required schema field `{field}` at {path}")]
    MissingRequiredSchemaField { field: &'static str, path: String },

    /// A keyword is present but has the wrong shape.
    #[error("invalid schema field `{field}` at {path}: expected {expected}")]
    InvalidSchemaField {
        field: &'static str,
        path: String,
        expected: &'static str,
    },

    /// Two sibling nested declarations resolved to the same type name.
    #[error("duplicate nested type name `{name}` inside `{parent}`")]
    DuplicateNestedTypeName { parent: String, name: String },

    /// Emission options rejected at the API boundary.
    #[error("invalid emit option `{option}`: {message}")]
    InvalidOptions { option: &'static str, message: String },

    /// A configuration document failed to deserialize.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An input document is not well-formed JSON.
    #[error("malformed JSON: {0}")]
    Parse(String),

    /// `--json-pointer` selected nothing in the input document.
    #[error("JSON pointer `{pointer}` does not resolve")]
    PointerNotFound { pointer: String },

    /// Several inputs would be written to the same output file.
    #[error("output `{output}` would be written by every one of {}", .inputs.join(", "))]
    OutputCollision { output: String, inputs: Vec<String> },

    #[error("{action} `{path}`: {message}")]
    Io {
        action: &'static str,
        path: String,
        message: String,
    },
}

impl Error {
    pub(crate) fn missing(field: &'static str, path: &str) -> Self {
        Self::MissingRequiredSchemaField { field, path: path.to_string() }
    }

    pub(crate) fn invalid(field: &'static str, path: &str, expected: &'static str) -> Self {
        Self::InvalidSchemaField { field, path: path.to_string(), expected }
    }

    pub(crate) fn io(action: &'static str, path: &std::path::Path, err: std::io::Error) -> Self {
        Self::Io { action, path: path.display().to_string(), message: err.to_string() }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Short name for the kind of a JSON value, used in diagnostics.
pub(crate) fn kind_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
