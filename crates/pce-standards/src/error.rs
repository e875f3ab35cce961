//! Error types for codelist and overlay loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading codelist definitions or overlays.
///
/// Definition data is treated as trusted configuration: every variant is
/// fatal for the loader that raised it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    /// Failed to read a definition file or directory.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Definition source is not valid JSON, or does not match the record shape.
    #[error("Invalid JSON in {source_name}: {source}")]
    Json {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Overlay source is not valid CSV.
    #[error("Failed to read CSV {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    /// A record carries a field outside its closed schema.
    #[error("Unknown field '{field}' at {path} in {source_name}")]
    UnknownField {
        source_name: String,
        path: String,
        field: String,
    },

    /// A required field is absent.
    #[error("Missing required field '{field}' at {path} in {source_name}")]
    MissingField {
        source_name: String,
        path: String,
        field: String,
    },

    /// A field is present but its value is unusable.
    #[error("Invalid value at {path} in {source_name}: {message}")]
    InvalidValue {
        source_name: String,
        path: String,
        message: String,
    },

    /// A language key outside the supported set.
    #[error("Unsupported language '{tag}' at {path} in {source_name}")]
    UnknownLanguage {
        source_name: String,
        path: String,
        tag: String,
    },

    /// A label map without a base-language (`en`) value.
    #[error("Missing base-language label at {path} in {source_name}")]
    MissingBaseLabel { source_name: String, path: String },

    #[error("Duplicate code '{code}' in codelist '{codelist}'")]
    DuplicateCode { codelist: String, code: String },

    #[error("Codelist '{name}' is defined more than once")]
    DuplicateCodelist { name: String },

    #[error("Duplicate overlay entry for '{codelist}/{code}' in {source_name}")]
    DuplicateOverlayEntry {
        source_name: String,
        codelist: String,
        code: String,
    },
}

/// Requested codelist is not registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown codelist '{name}'")]
pub struct NotFound {
    pub name: String,
}

impl NotFound {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Result type for loading operations.
pub type Result<T> = std::result::Result<T, LoadError>;
