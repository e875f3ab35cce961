//! Error types for Genericode export and import.

use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Errors raised while writing a Genericode document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error("Failed to write Genericode XML: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to write Genericode XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Generated XML is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    #[error("Failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors raised while reading a Genericode document.
///
/// Row numbers are 1-based in document order.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FormatError {
    // =========================================================================
    // XML SYNTAX ERRORS
    // =========================================================================
    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Element <{name}> is never closed")]
    UnclosedElement { name: String },

    #[error("Unknown entity reference '&{name};'")]
    UnknownEntity { name: String },

    #[error("Document has no root element")]
    EmptyDocument,

    // =========================================================================
    // DOCUMENT STRUCTURE ERRORS
    // =========================================================================
    #[error("Expected root element <gc:CodeList>, found <{found}>")]
    WrongRoot { found: String },

    #[error("Missing element {path}")]
    MissingElement { path: String },

    #[error("Missing attribute '{attribute}' on {path}")]
    MissingAttribute { path: String, attribute: String },

    #[error("Unsupported language '{tag}' at {path}")]
    UnknownLanguage { path: String, tag: String },

    // =========================================================================
    // COLUMN ERRORS
    // =========================================================================
    #[error("Column set has no 'code' column")]
    MissingCodeColumn,

    #[error("Unknown column '{id}'")]
    UnknownColumn { id: String },

    #[error("Column '{id}' is declared more than once")]
    DuplicateColumn { id: String },

    // =========================================================================
    // ROW ERRORS
    // =========================================================================
    #[error("Row {row}: expected {expected} values, found {found}")]
    ValueCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row}, value {position}: ColumnRef '{found}' does not match column '{expected}'")]
    ColumnMismatch {
        row: usize,
        position: usize,
        expected: String,
        found: String,
    },

    #[error("Row {row}: missing code")]
    MissingCode { row: usize },

    #[error("Row {row}: code '{code}' has no base-language label")]
    MissingBaseLabel { row: usize, code: String },

    #[error("Row {row}: duplicate code '{code}'")]
    DuplicateCode { row: usize, code: String },
}
