//! OASIS Genericode 1.0 interchange for codelists.
//!
//! A codelist is written as one `gc:CodeList` document: identification, a
//! column set, and one row per entry. Columns follow a fixed layout:
//!
//! - `code`: the entry code (the key column)
//! - `name-<lang>`: one label column per supported language
//! - `definition-<lang>`: one column per language used by any definition
//! - `meta-<key>`: one column per metadata key, sorted by key
//!
//! Importing an exported document yields the original codelist.
//!
//! ```
//! use pce_genericode::{export_genericode, import_genericode};
//! use pce_model::{CodeEntry, Codelist, Language};
//!
//! let mut list = Codelist::new("protection-levels", "1.0", "Protection levels");
//! list.entries.push(CodeEntry::new("enhanced", "Enhanced").with_label(Language::De, "Hoch"));
//!
//! let xml = export_genericode(&list).expect("export");
//! assert_eq!(import_genericode(&xml).expect("import"), list);
//! ```

pub mod columns;
pub mod error;
pub mod export;
pub mod import;

pub use columns::{Column, column_layout};
pub use error::{ExportError, FormatError};
pub use export::{GENERICODE_NS, export_genericode, export_genericode_to_file};
pub use import::import_genericode;
