//! Privacy codelist definitions, translation overlays, and the registry.
//!
//! This crate provides:
//!
//! - **Embedded codelists** compiled in from `data/codelists/*.json`
//! - **Closed-schema loaders** that reject malformed definitions up front
//! - **Translation overlays** (`data/i18n/<lang>.csv`) for extra languages
//! - [`CodelistRegistry`] for validation, labels, and search
//! - **Property helpers** for codelist-tagged document properties
//!
//! # Data Directory Structure
//!
//! ```text
//! data/
//! ├── codelists/          # One JSON definition per codelist
//! │   ├── data-categories.json
//! │   └── protection-levels.json
//! ├── i18n/               # Overlays, file stem is the language
//! │   ├── de.csv
//! │   └── fr.csv
//! └── cascade_rules/      # Rule sets (read by pce-cascade)
//! ```
//!
//! Set `PCE_DATA_DIR` to load from a directory instead of the embedded data.
//!
//! # Example
//!
//! ```
//! use pce_standards::CodelistRegistry;
//!
//! let registry = CodelistRegistry::load_defaults().expect("embedded data is valid");
//! assert!(registry.validate_code("data-categories", "health-data"));
//! assert_eq!(
//!     registry.get_label("data-categories", "health-data", "de"),
//!     Some("Gesundheitsdaten")
//! );
//! ```

pub mod embedded;
pub mod error;
pub mod loader;
pub mod overlay;
pub mod paths;
pub mod props;
pub mod registry;
pub mod schema;

pub use error::{LoadError, NotFound, Result};
pub use loader::{localized_text, parse_codelist, parse_codelists};
pub use overlay::{OverlayText, TranslationOverlay};
pub use paths::{DATA_DIR_ENV_VAR, data_dir_override};
pub use props::{create_codelist_prop, extract_codelist_codes, validate_codelist_props};
pub use registry::{CodelistRegistry, DataSource, RegistryConfig};
