//! Cascade-impact rules for privacy data classifications.
//!
//! Rule sets are grouped by compliance dimension and evaluated in order:
//!
//! - `data-sensitivity`: special category and criminal data
//! - `cross-border-transfer`: recipients outside the EU/EEA
//! - `retention`: deletion periods
//! - `protection-measures`: measures implied by the protection level
//!
//! # Example
//!
//! ```
//! use pce_cascade::CascadeService;
//! use pce_standards::CodelistRegistry;
//!
//! let registry = CodelistRegistry::load_defaults().expect("codelists");
//! let cascade = CascadeService::load_defaults(&registry).expect("rules");
//! let changes = cascade.suggest_changes("contact-data", "health-data");
//! assert!(!changes.is_empty());
//! ```

pub mod embedded;
pub mod error;
pub mod loader;
pub mod service;

pub use error::{CascadeLoadError, Result};
pub use loader::{parse_rule_set, parse_rule_sets};
pub use service::{
    BASELINE_LEVEL, CascadeImpact, CascadeService, ImpactAssessment, ImpactRequest,
    PROTECTION_LEVELS,
};
