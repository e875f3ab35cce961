//! Embedded codelist data.
//!
//! The default codelists and translation overlays are compiled in with
//! `include_str!()`, so [`crate::CodelistRegistry::load_defaults`] needs no
//! file system access.
//!
//! # Adding a codelist
//!
//! Drop a JSON definition into `data/codelists/` and list it in
//! [`CODELIST_FILES`]. Overlay rows for it go into `data/i18n/<lang>.csv`.

// =============================================================================
// Codelists
// =============================================================================

pub const ASSURANCE_GOALS: &str = include_str!("../data/codelists/assurance-goals.json");
pub const DATA_CATEGORIES: &str = include_str!("../data/codelists/data-categories.json");
pub const EVIDENCE_TYPES: &str = include_str!("../data/codelists/evidence-types.json");
pub const LEGAL_INSTRUMENTS: &str = include_str!("../data/codelists/legal-instruments.json");
pub const MAPPING_SCHEMES: &str = include_str!("../data/codelists/mapping-schemes.json");
pub const MATURITY_DOMAINS: &str = include_str!("../data/codelists/maturity-domains.json");
pub const MATURITY_LEVELS: &str = include_str!("../data/codelists/maturity-levels.json");
pub const MEASURE_TYPES: &str = include_str!("../data/codelists/measure-types.json");
pub const PROTECTION_LEVELS: &str = include_str!("../data/codelists/protection-levels.json");
pub const RECIPIENTS: &str = include_str!("../data/codelists/recipients.json");

/// All embedded codelist definitions as `(file name, contents)`, sorted by
/// file name to match directory loading order.
pub const CODELIST_FILES: &[(&str, &str)] = &[
    ("assurance-goals.json", ASSURANCE_GOALS),
    ("data-categories.json", DATA_CATEGORIES),
    ("evidence-types.json", EVIDENCE_TYPES),
    ("legal-instruments.json", LEGAL_INSTRUMENTS),
    ("mapping-schemes.json", MAPPING_SCHEMES),
    ("maturity-domains.json", MATURITY_DOMAINS),
    ("maturity-levels.json", MATURITY_LEVELS),
    ("measure-types.json", MEASURE_TYPES),
    ("protection-levels.json", PROTECTION_LEVELS),
    ("recipients.json", RECIPIENTS),
];

// =============================================================================
// Translation overlays
// =============================================================================

/// German overlay.
pub const I18N_DE: &str = include_str!("../data/i18n/de.csv");

/// French overlay.
pub const I18N_FR: &str = include_str!("../data/i18n/fr.csv");

/// Default overlays as `(file name, contents)`. The file stem is the language.
pub const OVERLAY_FILES: &[(&str, &str)] = &[("de.csv", I18N_DE), ("fr.csv", I18N_FR)];
