//! Embedded cascade rule sets.
//!
//! Rule sets are evaluated in the order of [`RULE_FILES`]. The file name
//! prefixes keep a data directory copy in the same order, since directory
//! loading sorts by file name.

pub const DATA_SENSITIVITY: &str = include_str!("../data/cascade_rules/01-data-sensitivity.json");
pub const CROSS_BORDER_TRANSFER: &str =
    include_str!("../data/cascade_rules/02-cross-border-transfer.json");
pub const RETENTION: &str = include_str!("../data/cascade_rules/03-retention.json");
pub const PROTECTION_MEASURES: &str =
    include_str!("../data/cascade_rules/04-protection-measures.json");

/// Default rule sets as `(file name, contents)` in evaluation order.
pub const RULE_FILES: &[(&str, &str)] = &[
    ("01-data-sensitivity.json", DATA_SENSITIVITY),
    ("02-cross-border-transfer.json", CROSS_BORDER_TRANSFER),
    ("03-retention.json", RETENTION),
    ("04-protection-measures.json", PROTECTION_MEASURES),
];
