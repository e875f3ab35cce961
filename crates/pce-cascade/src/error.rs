//! Error types for rule-set loading.

use pce_standards::LoadError;
use thiserror::Error;

/// Errors raised while loading or validating cascade rule sets.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CascadeLoadError {
    /// Structural problem in a rule file (I/O, JSON, closed schema, languages).
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Rule id '{rule_id}' is defined more than once (again in dimension '{dimension}')")]
    DuplicateRuleId { rule_id: String, dimension: String },

    #[error("Dimension '{dimension}' is defined by more than one rule set")]
    DuplicateDimension { dimension: String },

    /// Trigger or requirement names a codelist the registry does not have.
    #[error("Rule '{rule_id}' references unknown codelist '{list}'")]
    UnknownCodelist { rule_id: String, list: String },

    /// A code literal that is not in its codelist.
    #[error("Rule '{rule_id}' references unknown code '{code}' in codelist '{list}'")]
    UnknownCode {
        rule_id: String,
        list: String,
        code: String,
    },

    #[error("Rule '{rule_id}' references unknown protection level '{level}'")]
    UnknownProtectionLevel { rule_id: String, level: String },

    #[error("Invalid field reference '{field}' at {path} in {source_name}")]
    InvalidFieldRef {
        source_name: String,
        path: String,
        field: String,
    },
}

/// Result type for rule loading.
pub type Result<T> = std::result::Result<T, CascadeLoadError>;
