//! Cascade rule definitions.
//!
//! A [`RuleSet`] groups the rules of one compliance dimension. Each
//! [`CascadeRule`] pairs a [`Trigger`] (which code, in which list, under which
//! condition) with the [`CascadeEffect`]s that follow when it fires.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codelist::CodeEntry;
use crate::language::LocalizedText;

/// Effect severity, ordered `Info < Warning < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a requirement acts on its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Target must be at least `value` (ranked by list order).
    SetMinimum,
    /// Target must be at most `value`.
    SetMaximum,
    /// Target must be present and equal `value`.
    Require,
    /// Advisory marker, nothing is enforced.
    Flag,
}

impl Operator {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SetMinimum => "set_minimum",
            Self::SetMaximum => "set_maximum",
            Self::Require => "require",
            Self::Flag => "flag",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured downstream requirement.
///
/// Two requirements are the same when all four fields are equal; this is the
/// identity used to diff the effects of two classifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Requirement {
    pub target_list: String,
    pub target_field: String,
    pub operator: Operator,
    pub value: String,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} {} {}",
            self.target_list, self.target_field, self.operator, self.value
        )
    }
}

/// One consequence of a fired rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeEffect {
    pub severity: Severity,
    pub description: LocalizedText,
    pub requirement: Requirement,
}

/// What kind of input a trigger inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    /// The data classification being assessed.
    Classification,
    /// Each recipient of the data.
    Recipient,
    /// The effective protection level after the first pass.
    ProtectionLevel,
}

impl Subject {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Classification => "classification",
            Self::Recipient => "recipient",
            Self::ProtectionLevel => "protection_level",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a malformed field reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid field reference '{0}' (expected 'code' or 'metadata.<key>')")]
pub struct InvalidFieldRef(pub String);

/// Which attribute of a code entry a trigger compares.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldRef {
    Code,
    Metadata(String),
}

impl FieldRef {
    /// Resolve the referenced value on an entry.
    pub fn resolve<'a>(&self, entry: &'a CodeEntry) -> Option<&'a str> {
        match self {
            Self::Code => Some(entry.code.as_str()),
            Self::Metadata(key) => entry.metadata_value(key),
        }
    }
}

impl FromStr for FieldRef {
    type Err = InvalidFieldRef;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "code" {
            return Ok(Self::Code);
        }
        match s.strip_prefix("metadata.") {
            Some(key) if !key.is_empty() => Ok(Self::Metadata(key.to_string())),
            _ => Err(InvalidFieldRef(s.to_string())),
        }
    }
}

impl TryFrom<String> for FieldRef {
    type Error = InvalidFieldRef;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldRef> for String {
    fn from(value: FieldRef) -> Self {
        value.to_string()
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code => f.write_str("code"),
            Self::Metadata(key) => write!(f, "metadata.{key}"),
        }
    }
}

/// Comparison applied to the resolved field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Equals(String),
    NotEquals(String),
    In(Vec<String>),
}

impl Condition {
    /// Test a resolved value. An absent value never matches, not even
    /// `NotEquals`.
    pub fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match self {
            Self::Equals(expected) => value == expected,
            Self::NotEquals(expected) => value != expected,
            Self::In(options) => options.iter().any(|o| o == value),
        }
    }

    /// The literal values the condition compares against.
    pub fn operands(&self) -> Vec<&str> {
        match self {
            Self::Equals(v) | Self::NotEquals(v) => vec![v.as_str()],
            Self::In(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

/// When a rule fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub subject: Subject,
    /// Codelist the subject code is resolved in.
    pub list: String,
    pub field: FieldRef,
    pub condition: Condition,
    /// Only fire while the current protection level ranks strictly below
    /// this level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protection_below: Option<String>,
}

impl Trigger {
    /// Whether the trigger's field condition holds for this entry. The
    /// `protection_below` guard is checked by the evaluator, which knows the
    /// level ranking.
    pub fn matches_entry(&self, entry: &CodeEntry) -> bool {
        self.condition.matches(self.field.resolve(entry))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeRule {
    pub rule_id: String,
    pub description: LocalizedText,
    pub trigger: Trigger,
    pub effects: Vec<CascadeEffect>,
}

/// All rules of one compliance dimension, in authoring order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub dimension: String,
    pub version: String,
    pub rules: Vec<CascadeRule>,
}

impl RuleSet {
    pub fn rule(&self, rule_id: &str) -> Option<&CascadeRule> {
        self.rules.iter().find(|r| r.rule_id == rule_id)
    }
}
