//! Data model for the privacy codelist engine.
//!
//! Plain, immutable value types shared by the registry, the cascade
//! evaluator, and the interchange codec.

pub mod cascade;
pub mod codelist;
pub mod language;
pub mod property;

pub use cascade::{
    CascadeEffect, CascadeRule, Condition, FieldRef, InvalidFieldRef, Operator, Requirement,
    RuleSet, Severity, Subject, Trigger,
};
pub use codelist::{
    CodeEntry, Codelist, META_DEPRECATED, META_GDPR_ARTICLE, META_GROUP, META_XOEV_CODE,
};
pub use language::{Language, LocalizedText, UnknownLanguage};
pub use property::{CODELIST_NAMESPACE, IssueSeverity, Property, ValidationIssue};
