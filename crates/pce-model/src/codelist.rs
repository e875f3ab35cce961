//! Codelists and their entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::language::{Language, LocalizedText};

/// Metadata key that assigns an entry to a group (e.g. `special`).
pub const META_GROUP: &str = "group";
/// Metadata key marking a retired code when its value is `"true"`.
pub const META_DEPRECATED: &str = "deprecated";
/// Metadata key holding the XÖV cross-reference id.
pub const META_XOEV_CODE: &str = "xoev_code";
/// Metadata key holding the GDPR article reference.
pub const META_GDPR_ARTICLE: &str = "gdpr_article";

/// A single code within a codelist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeEntry {
    pub code: String,
    pub labels: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<LocalizedText>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl CodeEntry {
    /// Entry with a base-language label and nothing else.
    pub fn new(code: impl Into<String>, base_label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            labels: LocalizedText::base(base_label),
            definition: None,
            metadata: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, language: Language, label: impl Into<String>) -> Self {
        self.labels.insert(language, label);
        self
    }

    #[must_use]
    pub fn with_definition(mut self, language: Language, text: impl Into<String>) -> Self {
        self.definition
            .get_or_insert_with(LocalizedText::new)
            .insert(language, text);
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Own label in exactly this language.
    pub fn label(&self, language: Language) -> Option<&str> {
        self.labels.get(language)
    }

    /// Base-language label.
    pub fn base_label(&self) -> Option<&str> {
        self.labels.base_text()
    }

    /// Own definition in exactly this language.
    pub fn definition(&self, language: Language) -> Option<&str> {
        self.definition.as_ref().and_then(|d| d.get(language))
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// The `group` metadata value, if any.
    pub fn group(&self) -> Option<&str> {
        self.metadata_value(META_GROUP)
    }

    /// Whether the entry is marked as retired.
    pub fn is_deprecated(&self) -> bool {
        self.metadata_value(META_DEPRECATED)
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    pub fn xoev_code(&self) -> Option<&str> {
        self.metadata_value(META_XOEV_CODE)
    }
}

/// A named, versioned vocabulary of codes in authoring order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Codelist {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub namespace_uri: String,
    pub title: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub entries: Vec<CodeEntry>,
}

impl Codelist {
    /// Create an empty codelist with a base-language title.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        base_title: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            namespace_uri: String::new(),
            title: LocalizedText::base(base_title),
            source: None,
            entries: Vec::new(),
        }
    }

    /// Entry with this exact (case-sensitive) code.
    pub fn get(&self, code: &str) -> Option<&CodeEntry> {
        self.entries.iter().find(|e| e.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// All codes in authoring order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.code.as_str())
    }

    /// Entries not marked as deprecated.
    pub fn active_entries(&self) -> impl Iterator<Item = &CodeEntry> {
        self.entries.iter().filter(|e| !e.is_deprecated())
    }

    /// Entries whose `group` metadata equals `group`.
    pub fn entries_in_group(&self, group: &str) -> Vec<&CodeEntry> {
        self.entries
            .iter()
            .filter(|e| e.group() == Some(group))
            .collect()
    }

    /// Position of a code in authoring order.
    pub fn position(&self, code: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.code == code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Codelist {
        let mut list = Codelist::new("data-categories", "1.0", "Data categories");
        list.entries = vec![
            CodeEntry::new("contact-data", "Contact data").with_metadata(META_GROUP, "general"),
            CodeEntry::new("health-data", "Health data")
                .with_label(Language::De, "Gesundheitsdaten")
                .with_metadata(META_GROUP, "special"),
            CodeEntry::new("sensitive-data", "Sensitive data")
                .with_metadata(META_DEPRECATED, "true"),
        ];
        list
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let list = sample();
        assert!(list.contains("health-data"));
        assert!(!list.contains("Health-Data"));
        assert_eq!(list.position("sensitive-data"), Some(2));
    }

    #[test]
    fn active_entries_skip_deprecated() {
        let list = sample();
        let active: Vec<&str> = list.active_entries().map(|e| e.code.as_str()).collect();
        assert_eq!(active, vec!["contact-data", "health-data"]);
    }

    #[test]
    fn group_filter() {
        let list = sample();
        let special: Vec<&str> = list
            .entries_in_group("special")
            .into_iter()
            .map(|e| e.code.as_str())
            .collect();
        assert_eq!(special, vec!["health-data"]);
    }

    #[test]
    fn entry_accessors() {
        let entry = CodeEntry::new("health-data", "Health data")
            .with_definition(Language::En, "Data concerning health.");
        assert_eq!(entry.base_label(), Some("Health data"));
        assert_eq!(entry.definition(Language::En), Some("Data concerning health."));
        assert_eq!(entry.definition(Language::De), None);
        assert!(!entry.is_deprecated());
    }
}
