//! Supported label languages and localized text.
//!
//! Labels, definitions, and titles are keyed by [`Language`]. The enum is
//! closed: definition data that uses any other language key is rejected at
//! load time, while query-time requests for other tags simply fall back to the
//! base language.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A supported label language.
///
/// Variant order is the canonical language order used for listings and for
/// interchange column layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English, the base language every entry must carry.
    En,
    /// German.
    De,
    /// French.
    Fr,
}

impl Language {
    /// The base language used as the fallback for every label lookup.
    pub const BASE: Language = Language::En;

    /// All supported languages in canonical order.
    pub const fn all() -> &'static [Language] {
        &[Self::En, Self::De, Self::Fr]
    }

    /// The lowercase language tag (e.g. `"de"`).
    pub const fn as_tag(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
            Self::Fr => "fr",
        }
    }

    /// Parse a language tag, ignoring case and any region subtag.
    ///
    /// Returns `None` for languages outside the supported set.
    ///
    /// ```
    /// use pce_model::Language;
    ///
    /// assert_eq!(Language::from_tag("de"), Some(Language::De));
    /// assert_eq!(Language::from_tag("fr-CH"), Some(Language::Fr));
    /// assert_eq!(Language::from_tag("es"), None);
    /// ```
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Self::En),
            "de" => Some(Self::De),
            "fr" => Some(Self::Fr),
            _ => None,
        }
    }

    /// Whether this is the base language.
    pub const fn is_base(&self) -> bool {
        matches!(self, Self::En)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Error returned when a language tag is not supported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported language tag '{tag}'")]
pub struct UnknownLanguage {
    /// The rejected tag.
    pub tag: String,
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| UnknownLanguage { tag: s.to_string() })
    }
}

/// Text in one or more languages, iterated in canonical language order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<Language, String>);

impl LocalizedText {
    /// Create empty localized text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Text with only a base-language value.
    pub fn base(text: impl Into<String>) -> Self {
        let mut out = Self::new();
        out.insert(Language::BASE, text);
        out
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, language: Language, text: impl Into<String>) -> Self {
        self.insert(language, text);
        self
    }

    /// Set the text for a language, replacing any previous value.
    pub fn insert(&mut self, language: Language, text: impl Into<String>) {
        self.0.insert(language, text.into());
    }

    /// Text for exactly this language, without fallback.
    pub fn get(&self, language: Language) -> Option<&str> {
        self.0.get(&language).map(String::as_str)
    }

    /// Text for the base language.
    pub fn base_text(&self) -> Option<&str> {
        self.get(Language::BASE)
    }

    /// Text for `language`, falling back to the base language.
    pub fn get_or_base(&self, language: Language) -> Option<&str> {
        self.get(language).or_else(|| self.base_text())
    }

    /// Whether a value exists for this language.
    pub fn contains(&self, language: Language) -> bool {
        self.0.contains_key(&language)
    }

    /// Languages that carry a value.
    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.0.keys().copied()
    }

    /// All `(language, text)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Language, &str)> {
        self.0.iter().map(|(lang, text)| (*lang, text.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(Language, String)> for LocalizedText {
    fn from_iter<T: IntoIterator<Item = (Language, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for language in Language::all() {
            assert_eq!(Language::from_tag(language.as_tag()), Some(*language));
        }
    }

    #[test]
    fn tag_parsing_ignores_case_and_region() {
        assert_eq!(Language::from_tag("DE"), Some(Language::De));
        assert_eq!(Language::from_tag("en_GB"), Some(Language::En));
        assert_eq!(Language::from_tag(""), None);
        assert!("it".parse::<Language>().is_err());
    }

    #[test]
    fn canonical_order_puts_base_first() {
        let text = LocalizedText::new()
            .with(Language::Fr, "Bonjour")
            .with(Language::En, "Hello")
            .with(Language::De, "Hallo");
        let order: Vec<Language> = text.languages().collect();
        assert_eq!(order, vec![Language::En, Language::De, Language::Fr]);
    }

    #[test]
    fn get_or_base_falls_back() {
        let text = LocalizedText::base("Hello");
        assert_eq!(text.get(Language::De), None);
        assert_eq!(text.get_or_base(Language::De), Some("Hello"));
    }
}
