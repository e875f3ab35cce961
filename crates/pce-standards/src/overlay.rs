//! Translation overlays.
//!
//! An overlay supplies or overrides labels (and optionally definitions) for
//! codes in one language without touching the codelist definitions. Overlay
//! sources are CSV files named after their language (`fr.csv`) with exactly
//! these columns:
//!
//! ```text
//! codelist,code,label,definition
//! data-categories,health-data,Données de santé,"Données relatives à la santé"
//! ```

use std::collections::BTreeMap;
use std::io::Cursor;

use pce_model::Language;
use serde::Deserialize;

use crate::error::{LoadError, Result};
use crate::paths::file_stem;
use crate::schema::invalid;

/// Columns an overlay file must carry, in any order.
pub const OVERLAY_COLUMNS: [&str; 4] = ["codelist", "code", "label", "definition"];

/// Overlay text for one code in one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayText {
    pub label: Option<String>,
    pub definition: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OverlayRow {
    codelist: String,
    code: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    definition: String,
}

type CodeTexts = BTreeMap<String, OverlayText>;

/// Per-language label and definition overrides keyed by `(codelist, code)`.
#[derive(Debug, Clone, Default)]
pub struct TranslationOverlay {
    languages: BTreeMap<Language, BTreeMap<String, CodeTexts>>,
}

impl TranslationOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(file name, contents)` overlay sources.
    pub fn from_sources<'a, I>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut overlay = Self::new();
        for (file_name, content) in sources {
            overlay.add_csv(file_name, content)?;
        }
        Ok(overlay)
    }

    /// Add one overlay CSV. The language is taken from the file stem.
    pub fn add_csv(&mut self, file_name: &str, content: &str) -> Result<()> {
        let stem = file_stem(file_name);
        let language = Language::from_tag(stem)
            .filter(|l| l.as_tag() == stem)
            .ok_or_else(|| LoadError::UnknownLanguage {
                source_name: file_name.to_string(),
                path: "file name".to_string(),
                tag: stem.to_string(),
            })?;
        self.add_csv_for(language, content, file_name)
    }

    /// Add overlay rows for an explicit language.
    pub fn add_csv_for(
        &mut self,
        language: Language,
        content: &str,
        source_name: &str,
    ) -> Result<()> {
        let csv_err = |source| LoadError::Csv {
            source_name: source_name.to_string(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(Cursor::new(content.as_bytes()));

        let headers = reader.headers().map_err(csv_err)?.clone();
        check_headers(&headers, source_name)?;

        let mut added = 0usize;
        for (index, result) in reader.deserialize::<OverlayRow>().enumerate() {
            let row = result.map_err(csv_err)?;
            // Header is line 1.
            let line = index + 2;
            let path = format!("line {line}");

            if row.codelist.is_empty() {
                return Err(invalid(source_name, &path, "codelist is empty"));
            }
            if row.code.is_empty() {
                return Err(invalid(source_name, &path, "code is empty"));
            }
            let text = OverlayText {
                label: non_empty(row.label),
                definition: non_empty(row.definition),
            };
            if text.label.is_none() && text.definition.is_none() {
                return Err(invalid(
                    source_name,
                    &path,
                    "row has neither a label nor a definition",
                ));
            }
            self.insert(language, row.codelist, row.code, text, source_name)?;
            added += 1;
        }

        tracing::debug!(
            file = %source_name,
            language = %language,
            rows = added,
            "Loaded translation overlay"
        );
        Ok(())
    }

    /// Insert one overlay entry. A second entry for the same key is an error.
    pub fn insert(
        &mut self,
        language: Language,
        codelist: String,
        code: String,
        text: OverlayText,
        source_name: &str,
    ) -> Result<()> {
        let codes = self
            .languages
            .entry(language)
            .or_default()
            .entry(codelist.clone())
            .or_default();
        if codes.contains_key(&code) {
            return Err(LoadError::DuplicateOverlayEntry {
                source_name: source_name.to_string(),
                codelist,
                code,
            });
        }
        codes.insert(code, text);
        Ok(())
    }

    fn text(&self, codelist: &str, code: &str, language: Language) -> Option<&OverlayText> {
        self.languages.get(&language)?.get(codelist)?.get(code)
    }

    /// Overlay label for exactly this key, without fallback.
    pub fn label(&self, codelist: &str, code: &str, language: Language) -> Option<&str> {
        self.text(codelist, code, language)?.label.as_deref()
    }

    /// Overlay definition for exactly this key, without fallback.
    pub fn definition(&self, codelist: &str, code: &str, language: Language) -> Option<&str> {
        self.text(codelist, code, language)?.definition.as_deref()
    }

    /// Languages with at least one overlay entry.
    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.languages.keys().copied()
    }

    pub fn contains_language(&self, language: Language) -> bool {
        self.languages.contains_key(&language)
    }

    /// `(language, codelist, code)` for every entry, in key order.
    pub fn keys(&self) -> impl Iterator<Item = (Language, &str, &str)> {
        self.languages.iter().flat_map(|(language, lists)| {
            lists.iter().flat_map(move |(list, codes)| {
                codes
                    .keys()
                    .map(move |code| (*language, list.as_str(), code.as_str()))
            })
        })
    }

    /// Total number of entries across all languages.
    pub fn len(&self) -> usize {
        self.languages
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_headers(headers: &csv::StringRecord, source_name: &str) -> Result<()> {
    if let Some(unknown) = headers.iter().find(|h| !OVERLAY_COLUMNS.contains(h)) {
        return Err(LoadError::UnknownField {
            source_name: source_name.to_string(),
            path: "header".to_string(),
            field: unknown.to_string(),
        });
    }
    if let Some(missing) = OVERLAY_COLUMNS
        .iter()
        .find(|c| !headers.iter().any(|h| h == **c))
    {
        return Err(LoadError::MissingField {
            source_name: source_name.to_string(),
            path: "header".to_string(),
            field: (*missing).to_string(),
        });
    }
    Ok(())
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_labels_and_definitions() {
        let csv = "codelist,code,label,definition\n\
                   data-categories,health-data,Données de santé,Données relatives à la santé\n\
                   data-categories,contact-data,Coordonnées,\n";
        let overlay = TranslationOverlay::from_sources([("fr.csv", csv)]).expect("load");
        assert_eq!(
            overlay.label("data-categories", "health-data", Language::Fr),
            Some("Données de santé")
        );
        assert_eq!(
            overlay.definition("data-categories", "contact-data", Language::Fr),
            None
        );
        assert_eq!(overlay.label("data-categories", "health-data", Language::De), None);
        assert_eq!(overlay.len(), 2);
        assert!(overlay.contains_language(Language::Fr));
        assert!(!overlay.contains_language(Language::De));
    }

    #[test]
    fn column_order_is_free() {
        let csv = "code,codelist,definition,label\nbaseline,protection-levels,,Base\n";
        let overlay = TranslationOverlay::from_sources([("de.csv", csv)]).expect("load");
        assert_eq!(
            overlay.label("protection-levels", "baseline", Language::De),
            Some("Base")
        );
    }

    #[test]
    fn rejects_unknown_column() {
        let csv = "codelist,code,label,definition,note\nx,y,z,,n\n";
        let err = TranslationOverlay::from_sources([("fr.csv", csv)]).unwrap_err();
        assert!(matches!(err, LoadError::UnknownField { ref field, .. } if field == "note"));
    }

    #[test]
    fn rejects_missing_column() {
        let csv = "codelist,code,label\nx,y,z\n";
        let err = TranslationOverlay::from_sources([("fr.csv", csv)]).unwrap_err();
        assert!(matches!(err, LoadError::MissingField { ref field, .. } if field == "definition"));
    }

    #[test]
    fn rejects_duplicate_key() {
        let csv = "codelist,code,label,definition\nx,y,A,\nx,y,B,\n";
        let err = TranslationOverlay::from_sources([("fr.csv", csv)]).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateOverlayEntry { .. }));
    }

    #[test]
    fn rejects_empty_row() {
        let csv = "codelist,code,label,definition\nx,y,,\n";
        let err = TranslationOverlay::from_sources([("fr.csv", csv)]).unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { ref path, .. } if path == "line 2"));
    }

    #[test]
    fn rejects_unsupported_file_language() {
        let csv = "codelist,code,label,definition\nx,y,z,\n";
        let err = TranslationOverlay::from_sources([("es.csv", csv)]).unwrap_err();
        assert!(matches!(err, LoadError::UnknownLanguage { ref tag, .. } if tag == "es"));
    }
}
