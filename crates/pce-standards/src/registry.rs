//! Codelist registry.
//!
//! The registry owns every loaded [`Codelist`] together with the
//! [`TranslationOverlay`] and answers membership, label, and search queries.
//! It is built once and immutable afterwards; share it by reference.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pce_model::{CodeEntry, Codelist, Language};

use crate::embedded;
use crate::error::{LoadError, NotFound, Result};
use crate::loader::parse_codelists;
use crate::overlay::TranslationOverlay;
use crate::paths::{self, codelists_dir, data_dir_override, i18n_dir};

/// Where definition data comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DataSource {
    /// Data compiled into the binary.
    #[default]
    Embedded,
    /// A data directory with `codelists/` and `i18n/` subdirectories.
    Directory(PathBuf),
}

/// Configuration for loading the registry.
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    pub source: DataSource,
}

impl RegistryConfig {
    pub fn embedded() -> Self {
        Self::default()
    }

    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            source: DataSource::Directory(path.into()),
        }
    }

    /// Embedded data unless `PCE_DATA_DIR` names a directory.
    pub fn from_env() -> Self {
        data_dir_override().map_or_else(Self::embedded, Self::directory)
    }

    /// Directory override wins over the environment.
    pub fn resolve(data_dir: Option<&Path>) -> Self {
        match data_dir {
            Some(dir) => Self::directory(dir),
            None => Self::from_env(),
        }
    }
}

/// All loaded codelists plus their translation overlay.
#[derive(Debug, Clone)]
pub struct CodelistRegistry {
    codelists: BTreeMap<String, Codelist>,
    overlay: TranslationOverlay,
}

impl CodelistRegistry {
    /// Build a registry from already parsed codelists.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::DuplicateCodelist`] when two lists share a name.
    /// Overlay rows for unknown lists or codes are logged and kept.
    pub fn new(codelists: Vec<Codelist>, overlay: TranslationOverlay) -> Result<Self> {
        let mut by_name = BTreeMap::new();
        for list in codelists {
            if by_name.contains_key(&list.name) {
                return Err(LoadError::DuplicateCodelist { name: list.name });
            }
            by_name.insert(list.name.clone(), list);
        }

        let registry = Self {
            codelists: by_name,
            overlay,
        };
        registry.warn_orphan_overlay_rows();

        tracing::info!(
            codelists = registry.codelists.len(),
            overlay_entries = registry.overlay.len(),
            "Codelist registry ready"
        );
        Ok(registry)
    }

    /// Load the embedded codelists and default overlays.
    pub fn load_defaults() -> Result<Self> {
        Self::load(&RegistryConfig::embedded())
    }

    /// Load with the given configuration.
    pub fn load(config: &RegistryConfig) -> Result<Self> {
        match &config.source {
            DataSource::Embedded => {
                let codelists = parse_codelists(embedded::CODELIST_FILES.iter().copied())?;
                let overlay =
                    TranslationOverlay::from_sources(embedded::OVERLAY_FILES.iter().copied())?;
                Self::new(codelists, overlay)
            }
            DataSource::Directory(dir) => Self::load_dir(dir),
        }
    }

    /// Load `codelists/*.json` and `i18n/<lang>.csv` from a data directory.
    pub fn load_dir(root: &Path) -> Result<Self> {
        tracing::debug!(path = %root.display(), "Loading codelists from directory");

        let definitions = paths::read_sorted(&codelists_dir(root), "json", true)?;
        let codelists = parse_codelists(
            definitions
                .iter()
                .map(|(name, content)| (name.as_str(), content.as_str())),
        )?;

        let overlays = paths::read_sorted(&i18n_dir(root), "csv", false)?;
        let overlay = TranslationOverlay::from_sources(
            overlays
                .iter()
                .map(|(name, content)| (name.as_str(), content.as_str())),
        )?;

        Self::new(codelists, overlay)
    }

    fn warn_orphan_overlay_rows(&self) {
        let mut orphan_count = 0u32;
        for (language, list, code) in self.overlay.keys() {
            let known = self.codelists.get(list).is_some_and(|l| l.contains(code));
            if known {
                continue;
            }
            orphan_count += 1;
            if orphan_count <= 5 {
                tracing::warn!(
                    language = %language,
                    codelist = %list,
                    code = %code,
                    "Overlay row references unknown codelist or code"
                );
            }
        }
        if orphan_count > 0 {
            tracing::warn!(
                orphan_count,
                "Translation overlay contains rows that never resolve"
            );
        }
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Registered codelist names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.codelists.keys().map(String::as_str)
    }

    pub fn codelist(&self, name: &str) -> Option<&Codelist> {
        self.codelists.get(name)
    }

    /// Iterate every codelist in name order.
    pub fn codelists(&self) -> impl Iterator<Item = &Codelist> {
        self.codelists.values()
    }

    pub fn overlay(&self) -> &TranslationOverlay {
        &self.overlay
    }

    pub fn resolve_code(&self, name: &str, code: &str) -> Option<&CodeEntry> {
        self.codelists.get(name)?.get(code)
    }

    /// True iff the list exists and contains this exact code.
    ///
    /// An unknown list is `false`, not an error. Deprecated codes validate.
    pub fn validate_code(&self, name: &str, code: &str) -> bool {
        self.resolve_code(name, code).is_some()
    }

    /// Display label for a code.
    ///
    /// Resolution order for `lang`:
    /// 1. overlay label in `lang`
    /// 2. the entry's own label in `lang`
    /// 3. overlay label in the base language
    /// 4. the entry's own base label
    /// 5. the raw code
    ///
    /// An unsupported `lang` skips straight to step 3. Returns `None` only
    /// when the list or code does not exist.
    pub fn get_label(&self, name: &str, code: &str, lang: &str) -> Option<&str> {
        let entry = self.resolve_code(name, code)?;
        let requested = Language::from_tag(lang);
        requested
            .and_then(|l| {
                self.overlay
                    .label(name, code, l)
                    .or_else(|| entry.label(l))
            })
            .or_else(|| self.overlay.label(name, code, Language::BASE))
            .or_else(|| entry.base_label())
            .or(Some(entry.code.as_str()))
    }

    /// Long-form definition, with the same fallback chain as
    /// [`get_label`](Self::get_label) minus the raw-code step.
    pub fn get_definition(&self, name: &str, code: &str, lang: &str) -> Option<&str> {
        let entry = self.resolve_code(name, code)?;
        Language::from_tag(lang)
            .and_then(|l| {
                self.overlay
                    .definition(name, code, l)
                    .or_else(|| entry.definition(l))
            })
            .or_else(|| self.overlay.definition(name, code, Language::BASE))
            .or_else(|| entry.definition(Language::BASE))
    }

    /// Case-insensitive substring search over codes and every available label.
    ///
    /// Matches keep authoring order. An empty result is not an error.
    pub fn search(
        &self,
        name: &str,
        query: &str,
    ) -> std::result::Result<Vec<&CodeEntry>, NotFound> {
        let list = self.codelists.get(name).ok_or_else(|| NotFound::new(name))?;
        let needle = query.to_lowercase();
        let hit = |text: &str| text.to_lowercase().contains(&needle);

        Ok(list
            .entries
            .iter()
            .filter(|entry| {
                hit(&entry.code)
                    || entry.labels.iter().any(|(_, label)| hit(label))
                    || Language::all().iter().any(|l| {
                        self.overlay
                            .label(name, &entry.code, *l)
                            .is_some_and(&hit)
                    })
            })
            .collect())
    }

    /// Every entry of a list in authoring order.
    pub fn list_codes(&self, name: &str) -> std::result::Result<&[CodeEntry], NotFound> {
        self.codelists
            .get(name)
            .map(|l| l.entries.as_slice())
            .ok_or_else(|| NotFound::new(name))
    }

    /// Entries whose `group` metadata equals `group`.
    pub fn list_codes_in_group(
        &self,
        name: &str,
        group: &str,
    ) -> std::result::Result<Vec<&CodeEntry>, NotFound> {
        let list = self.codelists.get(name).ok_or_else(|| NotFound::new(name))?;
        Ok(list.entries_in_group(group))
    }

    /// Share of entries with a label in `language` that needs no fallback.
    ///
    /// An empty list counts as fully covered.
    pub fn translation_coverage(
        &self,
        name: &str,
        language: Language,
    ) -> std::result::Result<f64, NotFound> {
        let list = self.codelists.get(name).ok_or_else(|| NotFound::new(name))?;
        if list.is_empty() {
            return Ok(1.0);
        }
        let covered = list
            .entries
            .iter()
            .filter(|e| {
                e.labels.contains(language) || self.overlay.label(name, &e.code, language).is_some()
            })
            .count();
        #[allow(clippy::cast_precision_loss)]
        Ok(covered as f64 / list.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::OverlayText;

    fn registry() -> CodelistRegistry {
        let mut list = Codelist::new("levels", "1.0", "Levels");
        list.entries = vec![
            CodeEntry::new("low", "Low").with_label(Language::De, "Niedrig"),
            CodeEntry::new("high", "High"),
        ];
        let mut overlay = TranslationOverlay::new();
        overlay
            .insert(
                Language::Fr,
                "levels".into(),
                "high".into(),
                OverlayText {
                    label: Some("Élevé".into()),
                    definition: None,
                },
                "test",
            )
            .expect("insert");
        CodelistRegistry::new(vec![list], overlay).expect("registry")
    }

    #[test]
    fn duplicate_codelist_names_fail() {
        let a = Codelist::new("x", "1", "X");
        let b = Codelist::new("x", "2", "X again");
        let err = CodelistRegistry::new(vec![a, b], TranslationOverlay::new()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateCodelist { ref name, .. } if name == "x"));
    }

    #[test]
    fn label_chain() {
        let reg = registry();
        assert_eq!(reg.get_label("levels", "low", "de"), Some("Niedrig"));
        assert_eq!(reg.get_label("levels", "high", "fr"), Some("Élevé"));
        assert_eq!(reg.get_label("levels", "high", "de"), Some("High"));
        assert_eq!(reg.get_label("levels", "low", "ja"), Some("Low"));
        assert_eq!(reg.get_label("levels", "missing", "en"), None);
        assert_eq!(reg.get_label("nope", "low", "en"), None);
    }

    #[test]
    fn coverage_counts_own_and_overlay_labels() {
        let reg = registry();
        let coverage = |language| reg.translation_coverage("levels", language).expect("known");
        assert!((coverage(Language::En) - 1.0).abs() < f64::EPSILON);
        assert!((coverage(Language::De) - 0.5).abs() < f64::EPSILON);
        assert!((coverage(Language::Fr) - 0.5).abs() < f64::EPSILON);
        assert!(reg.translation_coverage("nope", Language::Fr).is_err());
    }

    #[test]
    fn config_resolution_prefers_explicit_dir() {
        let config = RegistryConfig::resolve(Some(Path::new("/tmp/pce")));
        assert_eq!(config.source, DataSource::Directory(PathBuf::from("/tmp/pce")));
    }
}
