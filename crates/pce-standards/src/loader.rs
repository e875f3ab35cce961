//! Codelist definition loading.
//!
//! A definition file holds one codelist:
//!
//! ```json
//! {
//!   "name": "protection-levels",
//!   "version": "1.0",
//!   "namespace_uri": "https://open-gov-group.org/oscal/privacy/codelist/protection-levels",
//!   "title": {"en": "Protection levels", "de": "Schutzbedarfsstufen"},
//!   "source": "SDM",
//!   "entries": [
//!     {"code": "baseline", "labels": {"en": "Baseline"}, "metadata": {"rank": 1}}
//!   ]
//! }
//! ```
//!
//! Records are closed: any field not shown above is rejected.

use std::collections::{BTreeMap, HashSet};

use pce_model::{CodeEntry, Codelist, Language, LocalizedText};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{LoadError, Result};
use crate::schema::{RecordSchema, array_field, check_object, invalid};

const CODELIST_SCHEMA: RecordSchema = RecordSchema::new(
    &["name", "version", "title", "entries"],
    &["namespace_uri", "source"],
);

const ENTRY_SCHEMA: RecordSchema =
    RecordSchema::new(&["code", "labels"], &["definition", "metadata"]);

#[derive(Debug, Deserialize)]
struct RawCodelist {
    name: String,
    version: String,
    #[serde(default)]
    namespace_uri: String,
    title: BTreeMap<String, String>,
    #[serde(default)]
    source: Option<String>,
    entries: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    code: String,
    labels: BTreeMap<String, String>,
    #[serde(default)]
    definition: Option<BTreeMap<String, String>>,
    #[serde(default)]
    metadata: BTreeMap<String, Value>,
}

/// Parse one codelist definition.
///
/// `source_name` is used in error messages only.
pub fn parse_codelist(content: &str, source_name: &str) -> Result<Codelist> {
    let value: Value = serde_json::from_str(content).map_err(|source| LoadError::Json {
        source_name: source_name.to_string(),
        source,
    })?;

    let root = check_object(&value, &CODELIST_SCHEMA, source_name, "$")?;
    for (index, entry) in array_field(root, "entries", source_name, "$")?
        .iter()
        .enumerate()
    {
        check_object(entry, &ENTRY_SCHEMA, source_name, &entry_path(index))?;
    }

    let raw: RawCodelist = serde_json::from_value(value).map_err(|source| LoadError::Json {
        source_name: source_name.to_string(),
        source,
    })?;

    build_codelist(raw, source_name)
}

fn build_codelist(raw: RawCodelist, source_name: &str) -> Result<Codelist> {
    let name = raw.name.trim().to_string();
    if name.is_empty() {
        return Err(invalid(source_name, "$.name", "codelist name is empty"));
    }
    let version = raw.version.trim().to_string();
    if version.is_empty() {
        return Err(invalid(source_name, "$.version", "version is empty"));
    }

    let title = localized_text(raw.title, source_name, "$.title", true)?;
    let source = raw
        .source
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(raw.entries.len());
    for (index, raw_entry) in raw.entries.into_iter().enumerate() {
        let entry = build_entry(raw_entry, source_name, &entry_path(index))?;
        if !seen.insert(entry.code.clone()) {
            return Err(LoadError::DuplicateCode {
                codelist: name,
                code: entry.code,
            });
        }
        entries.push(entry);
    }

    tracing::debug!(
        file = %source_name,
        codelist = %name,
        entries = entries.len(),
        "Loaded codelist definition"
    );

    Ok(Codelist {
        name,
        version,
        namespace_uri: raw.namespace_uri.trim().to_string(),
        title,
        source,
        entries,
    })
}

fn build_entry(raw: RawEntry, source_name: &str, path: &str) -> Result<CodeEntry> {
    let code = raw.code.trim().to_string();
    if code.is_empty() {
        return Err(invalid(source_name, &format!("{path}.code"), "code is empty"));
    }

    let labels = localized_text(raw.labels, source_name, &format!("{path}.labels"), true)?;
    let definition = raw
        .definition
        .map(|d| localized_text(d, source_name, &format!("{path}.definition"), false))
        .transpose()?
        .filter(|d| !d.is_empty());

    let mut metadata = BTreeMap::new();
    for (key, value) in raw.metadata {
        let text = match value {
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            _ => {
                return Err(invalid(
                    source_name,
                    &format!("{path}.metadata.{key}"),
                    "metadata values must be strings, numbers, or booleans",
                ));
            }
        };
        metadata.insert(key, text);
    }

    Ok(CodeEntry {
        code,
        labels,
        definition,
        metadata,
    })
}

/// Convert a raw language map, rejecting unsupported languages and empty text.
///
/// With `require_base`, a missing or blank base-language value is
/// [`LoadError::MissingBaseLabel`].
pub fn localized_text(
    raw: BTreeMap<String, String>,
    source_name: &str,
    path: &str,
    require_base: bool,
) -> Result<LocalizedText> {
    let mut text = LocalizedText::new();
    for (tag, value) in raw {
        // Definition data must use exact lowercase tags.
        let language = Language::from_tag(&tag)
            .filter(|l| l.as_tag() == tag)
            .ok_or_else(|| LoadError::UnknownLanguage {
                source_name: source_name.to_string(),
                path: path.to_string(),
                tag: tag.clone(),
            })?;
        let value = value.trim();
        if value.is_empty() {
            if language.is_base() && require_base {
                return Err(LoadError::MissingBaseLabel {
                    source_name: source_name.to_string(),
                    path: path.to_string(),
                });
            }
            return Err(invalid(
                source_name,
                &format!("{path}.{tag}"),
                "text must not be empty",
            ));
        }
        text.insert(language, value);
    }

    if require_base && !text.contains(Language::BASE) {
        return Err(LoadError::MissingBaseLabel {
            source_name: source_name.to_string(),
            path: path.to_string(),
        });
    }
    Ok(text)
}

fn entry_path(index: usize) -> String {
    format!("$.entries[{index}]")
}

/// Parse a batch of `(file name, contents)` definitions in order.
pub fn parse_codelists<'a, I>(sources: I) -> Result<Vec<Codelist>>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    sources
        .into_iter()
        .map(|(name, content)| parse_codelist(content, name))
        .collect()
}
