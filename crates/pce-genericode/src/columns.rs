//! Column layout of an exported codelist.

use std::collections::BTreeSet;
use std::fmt;

use pce_model::{Codelist, Language};

const NAME_PREFIX: &str = "name-";
const DEFINITION_PREFIX: &str = "definition-";
const META_PREFIX: &str = "meta-";

/// One column of the Genericode column set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Column {
    /// The entry code, also the key column.
    Code,
    /// Label in one language.
    Name(Language),
    /// Definition in one language.
    Definition(Language),
    /// One metadata key.
    Meta(String),
}

impl Column {
    /// Column id as written to the `Id` attribute.
    pub fn id(&self) -> String {
        match self {
            Self::Code => "code".to_string(),
            Self::Name(language) => format!("{NAME_PREFIX}{}", language.as_tag()),
            Self::Definition(language) => format!("{DEFINITION_PREFIX}{}", language.as_tag()),
            Self::Meta(key) => format!("{META_PREFIX}{key}"),
        }
    }

    /// Parse a column id. Language columns need an exact lowercase tag.
    pub fn from_id(id: &str) -> Option<Self> {
        if id == "code" {
            return Some(Self::Code);
        }
        if let Some(tag) = id.strip_prefix(NAME_PREFIX) {
            return exact_language(tag).map(Self::Name);
        }
        if let Some(tag) = id.strip_prefix(DEFINITION_PREFIX) {
            return exact_language(tag).map(Self::Definition);
        }
        id.strip_prefix(META_PREFIX)
            .map(|key| Self::Meta(key.to_string()))
    }

    /// Whether every row must carry a value.
    pub fn is_required(&self) -> bool {
        match self {
            Self::Code => true,
            Self::Name(language) => language.is_base(),
            Self::Definition(_) | Self::Meta(_) => false,
        }
    }

    /// Language of a label or definition column.
    pub fn language(&self) -> Option<Language> {
        match self {
            Self::Name(language) | Self::Definition(language) => Some(*language),
            Self::Code | Self::Meta(_) => None,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

fn exact_language(tag: &str) -> Option<Language> {
    Language::from_tag(tag).filter(|l| l.as_tag() == tag)
}

/// Columns used to export `codelist`, in document order.
///
/// Label columns cover every supported language; definition columns only the
/// languages some entry actually defines.
pub fn column_layout(codelist: &Codelist) -> Vec<Column> {
    let definition_languages: BTreeSet<Language> = codelist
        .entries
        .iter()
        .filter_map(|e| e.definition.as_ref())
        .flat_map(|d| d.languages())
        .collect();
    let meta_keys: BTreeSet<&str> = codelist
        .entries
        .iter()
        .flat_map(|e| e.metadata.keys())
        .map(String::as_str)
        .collect();

    let mut columns = vec![Column::Code];
    columns.extend(Language::all().iter().copied().map(Column::Name));
    columns.extend(definition_languages.into_iter().map(Column::Definition));
    columns.extend(meta_keys.into_iter().map(|k| Column::Meta(k.to_string())));
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use pce_model::CodeEntry;

    #[test]
    fn ids_parse_back() {
        for column in [
            Column::Code,
            Column::Name(Language::De),
            Column::Definition(Language::Fr),
            Column::Meta("xoev_code".into()),
        ] {
            assert_eq!(Column::from_id(&column.id()), Some(column));
        }
        assert_eq!(Column::from_id("name-EN"), None);
        assert_eq!(Column::from_id("name-es"), None);
        assert_eq!(Column::from_id("label-en"), None);
    }

    #[test]
    fn layout_order() {
        let mut list = Codelist::new("l", "1", "L");
        list.entries.push(
            CodeEntry::new("a", "A")
                .with_definition(Language::Fr, "Déf")
                .with_metadata("rank", "2")
                .with_metadata("group", "g"),
        );
        list.entries
            .push(CodeEntry::new("b", "B").with_definition(Language::En, "Def"));

        let ids: Vec<String> = column_layout(&list).iter().map(Column::id).collect();
        assert_eq!(
            ids,
            vec![
                "code",
                "name-en",
                "name-de",
                "name-fr",
                "definition-en",
                "definition-fr",
                "meta-group",
                "meta-rank"
            ]
        );
    }

    #[test]
    fn required_columns() {
        assert!(Column::Code.is_required());
        assert!(Column::Name(Language::En).is_required());
        assert!(!Column::Name(Language::De).is_required());
        assert!(!Column::Meta("group".into()).is_required());
    }
}
