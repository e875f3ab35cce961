//! Codelist-tagged property helpers.
//!
//! Documents reference codes through properties in [`CODELIST_NAMESPACE`]
//! whose `class` names the codelist. The caller walks its own document tree
//! and hands `(path, property)` pairs to [`validate_codelist_props`].

use pce_model::{CODELIST_NAMESPACE, Property, ValidationIssue};

use crate::registry::CodelistRegistry;

/// Create a property referencing `code` in `list`.
///
/// The property name defaults to the list name.
pub fn create_codelist_prop(list: &str, code: &str, prop_name: Option<&str>) -> Property {
    Property {
        name: prop_name.unwrap_or(list).to_string(),
        value: code.to_string(),
        ns: Some(CODELIST_NAMESPACE.to_string()),
        class: Some(list.to_string()),
    }
}

/// Values of all codelist properties that reference `list`, in order.
pub fn extract_codelist_codes<'a>(props: &'a [Property], list: &str) -> Vec<&'a str> {
    props
        .iter()
        .filter(|p| p.is_codelist() && p.class.as_deref() == Some(list))
        .map(|p| p.value.as_str())
        .collect()
}

/// Check every codelist property against the registry.
///
/// A property without `class` or with an invalid code is an error; a
/// reference to an unknown codelist is a warning. Other properties are
/// ignored.
pub fn validate_codelist_props<'a, I, P>(
    located_props: I,
    registry: &CodelistRegistry,
) -> Vec<ValidationIssue>
where
    I: IntoIterator<Item = (P, &'a Property)>,
    P: AsRef<str>,
{
    let mut issues = Vec::new();
    for (path, prop) in located_props {
        if !prop.is_codelist() {
            continue;
        }
        let path = path.as_ref();
        let Some(list) = prop.class.as_deref().filter(|c| !c.is_empty()) else {
            issues.push(ValidationIssue::error(
                path,
                format!("Codelist property '{}' has no class", prop.name),
            ));
            continue;
        };
        if registry.codelist(list).is_none() {
            issues.push(ValidationIssue::warning(
                path,
                format!("Unknown codelist '{list}'"),
            ));
            continue;
        }
        if !registry.validate_code(list, &prop.value) {
            issues.push(ValidationIssue::error(
                path,
                format!("'{}' is not a valid code in codelist '{list}'", prop.value),
            ));
        }
    }

    if !issues.is_empty() {
        tracing::debug!(issues = issues.len(), "Codelist property check found issues");
    }
    issues
}
