//! Genericode reader.
//!
//! The document is first read into a small element tree, which is then
//! checked against the column layout written by [`crate::export_genericode`].

use std::collections::{BTreeMap, HashSet};

use pce_model::{CodeEntry, Codelist, Language, LocalizedText};
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};

use crate::columns::Column;
use crate::error::FormatError;

/// Parse a Genericode document into a codelist.
pub fn import_genericode(xml: &str) -> Result<Codelist, FormatError> {
    let root = parse_tree(xml)?;
    if root.name != "CodeList" {
        return Err(FormatError::WrongRoot { found: root.name });
    }

    let identification = root.required_child("Identification", "CodeList")?;
    let name = identification
        .required_child("ShortName", "Identification")?
        .text
        .clone();
    let version = identification
        .required_child("Version", "Identification")?
        .text
        .clone();
    let title = read_title(identification)?;
    let namespace_uri = identification
        .child("CanonicalUri")
        .map(|e| e.text.clone())
        .unwrap_or_default();
    let source = identification
        .child("Agency")
        .and_then(|agency| agency.child("LongName"))
        .map(|e| e.text.clone());

    let columns = read_columns(root.required_child("ColumnSet", "CodeList")?)?;
    let simple = root.required_child("SimpleCodeList", "CodeList")?;

    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for (index, row) in simple.children_named("Row").enumerate() {
        let row_number = index + 1;
        let entry = read_row(row, &columns, row_number)?;
        if !seen.insert(entry.code.clone()) {
            return Err(FormatError::DuplicateCode {
                row: row_number,
                code: entry.code,
            });
        }
        entries.push(entry);
    }

    tracing::debug!(
        codelist = %name,
        rows = entries.len(),
        columns = columns.len(),
        "Imported Genericode"
    );

    Ok(Codelist {
        name,
        version,
        namespace_uri,
        title,
        source,
        entries,
    })
}

fn read_title(identification: &Element) -> Result<LocalizedText, FormatError> {
    let mut title = LocalizedText::new();
    for long_name in identification.children_named("LongName") {
        let language = match long_name.attribute("xml:lang") {
            Some(tag) => {
                Language::from_tag(tag).ok_or_else(|| FormatError::UnknownLanguage {
                    path: "Identification/LongName".to_string(),
                    tag: tag.to_string(),
                })?
            }
            None => Language::BASE,
        };
        title.insert(language, long_name.text.clone());
    }
    if title.base_text().is_none_or(str::is_empty) {
        return Err(FormatError::MissingElement {
            path: format!(
                "Identification/LongName[@xml:lang='{}']",
                Language::BASE.as_tag()
            ),
        });
    }
    Ok(title)
}

fn read_columns(column_set: &Element) -> Result<Vec<Column>, FormatError> {
    let mut columns = Vec::new();
    let mut ids = HashSet::new();
    for element in column_set.children_named("Column") {
        let id = element
            .attribute("Id")
            .ok_or_else(|| FormatError::MissingAttribute {
                path: "ColumnSet/Column".to_string(),
                attribute: "Id".to_string(),
            })?;
        if !ids.insert(id) {
            return Err(FormatError::DuplicateColumn { id: id.to_string() });
        }
        let column =
            Column::from_id(id).ok_or_else(|| FormatError::UnknownColumn { id: id.to_string() })?;
        columns.push(column);
    }
    if !columns.contains(&Column::Code) {
        return Err(FormatError::MissingCodeColumn);
    }
    Ok(columns)
}

fn read_row(
    row: &Element,
    columns: &[Column],
    row_number: usize,
) -> Result<CodeEntry, FormatError> {
    let values: Vec<&Element> = row.children_named("Value").collect();
    if values.len() != columns.len() {
        return Err(FormatError::ValueCount {
            row: row_number,
            expected: columns.len(),
            found: values.len(),
        });
    }

    let mut code = None;
    let mut labels = LocalizedText::new();
    let mut definition = LocalizedText::new();
    let mut metadata = BTreeMap::new();

    for (position, (value, column)) in values.iter().zip(columns).enumerate() {
        let expected = column.id();
        if let Some(found) = value.attribute("ColumnRef")
            && found != expected
        {
            return Err(FormatError::ColumnMismatch {
                row: row_number,
                position: position + 1,
                expected,
                found: found.to_string(),
            });
        }
        let Some(text) = value.child("SimpleValue").map(|v| v.text.clone()) else {
            continue;
        };
        match column {
            Column::Code => code = Some(text),
            Column::Name(language) => labels.insert(*language, text),
            Column::Definition(language) => definition.insert(*language, text),
            Column::Meta(key) => {
                metadata.insert(key.clone(), text);
            }
        }
    }

    let code = code
        .filter(|c| !c.is_empty())
        .ok_or(FormatError::MissingCode { row: row_number })?;
    if labels.base_text().is_none_or(str::is_empty) {
        return Err(FormatError::MissingBaseLabel {
            row: row_number,
            code,
        });
    }

    Ok(CodeEntry {
        code,
        labels,
        definition: (!definition.is_empty()).then_some(definition),
        metadata,
    })
}

/// Element with its attributes, direct text, and child elements.
#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn required_child(&self, name: &str, parent: &str) -> Result<&Element, FormatError> {
        self.child(name).ok_or_else(|| FormatError::MissingElement {
            path: format!("{parent}/{name}"),
        })
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn parse_tree(xml: &str) -> Result<Element, FormatError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(open_element(&start)?),
            Event::Empty(start) => {
                let element = open_element(&start)?;
                close_element(element, &mut stack, &mut root);
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    close_element(element, &mut stack, &mut root);
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&text.decode().map_err(quick_xml::Error::from)?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&data.decode().map_err(quick_xml::Error::from)?);
                }
            }
            Event::GeneralRef(reference) => {
                let name = reference.decode().map_err(quick_xml::Error::from)?;
                let resolved = resolve_reference(&name)?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&resolved);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(FormatError::UnclosedElement { name: open.name });
    }
    root.ok_or(FormatError::EmptyDocument)
}

fn open_element(start: &BytesStart<'_>) -> Result<Element, FormatError> {
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(quick_xml::Error::from)?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
        attributes,
        ..Element::default()
    })
}

/// Attach a finished element to its parent, or keep it as the root.
fn close_element(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn resolve_reference(name: &str) -> Result<String, FormatError> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => number.parse::<u32>().ok(),
        };
        return code
            .and_then(char::from_u32)
            .map(String::from)
            .ok_or_else(|| FormatError::UnknownEntity {
                name: name.to_string(),
            });
    }
    resolve_predefined_entity(name)
        .map(str::to_string)
        .ok_or_else(|| FormatError::UnknownEntity {
            name: name.to_string(),
        })
}
