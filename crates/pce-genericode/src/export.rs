//! Genericode writer.

use std::fs;
use std::io::Write;
use std::path::Path;

use pce_model::{CodeEntry, Codelist};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::columns::{Column, column_layout};
use crate::error::ExportError;

/// Genericode 1.0 namespace URI.
pub const GENERICODE_NS: &str = "http://docs.oasis-open.org/codelist/ns/genericode/1.0/";

const KEY_ID: &str = "codeKey";

/// Serialize a codelist as a Genericode document.
///
/// Output depends only on the codelist, so identical input gives identical
/// bytes.
pub fn export_genericode(codelist: &Codelist) -> Result<String, ExportError> {
    let columns = column_layout(codelist);
    let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("gc:CodeList");
    root.push_attribute(("xmlns:gc", GENERICODE_NS));
    xml.write_event(Event::Start(root))?;

    write_identification(&mut xml, codelist)?;
    write_column_set(&mut xml, &columns)?;

    xml.write_event(Event::Start(BytesStart::new("SimpleCodeList")))?;
    for entry in &codelist.entries {
        write_row(&mut xml, entry, &columns)?;
    }
    xml.write_event(Event::End(BytesEnd::new("SimpleCodeList")))?;

    xml.write_event(Event::End(BytesEnd::new("gc:CodeList")))?;

    let mut bytes = xml.into_inner();
    bytes.push(b'\n');

    tracing::debug!(
        codelist = %codelist.name,
        rows = codelist.entries.len(),
        columns = columns.len(),
        "Exported Genericode"
    );
    Ok(String::from_utf8(bytes)?)
}

/// Export a codelist and write it to `path`.
pub fn export_genericode_to_file(codelist: &Codelist, path: &Path) -> Result<(), ExportError> {
    let xml = export_genericode(codelist)?;
    fs::write(path, xml).map_err(|source| ExportError::WriteFile {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        codelist = %codelist.name,
        path = %path.display(),
        "Wrote Genericode file"
    );
    Ok(())
}

fn write_identification<W: Write>(
    xml: &mut Writer<W>,
    codelist: &Codelist,
) -> Result<(), ExportError> {
    xml.write_event(Event::Start(BytesStart::new("Identification")))?;
    write_text_element(xml, "ShortName", &codelist.name)?;
    for (language, title) in codelist.title.iter() {
        let mut long_name = BytesStart::new("LongName");
        long_name.push_attribute(("xml:lang", language.as_tag()));
        xml.write_event(Event::Start(long_name))?;
        xml.write_event(Event::Text(BytesText::new(title)))?;
        xml.write_event(Event::End(BytesEnd::new("LongName")))?;
    }
    write_text_element(xml, "Version", &codelist.version)?;
    if !codelist.namespace_uri.is_empty() {
        write_text_element(xml, "CanonicalUri", &codelist.namespace_uri)?;
    }
    if let Some(source) = &codelist.source {
        xml.write_event(Event::Start(BytesStart::new("Agency")))?;
        write_text_element(xml, "LongName", source)?;
        xml.write_event(Event::End(BytesEnd::new("Agency")))?;
    }
    xml.write_event(Event::End(BytesEnd::new("Identification")))?;
    Ok(())
}

fn write_column_set<W: Write>(xml: &mut Writer<W>, columns: &[Column]) -> Result<(), ExportError> {
    xml.write_event(Event::Start(BytesStart::new("ColumnSet")))?;
    for column in columns {
        let id = column.id();
        let mut start = BytesStart::new("Column");
        start.push_attribute(("Id", id.as_str()));
        start.push_attribute((
            "Use",
            if column.is_required() {
                "required"
            } else {
                "optional"
            },
        ));
        xml.write_event(Event::Start(start))?;
        write_text_element(xml, "ShortName", &id)?;
        let mut data = BytesStart::new("Data");
        data.push_attribute(("Type", "string"));
        if let Some(language) = column.language() {
            data.push_attribute(("Lang", language.as_tag()));
        }
        xml.write_event(Event::Empty(data))?;
        xml.write_event(Event::End(BytesEnd::new("Column")))?;
    }

    let mut key = BytesStart::new("Key");
    key.push_attribute(("Id", KEY_ID));
    xml.write_event(Event::Start(key))?;
    write_text_element(xml, "ShortName", KEY_ID)?;
    let mut column_ref = BytesStart::new("ColumnRef");
    column_ref.push_attribute(("Ref", "code"));
    xml.write_event(Event::Empty(column_ref))?;
    xml.write_event(Event::End(BytesEnd::new("Key")))?;

    xml.write_event(Event::End(BytesEnd::new("ColumnSet")))?;
    Ok(())
}

fn write_row<W: Write>(
    xml: &mut Writer<W>,
    entry: &CodeEntry,
    columns: &[Column],
) -> Result<(), ExportError> {
    xml.write_event(Event::Start(BytesStart::new("Row")))?;
    for column in columns {
        let id = column.id();
        let mut value = BytesStart::new("Value");
        value.push_attribute(("ColumnRef", id.as_str()));
        match cell(entry, column) {
            Some(text) => {
                xml.write_event(Event::Start(value))?;
                write_text_element(xml, "SimpleValue", text)?;
                xml.write_event(Event::End(BytesEnd::new("Value")))?;
            }
            None => xml.write_event(Event::Empty(value))?,
        }
    }
    xml.write_event(Event::End(BytesEnd::new("Row")))?;
    Ok(())
}

fn cell<'a>(entry: &'a CodeEntry, column: &Column) -> Option<&'a str> {
    match column {
        Column::Code => Some(entry.code.as_str()),
        Column::Name(language) => entry.label(*language),
        Column::Definition(language) => entry.definition(*language),
        Column::Meta(key) => entry.metadata_value(key),
    }
}

fn write_text_element<W: Write>(
    xml: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), ExportError> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
