//! Schema XML reading and writing.
//!
//! Documents look like
//! `<MetaInfo connection="Output"><RecordInfo><Field name=".." source=".." size=".." scale=".." type=".."/></RecordInfo></MetaInfo>`.
//! A bare `<RecordInfo>` root is accepted as well.

use std::collections::HashMap;
use std::fmt::Display;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use tracing::debug;

use crate::error::{RecordError, Result};
use crate::types::FieldType;

use super::{AddFieldOptions, FieldDef, Generator, RecordSchema};

/// A parsed schema together with the connection label of its `MetaInfo`.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    pub connection: Option<String>,
    pub schema: RecordSchema,
}

/// Parses schema XML into a [`Generator`] so callers can keep editing.
pub fn parse_generator(xml: &str) -> Result<(Option<String>, Generator)> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut generator = Generator::new();
    let mut connection = None;
    let mut in_record_info = false;
    let mut saw_record_info = false;

    loop {
        match reader.read_event().map_err(parse_error)? {
            Event::Start(e) => match e.name().as_ref() {
                b"MetaInfo" => connection = read_attributes(&e)?.remove("connection"),
                b"RecordInfo" => {
                    in_record_info = true;
                    saw_record_info = true;
                }
                b"Field" if in_record_info => add_field(&mut generator, &e)?,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"MetaInfo" => connection = read_attributes(&e)?.remove("connection"),
                b"RecordInfo" => saw_record_info = true,
                b"Field" if in_record_info => add_field(&mut generator, &e)?,
                _ => {}
            },
            Event::End(e) => {
                if e.name().as_ref() == b"RecordInfo" {
                    in_record_info = false;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_record_info {
        return Err(RecordError::SchemaParse(
            "document has no RecordInfo element".to_string(),
        ));
    }
    debug!(
        fields = generator.num_fields(),
        connection = ?connection,
        "Parsed schema XML"
    );
    Ok((connection, generator))
}

/// Parses schema XML into a finalized schema.
pub fn parse(xml: &str) -> Result<SchemaDocument> {
    let (connection, generator) = parse_generator(xml)?;
    Ok(SchemaDocument {
        connection,
        schema: generator.finalize(),
    })
}

/// Serializes `schema` wrapped in a `MetaInfo` element.
pub fn write(schema: &RecordSchema, connection: &str) -> Result<String> {
    let mut writer = Writer::new(Vec::new());

    let mut meta = BytesStart::new("MetaInfo");
    meta.push_attribute(("connection", connection));
    writer.write_event(Event::Start(meta)).map_err(write_error)?;
    writer
        .write_event(Event::Start(BytesStart::new("RecordInfo")))
        .map_err(write_error)?;

    for field in schema.fields() {
        let size = field.size.to_string();
        let scale = field.scale.to_string();
        let mut element = BytesStart::new("Field");
        element.push_attribute(("name", field.name.as_str()));
        element.push_attribute(("source", field.source.as_str()));
        element.push_attribute(("size", size.as_str()));
        element.push_attribute(("scale", scale.as_str()));
        element.push_attribute(("type", field.field_type.as_str()));
        writer.write_event(Event::Empty(element)).map_err(write_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("RecordInfo")))
        .map_err(write_error)?;
    writer
        .write_event(Event::End(BytesEnd::new("MetaInfo")))
        .map_err(write_error)?;

    String::from_utf8(writer.into_inner()).map_err(write_error)
}

impl RecordSchema {
    /// Parses schema XML, discarding the connection label.
    pub fn from_xml(xml: &str) -> Result<RecordSchema> {
        Ok(parse(xml)?.schema)
    }

    /// Serializes this schema with the given connection label.
    pub fn to_xml(&self, connection: &str) -> Result<String> {
        write(self, connection)
    }
}

fn add_field(generator: &mut Generator, element: &BytesStart<'_>) -> Result<()> {
    let mut attrs = read_attributes(element)?;

    let name = attrs
        .remove("name")
        .ok_or_else(|| RecordError::SchemaParse("Field is missing 'name'".to_string()))?;
    let type_name = attrs.remove("type").ok_or_else(|| {
        RecordError::SchemaParse(format!("Field '{}' is missing 'type'", name))
    })?;
    let field_type: FieldType = type_name.parse()?;

    let size = match (field_type.is_sized(), attrs.remove("size")) {
        (true, Some(value)) => parse_number(&name, "size", &value)?,
        (true, None) => {
            return Err(RecordError::SchemaParse(format!(
                "Field '{}' of type {} is missing 'size'",
                name, field_type
            )))
        }
        (false, _) => 0,
    };
    let scale = match (field_type, attrs.remove("scale")) {
        (FieldType::FixedDecimal, Some(value)) => parse_number(&name, "scale", &value)?,
        (FieldType::FixedDecimal, None) => {
            return Err(RecordError::SchemaParse(format!(
                "Field '{}' of type FixedDecimal is missing 'scale'",
                name
            )))
        }
        (_, Some(value)) => parse_number(&name, "scale", &value).unwrap_or(0),
        (_, None) => 0,
    };
    let source = attrs.remove("source").unwrap_or_default();

    generator.add_field_def(
        FieldDef::new(name, field_type, size, scale).with_source(source),
        AddFieldOptions::default(),
    );
    Ok(())
}

fn read_attributes(element: &BytesStart<'_>) -> Result<HashMap<String, String>> {
    let mut attrs = HashMap::new();
    for attr in element.attributes() {
        let attr = attr.map_err(parse_error)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(parse_error)?.into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

fn parse_number(field: &str, attribute: &str, value: &str) -> Result<usize> {
    value.trim().parse().map_err(|_| {
        RecordError::SchemaParse(format!(
            "Field '{}' has invalid {} '{}'",
            field, attribute, value
        ))
    })
}

fn parse_error(err: impl Display) -> RecordError {
    RecordError::SchemaParse(err.to_string())
}

fn write_error(err: impl Display) -> RecordError {
    RecordError::SchemaParse(format!("failed to write schema XML: {}", err))
}
