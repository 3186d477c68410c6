//! Fixed-region slot encoding.
//!
//! Every slot is `fixed_width` bytes of value followed by a one-byte null
//! marker (1 = null, 0 = present). Bool is the exception: a single byte
//! holding 0 (false), 1 (true) or 2 (null).

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{RecordError, Result};
use crate::schema::FieldDescriptor;
use crate::types::{FieldType, Value};

use super::{decode_utf16le, encode_utf16le, trim_nul, truncate_bytes};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const BOOL_FALSE: u8 = 0;
const BOOL_TRUE: u8 = 1;
const BOOL_NULL: u8 = 2;

/// Returns true if the slot holds null. `slot` must span the whole slot.
pub(crate) fn is_null(field: &FieldDescriptor, slot: &[u8]) -> bool {
    match field.field_type {
        FieldType::Bool => slot[0] == BOOL_NULL,
        _ => slot[field.fixed_width] == 1,
    }
}

/// Marks the slot as null, zeroing the value bytes. `slot` must span the
/// whole slot.
pub(crate) fn encode_null(field: &FieldDescriptor, slot: &mut [u8]) {
    match field.field_type {
        FieldType::Bool => slot[0] = BOOL_NULL,
        _ => {
            slot[..field.fixed_width].fill(0);
            slot[field.fixed_width] = 1;
        }
    }
}

/// Writes `value` into a slot of `field.slot_len()` bytes.
///
/// Integers wrap to the field width. Text is truncated to the declared size
/// and NUL padded.
///
/// # Errors
/// `MalformedRecord` if `slot` is shorter than the field's slot,
/// `TypeMismatch` if the value family does not match the field.
pub fn encode(field: &FieldDescriptor, slot: &mut [u8], value: &Value) -> Result<()> {
    check_slot(field, slot)?;
    let width = field.fixed_width;
    match (field.field_type, value) {
        (FieldType::Bool, Value::Bool(b)) => {
            slot[0] = if *b { BOOL_TRUE } else { BOOL_FALSE };
            return Ok(());
        }
        (FieldType::Byte, Value::Int(v)) => slot[0] = *v as u8,
        (FieldType::Int16, Value::Int(v)) => slot[..2].copy_from_slice(&(*v as i16).to_le_bytes()),
        (FieldType::Int32, Value::Int(v)) => slot[..4].copy_from_slice(&(*v as i32).to_le_bytes()),
        (FieldType::Int64, Value::Int(v)) => slot[..8].copy_from_slice(&v.to_le_bytes()),
        (FieldType::Float, Value::Float(v)) => slot[..4].copy_from_slice(&(*v as f32).to_le_bytes()),
        (FieldType::Double, Value::Float(v)) => slot[..8].copy_from_slice(&v.to_le_bytes()),
        (FieldType::FixedDecimal, Value::Float(v)) => {
            let text = format!("{:.*}", field.scale, v);
            write_padded(&mut slot[..width], truncate_bytes(&text, width));
        }
        (FieldType::String, Value::Text(s)) => {
            write_padded(&mut slot[..width], truncate_bytes(s, width));
        }
        (FieldType::WString, Value::Text(s)) => {
            write_padded(&mut slot[..width], &encode_utf16le(s, field.size));
        }
        (FieldType::Date, Value::DateTime(dt)) => {
            let text = dt.format(DATE_FORMAT).to_string();
            write_padded(&mut slot[..width], truncate_bytes(&text, width));
        }
        (FieldType::DateTime, Value::DateTime(dt)) => {
            let text = dt.format(DATETIME_FORMAT).to_string();
            write_padded(&mut slot[..width], truncate_bytes(&text, width));
        }
        _ => {
            return Err(RecordError::TypeMismatch {
                field: field.name.clone(),
                expected: value.family().as_str(),
                actual: field.field_type,
            })
        }
    }
    slot[width] = 0;
    Ok(())
}

/// Reads the value held in a slot, or `None` for null.
///
/// # Errors
/// `MalformedRecord` if `slot` is shorter than the field's slot,
/// `ValueParse` if a FixedDecimal, Date or DateTime slot holds text that
/// does not parse.
pub fn decode(field: &FieldDescriptor, slot: &[u8]) -> Result<Option<Value>> {
    check_slot(field, slot)?;
    if is_null(field, slot) {
        return Ok(None);
    }
    let value = &slot[..field.fixed_width];
    let decoded = match field.field_type {
        FieldType::Bool => Value::Bool(value[0] != BOOL_FALSE),
        FieldType::Byte => Value::Int(i64::from(value[0])),
        FieldType::Int16 => Value::Int(i64::from(i16::from_le_bytes([value[0], value[1]]))),
        FieldType::Int32 => Value::Int(i64::from(i32::from_le_bytes(le_array(value)))),
        FieldType::Int64 => Value::Int(i64::from_le_bytes(le_array(value))),
        FieldType::Float => Value::Float(f64::from(f32::from_le_bytes(le_array(value)))),
        FieldType::Double => Value::Float(f64::from_le_bytes(le_array(value))),
        FieldType::FixedDecimal => {
            let text = text_of(field, value)?;
            let parsed = text
                .trim()
                .parse::<f64>()
                .map_err(|err| parse_error(field, &text, err))?;
            Value::Float(parsed)
        }
        FieldType::String => Value::Text(String::from_utf8_lossy(trim_nul(value)).into_owned()),
        FieldType::WString => Value::Text(decode_utf16le(value, true)),
        FieldType::Date => {
            let text = text_of(field, value)?;
            let date = NaiveDate::parse_from_str(&text, DATE_FORMAT)
                .map_err(|err| parse_error(field, &text, err))?;
            Value::DateTime(date.and_time(NaiveTime::MIN))
        }
        FieldType::DateTime => {
            let text = text_of(field, value)?;
            let datetime = NaiveDateTime::parse_from_str(&text, DATETIME_FORMAT)
                .map_err(|err| parse_error(field, &text, err))?;
            Value::DateTime(datetime)
        }
        FieldType::VString | FieldType::VWString | FieldType::Blob | FieldType::SpatialObj => {
            return Err(RecordError::TypeMismatch {
                field: field.name.clone(),
                expected: "fixed",
                actual: field.field_type,
            })
        }
    };
    Ok(Some(decoded))
}

fn check_slot(field: &FieldDescriptor, slot: &[u8]) -> Result<()> {
    if slot.len() < field.slot_len() {
        return Err(RecordError::MalformedRecord {
            offset: field.offset,
            len: field.slot_len(),
            record_len: slot.len(),
        });
    }
    Ok(())
}

fn write_padded(dest: &mut [u8], src: &[u8]) {
    dest[..src.len()].copy_from_slice(src);
    dest[src.len()..].fill(0);
}

fn le_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

fn text_of(field: &FieldDescriptor, value: &[u8]) -> Result<String> {
    std::str::from_utf8(trim_nul(value))
        .map(str::to_string)
        .map_err(|err| RecordError::ValueParse {
            field: field.name.clone(),
            message: err.to_string(),
        })
}

fn parse_error(field: &FieldDescriptor, text: &str, err: impl std::fmt::Display) -> RecordError {
    RecordError::ValueParse {
        field: field.name.clone(),
        message: format!("'{}': {}", text, err),
    }
}
