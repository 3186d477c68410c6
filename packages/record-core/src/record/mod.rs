//! Record blobs and their read path.
//!
//! A record is `[fixed region][u32 LE variable length][variable region]`.
//! [`RecordView`] validates that framing once and then hands out field
//! values and raw byte ranges by schema index or name. Records are written
//! by the [`RecordAssembler`].

mod assembler;
mod binding;

use chrono::NaiveDateTime;

use crate::codec::{fixed, variable};
use crate::error::{RecordError, Result};
use crate::schema::{FieldDescriptor, RecordSchema};
use crate::types::{FieldFamily, Value};

pub use assembler::RecordAssembler;
pub use binding::FieldBinding;

/// Width of the variable length word that follows the fixed region.
pub const VAR_LEN_WIDTH: usize = 4;

/// Total length of the record starting at `bytes[0]`, read from its stored
/// variable length.
///
/// # Errors
/// `MalformedRecord` if `bytes` is too short to hold the length word.
pub fn record_len(bytes: &[u8], fixed_len: usize) -> Result<usize> {
    let var_len = variable::read_u32(bytes, fixed_len)? as usize;
    Ok(fixed_len + VAR_LEN_WIDTH + var_len)
}

/// Read-only view of one record laid out by `schema`.
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    schema: &'a RecordSchema,
    bytes: &'a [u8],
    total: usize,
}

impl<'a> RecordView<'a> {
    /// Wraps the record at the start of `bytes`, checking that it is long
    /// enough for the fixed region, the length word and the variable region
    /// that word declares. Bytes past the record are not visible to reads.
    pub fn new(schema: &'a RecordSchema, bytes: &'a [u8]) -> Result<Self> {
        let total = record_len(bytes, schema.fixed_len())?;
        if total > bytes.len() {
            return Err(RecordError::MalformedRecord {
                offset: schema.min_record_len(),
                len: total - schema.min_record_len(),
                record_len: bytes.len(),
            });
        }
        Ok(Self {
            schema,
            bytes: &bytes[..total],
            total,
        })
    }

    pub fn schema(&self) -> &'a RecordSchema {
        self.schema
    }

    /// The record's own bytes, without anything that followed it.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Length of the variable region as stored in the record.
    pub fn var_len(&self) -> usize {
        self.total_size() - self.schema.min_record_len()
    }

    /// Fixed region plus length word plus variable region.
    pub fn total_size(&self) -> usize {
        self.total
    }

    /// Raw encoded bytes of the field at `index`.
    ///
    /// Fixed fields yield their whole slot, null marker included. Variable
    /// fields yield `None` for null, an empty slice for an empty value and
    /// the payload otherwise.
    pub fn raw_bytes(&self, index: usize) -> Result<Option<&'a [u8]>> {
        let field = self.schema.field(index)?;
        raw_field_bytes(field, self.bytes)
    }

    pub fn raw_bytes_by_name(&self, name: &str) -> Result<Option<&'a [u8]>> {
        let field = self.schema.field_by_name(name)?;
        raw_field_bytes(field, self.bytes)
    }

    pub fn is_null(&self, index: usize) -> Result<bool> {
        let field = self.schema.field(index)?;
        if field.is_variable() {
            return Ok(variable::read(self.bytes, field.offset)?.is_none());
        }
        Ok(fixed::is_null(field, &self.bytes[field.slot_range()]))
    }

    /// Decoded value of the field at `index`, `None` for null.
    pub fn value(&self, index: usize) -> Result<Option<Value>> {
        decode_field(self.schema.field(index)?, self.bytes)
    }

    pub fn value_by_name(&self, name: &str) -> Result<Option<Value>> {
        decode_field(self.schema.field_by_name(name)?, self.bytes)
    }

    pub fn get_bool(&self, name: &str) -> Result<Option<bool>> {
        Ok(match self.typed_value(name, FieldFamily::Bool)? {
            Some(Value::Bool(v)) => Some(v),
            _ => None,
        })
    }

    /// Integer value of a Byte, Int16, Int32 or Int64 field.
    pub fn get_int(&self, name: &str) -> Result<Option<i64>> {
        Ok(match self.typed_value(name, FieldFamily::Int)? {
            Some(Value::Int(v)) => Some(v),
            _ => None,
        })
    }

    /// Float value of a Float, Double or FixedDecimal field.
    pub fn get_float(&self, name: &str) -> Result<Option<f64>> {
        Ok(match self.typed_value(name, FieldFamily::Float)? {
            Some(Value::Float(v)) => Some(v),
            _ => None,
        })
    }

    /// Text of any fixed or variable string field.
    pub fn get_string(&self, name: &str) -> Result<Option<String>> {
        Ok(match self.typed_value(name, FieldFamily::Text)? {
            Some(Value::Text(v)) => Some(v),
            _ => None,
        })
    }

    /// Date or DateTime value. Dates are returned at midnight.
    pub fn get_datetime(&self, name: &str) -> Result<Option<NaiveDateTime>> {
        Ok(match self.typed_value(name, FieldFamily::DateTime)? {
            Some(Value::DateTime(v)) => Some(v),
            _ => None,
        })
    }

    /// Payload of a Blob or SpatialObj field, borrowed from the record.
    pub fn get_blob(&self, name: &str) -> Result<Option<&'a [u8]>> {
        let field = self.schema.field_by_name(name)?;
        check_family(field, FieldFamily::Blob)?;
        variable::read(self.bytes, field.offset)
    }

    fn typed_value(&self, name: &str, family: FieldFamily) -> Result<Option<Value>> {
        let field = self.schema.field_by_name(name)?;
        check_family(field, family)?;
        decode_field(field, self.bytes)
    }
}

pub(crate) fn check_family(field: &FieldDescriptor, family: FieldFamily) -> Result<()> {
    if field.field_type.family() != family {
        return Err(RecordError::TypeMismatch {
            field: field.name.clone(),
            expected: family.as_str(),
            actual: field.field_type,
        });
    }
    Ok(())
}

fn raw_field_bytes<'a>(field: &FieldDescriptor, bytes: &'a [u8]) -> Result<Option<&'a [u8]>> {
    if field.is_variable() {
        return variable::read(bytes, field.offset);
    }
    let range = field.slot_range();
    bytes
        .get(range.clone())
        .map(Some)
        .ok_or(RecordError::MalformedRecord {
            offset: range.start,
            len: range.len(),
            record_len: bytes.len(),
        })
}

fn decode_field(field: &FieldDescriptor, bytes: &[u8]) -> Result<Option<Value>> {
    if field.is_variable() {
        return Ok(variable::read(bytes, field.offset)?
            .map(|payload| variable::decode_value(field, payload)));
    }
    match raw_field_bytes(field, bytes)? {
        Some(slot) => fixed::decode(field, slot),
        None => Ok(None),
    }
}
