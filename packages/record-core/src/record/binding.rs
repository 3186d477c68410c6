//! Current-value holders used while assembling a record.

use chrono::NaiveDateTime;

use crate::codec::{fixed, variable};
use crate::error::Result;
use crate::schema::FieldDescriptor;
use crate::types::{FieldFamily, Value};

use super::check_family;

/// The value a field will take in the next generated record.
///
/// Fixed fields keep their fully encoded slot, so generating a record is a
/// plain copy. Variable fields keep the payload and a null flag.
#[derive(Debug, Clone)]
pub struct FieldBinding {
    field: FieldDescriptor,
    bytes: Vec<u8>,
    null: bool,
}

impl FieldBinding {
    /// Creates a binding holding null.
    pub fn new(field: FieldDescriptor) -> Self {
        let mut binding = Self {
            bytes: if field.is_variable() {
                Vec::new()
            } else {
                vec![0; field.slot_len()]
            },
            field,
            null: false,
        };
        binding.set_null();
        binding
    }

    pub fn field(&self) -> &FieldDescriptor {
        &self.field
    }

    pub fn is_null(&self) -> bool {
        self.null
    }

    pub fn set_null(&mut self) {
        self.null = true;
        if self.field.is_variable() {
            self.bytes.clear();
        } else {
            fixed::encode_null(&self.field, &mut self.bytes);
        }
    }

    /// Encodes `value` into the binding, truncating text to the declared size.
    ///
    /// # Errors
    /// `TypeMismatch` if the value family does not match the field type.
    pub fn set_value(&mut self, value: &Value) -> Result<()> {
        check_family(&self.field, value.family())?;
        if self.field.is_variable() {
            self.bytes = variable::encode_value(&self.field, value)?;
        } else {
            fixed::encode(&self.field, &mut self.bytes, value)?;
        }
        self.null = false;
        Ok(())
    }

    pub fn set_bool(&mut self, value: bool) -> Result<()> {
        self.set_value(&Value::Bool(value))
    }

    pub fn set_int(&mut self, value: i64) -> Result<()> {
        self.set_value(&Value::Int(value))
    }

    pub fn set_float(&mut self, value: f64) -> Result<()> {
        self.set_value(&Value::Float(value))
    }

    pub fn set_string(&mut self, value: &str) -> Result<()> {
        self.set_value(&Value::Text(value.to_string()))
    }

    pub fn set_datetime(&mut self, value: NaiveDateTime) -> Result<()> {
        self.set_value(&Value::DateTime(value))
    }

    pub fn set_blob(&mut self, value: &[u8]) -> Result<()> {
        self.set_value(&Value::Blob(value.to_vec()))
    }

    /// Stores already encoded bytes without checking or truncating them.
    ///
    /// For fixed fields `raw` is a whole slot: a shorter slice is zero padded
    /// and a longer one cut to the slot width. `None` sets null. For variable
    /// fields `raw` is the payload.
    pub fn set_raw(&mut self, raw: Option<&[u8]>) {
        let Some(raw) = raw else {
            self.set_null();
            return;
        };

        if self.field.is_variable() {
            self.bytes.clear();
            self.bytes.extend_from_slice(raw);
            self.null = false;
        } else {
            let n = raw.len().min(self.bytes.len());
            self.bytes[..n].copy_from_slice(&raw[..n]);
            self.bytes[n..].fill(0);
            self.null = fixed::is_null(&self.field, &self.bytes);
        }
    }

    /// Encoded bytes as they will be written: the slot for fixed fields, the
    /// payload (or `None` for null) for variable fields.
    pub fn raw(&self) -> Option<&[u8]> {
        if self.field.is_variable() && self.null {
            return None;
        }
        Some(&self.bytes)
    }

    /// Decoded current value, `None` for null.
    pub fn current_value(&self) -> Result<Option<Value>> {
        if self.field.is_variable() {
            return Ok(self
                .raw()
                .map(|payload| variable::decode_value(&self.field, payload)));
        }
        fixed::decode(&self.field, &self.bytes)
    }

    pub fn current_bool(&self) -> Result<Option<bool>> {
        check_family(&self.field, FieldFamily::Bool)?;
        Ok(match self.current_value()? {
            Some(Value::Bool(v)) => Some(v),
            _ => None,
        })
    }

    pub fn current_int(&self) -> Result<Option<i64>> {
        check_family(&self.field, FieldFamily::Int)?;
        Ok(match self.current_value()? {
            Some(Value::Int(v)) => Some(v),
            _ => None,
        })
    }

    pub fn current_float(&self) -> Result<Option<f64>> {
        check_family(&self.field, FieldFamily::Float)?;
        Ok(match self.current_value()? {
            Some(Value::Float(v)) => Some(v),
            _ => None,
        })
    }

    pub fn current_string(&self) -> Result<Option<String>> {
        check_family(&self.field, FieldFamily::Text)?;
        Ok(match self.current_value()? {
            Some(Value::Text(v)) => Some(v),
            _ => None,
        })
    }

    pub fn current_datetime(&self) -> Result<Option<NaiveDateTime>> {
        check_family(&self.field, FieldFamily::DateTime)?;
        Ok(match self.current_value()? {
            Some(Value::DateTime(v)) => Some(v),
            _ => None,
        })
    }

    pub fn current_blob(&self) -> Result<Option<&[u8]>> {
        check_family(&self.field, FieldFamily::Blob)?;
        Ok(self.raw())
    }

    /// Bytes this binding adds to the variable region.
    pub(crate) fn var_len(&self) -> usize {
        match self.raw() {
            Some(payload) if self.field.is_variable() => variable::encoded_len(payload.len()),
            _ => 0,
        }
    }
}
