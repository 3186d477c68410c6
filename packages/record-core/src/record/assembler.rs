//! Builds record blobs from the current field bindings.

use chrono::NaiveDateTime;
use tracing::trace;

use crate::codec::variable;
use crate::config::CacheConfig;
use crate::error::{RecordError, Result};
use crate::schema::RecordSchema;
use crate::types::Value;

use super::{FieldBinding, VAR_LEN_WIDTH};

/// Owns one binding per schema field and a reusable record buffer.
///
/// The slice returned by [`generate`](Self::generate) borrows that buffer, so
/// the previous record is invalidated by the next call.
#[derive(Debug)]
pub struct RecordAssembler {
    schema: RecordSchema,
    bindings: Vec<FieldBinding>,
    buffer: Vec<u8>,
    padding: usize,
}

impl RecordAssembler {
    /// Creates an assembler with every field set to null.
    pub fn new(schema: RecordSchema) -> Self {
        Self::with_padding(schema, CacheConfig::default().assembler_padding)
    }

    /// Like [`new`](Self::new), growing the buffer by `padding` extra bytes
    /// whenever a larger record is needed.
    pub fn with_padding(schema: RecordSchema, padding: usize) -> Self {
        let bindings = schema
            .fields()
            .iter()
            .cloned()
            .map(FieldBinding::new)
            .collect();
        Self {
            buffer: Vec::with_capacity(schema.min_record_len() + padding),
            schema,
            bindings,
            padding,
        }
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub fn bindings(&self) -> &[FieldBinding] {
        &self.bindings
    }

    /// Binding of the field at `index`.
    pub fn binding(&self, index: usize) -> Result<&FieldBinding> {
        self.schema.field(index)?;
        Ok(&self.bindings[index])
    }

    pub fn binding_by_name(&self, name: &str) -> Result<&FieldBinding> {
        let index = self.schema.index_of(name)?;
        Ok(&self.bindings[index])
    }

    /// Mutable binding of the field at `index`.
    pub fn binding_mut(&mut self, index: usize) -> Result<&mut FieldBinding> {
        self.schema.field(index)?;
        Ok(&mut self.bindings[index])
    }

    pub fn binding_mut_by_name(&mut self, name: &str) -> Result<&mut FieldBinding> {
        let index = self.schema.index_of(name)?;
        Ok(&mut self.bindings[index])
    }

    pub fn set_value(&mut self, name: &str, value: &Value) -> Result<()> {
        self.binding_mut_by_name(name)?.set_value(value)
    }

    pub fn set_bool(&mut self, name: &str, value: bool) -> Result<()> {
        self.binding_mut_by_name(name)?.set_bool(value)
    }

    pub fn set_int(&mut self, name: &str, value: i64) -> Result<()> {
        self.binding_mut_by_name(name)?.set_int(value)
    }

    pub fn set_float(&mut self, name: &str, value: f64) -> Result<()> {
        self.binding_mut_by_name(name)?.set_float(value)
    }

    pub fn set_string(&mut self, name: &str, value: &str) -> Result<()> {
        self.binding_mut_by_name(name)?.set_string(value)
    }

    pub fn set_datetime(&mut self, name: &str, value: NaiveDateTime) -> Result<()> {
        self.binding_mut_by_name(name)?.set_datetime(value)
    }

    pub fn set_blob(&mut self, name: &str, value: &[u8]) -> Result<()> {
        self.binding_mut_by_name(name)?.set_blob(value)
    }

    pub fn set_null(&mut self, name: &str) -> Result<()> {
        self.binding_mut_by_name(name)?.set_null();
        Ok(())
    }

    /// Stores encoded bytes in the field at `index`. See [`FieldBinding::set_raw`].
    pub fn set_raw(&mut self, index: usize, raw: Option<&[u8]>) -> Result<()> {
        self.binding_mut(index)?.set_raw(raw);
        Ok(())
    }

    pub fn set_raw_by_name(&mut self, name: &str, raw: Option<&[u8]>) -> Result<()> {
        self.binding_mut_by_name(name)?.set_raw(raw);
        Ok(())
    }

    /// Size of the record the next [`generate`](Self::generate) will produce.
    pub fn data_size(&self) -> usize {
        self.schema.min_record_len() + self.var_len()
    }

    /// Writes a record from the current bindings.
    ///
    /// # Returns
    /// The record, valid until the next call.
    ///
    /// # Errors
    /// `RecordTooLarge` if the variable region cannot be addressed.
    pub fn generate(&mut self) -> Result<&[u8]> {
        let fixed_len = self.schema.fixed_len();
        let var_len = self.var_len();
        let total = fixed_len + VAR_LEN_WIDTH + var_len;
        if var_len > variable::MAX_ADDRESSABLE {
            return Err(RecordError::RecordTooLarge { size: total });
        }

        if self.buffer.capacity() < total {
            let grow_to = total + self.padding;
            trace!(
                from = self.buffer.capacity(),
                to = grow_to,
                "Growing record buffer"
            );
            self.buffer.reserve_exact(grow_to - self.buffer.len());
        }

        self.buffer.clear();
        self.buffer.resize(fixed_len + VAR_LEN_WIDTH, 0);

        for binding in &self.bindings {
            let field = binding.field();
            if field.is_variable() {
                variable::write(&mut self.buffer, field.offset, binding.raw())?;
            } else if let Some(slot) = binding.raw() {
                self.buffer[field.slot_range()].copy_from_slice(slot);
            }
        }

        let written = self.buffer.len() - fixed_len - VAR_LEN_WIDTH;
        self.buffer[fixed_len..fixed_len + VAR_LEN_WIDTH]
            .copy_from_slice(&(written as u32).to_le_bytes());
        Ok(self.buffer.as_slice())
    }

    fn var_len(&self) -> usize {
        self.bindings.iter().map(FieldBinding::var_len).sum()
    }
}
