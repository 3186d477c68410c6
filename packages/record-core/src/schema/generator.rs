//! Mutable schema editing view.

use tracing::debug;

use crate::error::{RecordError, Result};
use crate::types::FieldType;

use super::{FieldDescriptor, RecordSchema};

/// A field definition awaiting layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub field_type: FieldType,
    pub size: usize,
    pub scale: usize,
    pub source: String,
}

impl FieldDef {
    /// Creates a definition. Types with an implied size ignore `size`.
    pub fn new(name: impl Into<String>, field_type: FieldType, size: usize, scale: usize) -> Self {
        Self {
            name: name.into(),
            field_type,
            size: field_type.implied_size().unwrap_or(size),
            scale,
            source: String::new(),
        }
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Bool, 0, 0)
    }

    pub fn byte(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Byte, 0, 0)
    }

    pub fn int16(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Int16, 0, 0)
    }

    pub fn int32(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Int32, 0, 0)
    }

    pub fn int64(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Int64, 0, 0)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Float, 0, 0)
    }

    pub fn double(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Double, 0, 0)
    }

    /// `size` is the total character width including sign and decimal point.
    pub fn fixed_decimal(name: impl Into<String>, size: usize, scale: usize) -> Self {
        Self::new(name, FieldType::FixedDecimal, size, scale)
    }

    pub fn string(name: impl Into<String>, size: usize) -> Self {
        Self::new(name, FieldType::String, size, 0)
    }

    pub fn wstring(name: impl Into<String>, size: usize) -> Self {
        Self::new(name, FieldType::WString, size, 0)
    }

    pub fn v_string(name: impl Into<String>, size: usize) -> Self {
        Self::new(name, FieldType::VString, size, 0)
    }

    pub fn v_wstring(name: impl Into<String>, size: usize) -> Self {
        Self::new(name, FieldType::VWString, size, 0)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Date, 0, 0)
    }

    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::DateTime, 0, 0)
    }

    pub fn blob(name: impl Into<String>, size: usize) -> Self {
        Self::new(name, FieldType::Blob, size, 0)
    }

    pub fn spatial_obj(name: impl Into<String>, size: usize) -> Self {
        Self::new(name, FieldType::SpatialObj, size, 0)
    }

    /// Sets the provenance label.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

impl From<&FieldDescriptor> for FieldDef {
    fn from(field: &FieldDescriptor) -> Self {
        Self {
            name: field.name.clone(),
            field_type: field.field_type,
            size: field.size,
            scale: field.scale,
            source: field.source.clone(),
        }
    }
}

/// Placement options for [`Generator::add_field_def`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AddFieldOptions {
    /// Position to insert at. `None` or a position past the end appends.
    pub insert_at: Option<usize>,
}

/// Ordered list of field definitions that can be edited and then laid out.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    fields: Vec<FieldDef>,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_defs(fields: Vec<FieldDef>) -> Self {
        Self { fields }
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Appends a field and returns the name it was stored under.
    ///
    /// # Arguments
    /// * `name` - Requested name. A clash appends `"2"` until unique.
    /// * `field_type` - Storage type
    /// * `size` - Declared size, ignored for types with an implied size
    /// * `scale` - Decimal places, meaningful for FixedDecimal only
    ///
    /// # Returns
    /// The actual name, which differs from `name` after a clash.
    pub fn add_field(
        &mut self,
        name: &str,
        field_type: FieldType,
        size: usize,
        scale: usize,
    ) -> String {
        self.add_field_def(
            FieldDef::new(name, field_type, size, scale),
            AddFieldOptions::default(),
        )
    }

    /// Adds a prepared definition at the position given by `options`.
    ///
    /// # Returns
    /// The actual name, which differs from `def.name` after a clash.
    pub fn add_field_def(&mut self, mut def: FieldDef, options: AddFieldOptions) -> String {
        let requested = def.name.clone();
        while self.contains(&def.name) {
            def.name.push('2');
        }
        if def.name != requested {
            debug!(requested = %requested, actual = %def.name, "Renamed duplicate field");
        }

        let actual = def.name.clone();
        match options.insert_at {
            Some(index) if index < self.fields.len() => self.fields.insert(index, def),
            _ => self.fields.push(def),
        }
        actual
    }

    /// Removes every field whose name is listed. Unknown names are ignored.
    pub fn remove_fields(&mut self, names: &[&str]) {
        self.fields
            .retain(|field| !names.contains(&field.name.as_str()));
    }

    /// Moves the field called `name` so it ends up at `new_index`.
    ///
    /// # Errors
    /// `IndexOutOfRange` if `new_index` is not a valid position and
    /// `FieldNotFound` if no field has that name.
    pub fn move_field(&mut self, name: &str, new_index: usize) -> Result<()> {
        if new_index >= self.fields.len() {
            return Err(RecordError::IndexOutOfRange {
                index: new_index,
                len: self.fields.len(),
            });
        }
        let current = self
            .fields
            .iter()
            .position(|field| field.name == name)
            .ok_or_else(|| RecordError::FieldNotFound {
                field: name.to_string(),
            })?;

        let field = self.fields.remove(current);
        self.fields.insert(new_index, field);
        Ok(())
    }

    /// Lays out the current fields into an immutable schema.
    pub fn finalize(&self) -> RecordSchema {
        let schema = RecordSchema::from_defs(&self.fields);
        debug!(
            fields = schema.num_fields(),
            fixed_len = schema.fixed_len(),
            "Finalized record schema"
        );
        schema
    }

    fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.name == name)
    }
}
