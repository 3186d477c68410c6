//! Record schemas: ordered field descriptors with computed byte offsets.
//!
//! A schema is built through a [`Generator`], which is a mutable editing
//! view (append, insert, remove, move). [`Generator::finalize`] lays the
//! fields out sequentially and yields an immutable [`RecordSchema`].

mod generator;
pub mod xml;

use std::collections::HashMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{RecordError, Result};
use crate::types::FieldType;

pub use generator::{AddFieldOptions, FieldDef, Generator};
pub use xml::SchemaDocument;

/// Layout of one field within the fixed region of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name, unique within the schema
    pub name: String,
    /// Storage type
    pub field_type: FieldType,
    /// Declared size (characters, bytes or digits depending on type)
    pub size: usize,
    /// Decimal places for FixedDecimal fields
    pub scale: usize,
    /// Provenance label, carried through XML untouched
    pub source: String,
    /// Byte offset of the slot within the fixed region
    pub offset: usize,
    /// Bytes of raw value in the slot
    pub fixed_width: usize,
    /// Bytes of null marker trailing the value
    pub null_marker_width: usize,
}

impl FieldDescriptor {
    /// Total bytes this field occupies in the fixed region.
    pub fn slot_len(&self) -> usize {
        self.fixed_width + self.null_marker_width
    }

    /// Byte range of the slot within a record.
    pub fn slot_range(&self) -> Range<usize> {
        self.offset..self.offset + self.slot_len()
    }

    pub fn is_variable(&self) -> bool {
        self.field_type.is_variable()
    }
}

/// Immutable, ordered field layout governing a record blob.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    fields: Vec<FieldDescriptor>,
    names: HashMap<String, usize>,
    fixed_len: usize,
}

impl RecordSchema {
    /// Lays out `defs` sequentially. Names must already be unique.
    pub(crate) fn from_defs(defs: &[FieldDef]) -> Self {
        let mut fields = Vec::with_capacity(defs.len());
        let mut names = HashMap::with_capacity(defs.len());
        let mut offset = 0;

        for (index, def) in defs.iter().enumerate() {
            let fixed_width = def.field_type.value_width(def.size);
            let null_marker_width = def.field_type.null_marker_width();
            fields.push(FieldDescriptor {
                name: def.name.clone(),
                field_type: def.field_type,
                size: def.size,
                scale: def.scale,
                source: def.source.clone(),
                offset,
                fixed_width,
                null_marker_width,
            });
            names.insert(def.name.clone(), index);
            offset += fixed_width + null_marker_width;
        }

        Self {
            fields,
            names,
            fixed_len: offset,
        }
    }

    /// Number of fields in the schema.
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Field descriptors in schema order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns the field at `index`.
    ///
    /// # Errors
    /// `IndexOutOfRange` if `index >= num_fields()`.
    pub fn field(&self, index: usize) -> Result<&FieldDescriptor> {
        self.fields.get(index).ok_or(RecordError::IndexOutOfRange {
            index,
            len: self.fields.len(),
        })
    }

    /// Returns the field called `name`.
    ///
    /// # Errors
    /// `FieldNotFound` if no field has that name.
    pub fn field_by_name(&self, name: &str) -> Result<&FieldDescriptor> {
        let index = self.index_of(name)?;
        Ok(&self.fields[index])
    }

    /// Returns the position of the field called `name`.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| RecordError::FieldNotFound {
                field: name.to_string(),
            })
    }

    /// Length of the fixed region in bytes.
    pub fn fixed_len(&self) -> usize {
        self.fixed_len
    }

    /// Smallest possible record: fixed region plus the variable length word.
    pub fn min_record_len(&self) -> usize {
        self.fixed_len + 4
    }

    pub fn has_variable_fields(&self) -> bool {
        self.fields.iter().any(FieldDescriptor::is_variable)
    }

    /// Opens an editing view seeded with this schema's fields.
    pub fn edit(&self) -> Generator {
        Generator::from_defs(self.fields.iter().map(FieldDef::from).collect())
    }
}
