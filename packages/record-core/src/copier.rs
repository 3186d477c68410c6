//! Byte-level field copying between records of two schemas.

use tracing::{debug, warn};

use crate::error::{RecordError, Result};
use crate::record::{RecordAssembler, RecordView};
use crate::schema::RecordSchema;

/// Maps one source field position onto one destination field position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexMap {
    pub source_index: usize,
    pub destination_index: usize,
}

impl IndexMap {
    pub fn new(source_index: usize, destination_index: usize) -> Self {
        Self {
            source_index,
            destination_index,
        }
    }
}

/// Copies encoded field bytes from source records into a destination
/// assembler without decoding them.
///
/// Field types on either side are not compared. A map between mismatched
/// types moves the bytes anyway.
#[derive(Debug, Clone)]
pub struct FieldCopier {
    source: RecordSchema,
    destination: RecordSchema,
    maps: Vec<IndexMap>,
}

impl FieldCopier {
    /// Creates a copier after checking every map against both schemas.
    ///
    /// # Arguments
    /// * `destination` - Schema of the assembler records are copied into
    /// * `source` - Schema of the records passed to [`copy`](Self::copy)
    /// * `maps` - Field pairs, applied in order
    ///
    /// # Errors
    /// `IndexOutOfRange` if any source or destination index is outside its
    /// schema.
    pub fn new(
        destination: &RecordSchema,
        source: &RecordSchema,
        maps: Vec<IndexMap>,
    ) -> Result<Self> {
        for map in &maps {
            let from = source.field(map.source_index)?;
            let to = destination.field(map.destination_index)?;
            if from.field_type != to.field_type {
                warn!(
                    source = %from.name,
                    source_type = %from.field_type,
                    destination = %to.name,
                    destination_type = %to.field_type,
                    "Copy map pairs fields of different types"
                );
            }
        }
        debug!(
            maps = maps.len(),
            source_fields = source.num_fields(),
            destination_fields = destination.num_fields(),
            "Created field copier"
        );
        Ok(Self {
            source: source.clone(),
            destination: destination.clone(),
            maps,
        })
    }

    pub fn maps(&self) -> &[IndexMap] {
        &self.maps
    }

    /// Copies every mapped field of `record` into `destination`.
    ///
    /// # Errors
    /// `SchemaMismatch` if `destination` was built from another schema than
    /// the one this copier was created for, `MalformedRecord` if `record`
    /// does not hold a valid record.
    pub fn copy(&self, record: &[u8], destination: &mut RecordAssembler) -> Result<()> {
        if destination.schema() != &self.destination {
            return Err(RecordError::SchemaMismatch {
                expected: self.destination.num_fields(),
                actual: destination.schema().num_fields(),
            });
        }

        let view = RecordView::new(&self.source, record)?;
        for map in &self.maps {
            let raw = view.raw_bytes(map.source_index)?;
            destination.set_raw(map.destination_index, raw)?;
        }
        Ok(())
    }
}
