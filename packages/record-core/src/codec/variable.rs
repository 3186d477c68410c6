//! Variable-length field slots and payloads.
//!
//! A variable field owns a 4-byte little-endian slot in the fixed region:
//!
//! - `0` is an empty value, `1` is null.
//! - With the top bit clear and either of bits 28-29 set, the value is
//!   inlined: bits 28-29 hold its length (1 to 3) and the low bytes hold
//!   the payload.
//! - Otherwise, with the top bit masked off, the slot is the offset of the
//!   payload relative to the slot itself. The payload is length prefixed:
//!   an odd first byte is a 1-byte prefix (`len * 2 + 1`), an even one
//!   starts a 4-byte prefix (`len * 2`).
//!
//! The writer sets the top bit whenever a relative offset would otherwise
//! look like an inline slot.

use crate::error::{RecordError, Result};
use crate::schema::FieldDescriptor;
use crate::types::{FieldType, Value};

use super::{decode_utf16le, encode_utf16le, truncate_bytes};

/// Slot value of an empty (zero length) field
pub const EMPTY_SLOT: u32 = 0;
/// Slot value of a null field
pub const NULL_SLOT: u32 = 1;
/// Longest payload stored inside the slot
pub const MAX_INLINE_LEN: usize = 3;
/// Longest payload stored with a 1-byte length prefix
pub const MAX_SHORT_LEN: usize = 127;
/// Largest length or relative offset a slot can address
pub const MAX_ADDRESSABLE: usize = 0x7FFF_FFFF;

const INLINE_LEN_MASK: u32 = 0x3000_0000;
const FAR_BIT: u32 = 0x8000_0000;

/// Bytes a payload of `len` adds to the variable region.
pub fn encoded_len(len: usize) -> usize {
    if len <= MAX_INLINE_LEN {
        0
    } else if len <= MAX_SHORT_LEN {
        len + 1
    } else {
        len + 4
    }
}

/// Reads the payload of the variable slot at `slot_offset`.
///
/// # Returns
/// `None` for null, an empty slice for an empty value, otherwise the payload
/// borrowed from `record`.
///
/// # Errors
/// `MalformedRecord` if the slot, prefix or payload falls outside `record`.
pub fn read(record: &[u8], slot_offset: usize) -> Result<Option<&[u8]>> {
    let slot = read_u32(record, slot_offset)?;
    match slot {
        NULL_SLOT => return Ok(None),
        EMPTY_SLOT => return Ok(Some(&[])),
        _ => {}
    }

    if slot & FAR_BIT == 0 && slot & INLINE_LEN_MASK != 0 {
        let len = ((slot >> 28) & 0x3) as usize;
        return Ok(Some(&record[slot_offset..slot_offset + len]));
    }

    let pos = slot_offset + (slot & !FAR_BIT) as usize;
    let first = *record.get(pos).ok_or(RecordError::MalformedRecord {
        offset: pos,
        len: 1,
        record_len: record.len(),
    })?;
    let (start, len) = if first & 1 == 1 {
        (pos + 1, usize::from(first >> 1))
    } else {
        (pos + 4, (read_u32(record, pos)? / 2) as usize)
    };

    let end = start
        .checked_add(len)
        .filter(|&end| end <= record.len())
        .ok_or(RecordError::MalformedRecord {
            offset: start,
            len,
            record_len: record.len(),
        })?;
    Ok(Some(&record[start..end]))
}

/// Writes the slot at `slot_offset` and appends any out-of-line payload to
/// the end of `buffer`, which must currently end at the variable region's
/// write position.
///
/// # Errors
/// `MalformedRecord` if `buffer` does not hold the whole slot,
/// `RecordTooLarge` if the payload or its relative offset exceeds 31 bits.
pub fn write(buffer: &mut Vec<u8>, slot_offset: usize, payload: Option<&[u8]>) -> Result<()> {
    let slot_end = slot_offset + 4;
    if slot_end > buffer.len() {
        return Err(RecordError::MalformedRecord {
            offset: slot_offset,
            len: 4,
            record_len: buffer.len(),
        });
    }

    let slot = match payload {
        None => NULL_SLOT,
        Some([]) => EMPTY_SLOT,
        Some(bytes) if bytes.len() <= MAX_INLINE_LEN => {
            let mut inline = [0u8; 4];
            inline[..bytes.len()].copy_from_slice(bytes);
            u32::from_le_bytes(inline) | ((bytes.len() as u32) << 28)
        }
        Some(bytes) => {
            if bytes.len() > MAX_ADDRESSABLE {
                return Err(RecordError::RecordTooLarge { size: bytes.len() });
            }
            let pos = buffer.len();
            let slot = offset_slot(pos - slot_offset)?;

            if bytes.len() <= MAX_SHORT_LEN {
                buffer.push(((bytes.len() << 1) | 1) as u8);
            } else {
                buffer.extend_from_slice(&((bytes.len() as u32) << 1).to_le_bytes());
            }
            buffer.extend_from_slice(bytes);
            slot
        }
    };
    buffer[slot_offset..slot_end].copy_from_slice(&slot.to_le_bytes());
    Ok(())
}

/// Slot value pointing `relative` bytes past the slot. Offsets with bit 28
/// or 29 set carry the top bit so they do not read as inline values.
fn offset_slot(relative: usize) -> Result<u32> {
    if relative > MAX_ADDRESSABLE {
        return Err(RecordError::RecordTooLarge { size: relative });
    }
    let slot = relative as u32;
    if slot & INLINE_LEN_MASK != 0 {
        return Ok(slot | FAR_BIT);
    }
    Ok(slot)
}

/// Converts a value into the payload bytes of a variable field.
///
/// V_String is truncated to `size` bytes and V_WString to `size` UTF-16
/// units. Blob payloads are stored as given.
pub fn encode_value(field: &FieldDescriptor, value: &Value) -> Result<Vec<u8>> {
    match (field.field_type, value) {
        (FieldType::VString, Value::Text(s)) => Ok(truncate_bytes(s, field.size).to_vec()),
        (FieldType::VWString, Value::Text(s)) => Ok(encode_utf16le(s, field.size)),
        (FieldType::Blob | FieldType::SpatialObj, Value::Blob(bytes)) => Ok(bytes.clone()),
        _ => Err(RecordError::TypeMismatch {
            field: field.name.clone(),
            expected: value.family().as_str(),
            actual: field.field_type,
        }),
    }
}

/// Converts payload bytes back into a value.
pub fn decode_value(field: &FieldDescriptor, payload: &[u8]) -> Value {
    match field.field_type {
        FieldType::VWString => Value::Text(decode_utf16le(payload, false)),
        FieldType::Blob | FieldType::SpatialObj => Value::Blob(payload.to_vec()),
        _ => Value::Text(String::from_utf8_lossy(payload).into_owned()),
    }
}

pub(crate) fn read_u32(record: &[u8], offset: usize) -> Result<u32> {
    record
        .get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(RecordError::MalformedRecord {
            offset,
            len: 4,
            record_len: record.len(),
        })
}
