//! Byte-level encoding of field values.
//!
//! [`fixed`] handles slots that live entirely in the fixed region.
//! [`variable`] handles the 4-byte slots of variable-length fields and the
//! length-prefixed payloads they point at in the variable region.

pub mod fixed;
pub mod variable;

/// Returns `bytes` up to (not including) the first NUL.
pub(crate) fn trim_nul(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

/// Encodes `text` as UTF-16LE, keeping at most `max_units` code units.
pub(crate) fn encode_utf16le(text: &str, max_units: usize) -> Vec<u8> {
    text.encode_utf16()
        .take(max_units)
        .flat_map(u16::to_le_bytes)
        .collect()
}

/// Decodes UTF-16LE bytes, stopping at the first NUL unit if `stop_at_nul`.
/// A trailing odd byte is ignored.
pub(crate) fn decode_utf16le(bytes: &[u8], stop_at_nul: bool) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| !stop_at_nul || unit != 0)
        .collect();
    String::from_utf16_lossy(&units)
}

/// Truncates UTF-8 `text` to at most `max_bytes` bytes.
pub(crate) fn truncate_bytes(text: &str, max_bytes: usize) -> &[u8] {
    let bytes = text.as_bytes();
    &bytes[..bytes.len().min(max_bytes)]
}
