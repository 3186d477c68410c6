use crate::error::{RecordError, Result};
use crate::record::record_len;

/// A run of contiguous records handed to a sink in one delivery.
#[derive(Debug, Clone, Copy)]
pub struct RecordPacket<'a> {
    bytes: &'a [u8],
    fixed_len: usize,
}

impl<'a> RecordPacket<'a> {
    /// Wraps `bytes` holding back-to-back records whose fixed region is
    /// `fixed_len` bytes long.
    pub fn new(bytes: &'a [u8], fixed_len: usize) -> Self {
        Self { bytes, fixed_len }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Iterates the records, splitting on each record's stored variable length.
    pub fn records(&self) -> Records<'a> {
        Records {
            bytes: self.bytes,
            fixed_len: self.fixed_len,
            position: 0,
        }
    }
}

impl<'a> IntoIterator for RecordPacket<'a> {
    type Item = Result<&'a [u8]>;
    type IntoIter = Records<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.records()
    }
}

/// Iterator over the records of a [`RecordPacket`].
///
/// Yields an error and stops if a record's framing runs past the packet.
#[derive(Debug, Clone)]
pub struct Records<'a> {
    bytes: &'a [u8],
    fixed_len: usize,
    position: usize,
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<&'a [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.bytes.len() {
            return None;
        }
        let start = self.position;
        let rest = &self.bytes[start..];
        let len = match record_len(rest, self.fixed_len) {
            Ok(len) if len <= rest.len() => len,
            Ok(len) => {
                self.position = self.bytes.len();
                return Some(Err(RecordError::MalformedRecord {
                    offset: start,
                    len,
                    record_len: self.bytes.len(),
                }));
            }
            Err(err) => {
                self.position = self.bytes.len();
                return Some(Err(err));
            }
        };
        self.position += len;
        Some(Ok(&rest[..len]))
    }
}
