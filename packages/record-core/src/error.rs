//! Record codec error types.

use thiserror::Error;

use crate::types::FieldType;

/// Errors raised while building schemas, encoding or decoding records,
/// copying fields and delivering cached output.
#[derive(Error, Debug)]
pub enum RecordError {
    /// Schema XML is malformed or misses a required attribute
    #[error("Schema parse error: {0}")]
    SchemaParse(String),

    /// Schema names a field type this codec does not know
    #[error("Unknown field type '{0}'")]
    UnknownFieldType(String),

    /// Field name not present in the schema
    #[error("Field '{field}' does not exist in the schema")]
    FieldNotFound { field: String },

    /// Accessor or setter used on a field of the wrong type
    #[error("Field '{field}' is of type {actual}, which is not a valid {expected} type")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: FieldType,
    },

    /// Index outside `0..len`
    #[error("Index {index} is out of range, must be between 0 and {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Stored text of a date, datetime or fixed decimal field did not parse
    #[error("Failed to parse value of field '{field}': {message}")]
    ValueParse { field: String, message: String },

    /// A read would leave the bounds of the record blob
    #[error("Malformed record: range at {offset} with length {len} exceeds record length {record_len}")]
    MalformedRecord {
        offset: usize,
        len: usize,
        record_len: usize,
    },

    /// Variable region offsets and lengths are limited to 31 bits
    #[error("Record too large: {size} bytes cannot be addressed")]
    RecordTooLarge { size: usize },

    /// Copier used with a destination built from another schema
    #[error("Schema mismatch: expected {expected} fields, got {actual}")]
    SchemaMismatch { expected: usize, actual: usize },

    /// Output cache written after close
    #[error("Output cache is closed")]
    CacheClosed,

    /// Downstream sink rejected a delivery
    #[error("Sink error: {0}")]
    Sink(String),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Arena token does not refer to a live instance
    #[error("Invalid instance token {0}")]
    InvalidToken(u64),
}

pub type Result<T> = std::result::Result<T, RecordError>;
