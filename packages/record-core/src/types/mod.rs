//! Field types, their byte widths in the fixed region, and decoded values.

mod value;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RecordError, Result};

pub use value::Value;

/// Width of the slot a variable-length field occupies in the fixed region.
pub const VAR_SLOT_WIDTH: usize = 4;

/// Storage type of a record field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FieldType {
    Bool,
    Byte,
    Int16,
    Int32,
    Int64,
    FixedDecimal,
    Float,
    Double,
    String,
    WString,
    #[serde(rename = "V_String")]
    VString,
    #[serde(rename = "V_WString")]
    VWString,
    Date,
    DateTime,
    Blob,
    SpatialObj,
}

/// Accessor family a field type belongs to.
///
/// Typed getters and setters are checked against the family rather than the
/// exact type, so an integer setter works on Byte through Int64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFamily {
    Bool,
    Int,
    Float,
    Text,
    DateTime,
    Blob,
}

impl FieldFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldFamily::Bool => "bool",
            FieldFamily::Int => "int",
            FieldFamily::Float => "float",
            FieldFamily::Text => "string",
            FieldFamily::DateTime => "date",
            FieldFamily::Blob => "blob",
        }
    }
}

impl FieldType {
    /// All field types in schema-name order.
    pub const ALL: [FieldType; 16] = [
        FieldType::Bool,
        FieldType::Byte,
        FieldType::Int16,
        FieldType::Int32,
        FieldType::Int64,
        FieldType::FixedDecimal,
        FieldType::Float,
        FieldType::Double,
        FieldType::String,
        FieldType::WString,
        FieldType::VString,
        FieldType::VWString,
        FieldType::Date,
        FieldType::DateTime,
        FieldType::Blob,
        FieldType::SpatialObj,
    ];

    /// Name used for this type in schema XML.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Bool => "Bool",
            FieldType::Byte => "Byte",
            FieldType::Int16 => "Int16",
            FieldType::Int32 => "Int32",
            FieldType::Int64 => "Int64",
            FieldType::FixedDecimal => "FixedDecimal",
            FieldType::Float => "Float",
            FieldType::Double => "Double",
            FieldType::String => "String",
            FieldType::WString => "WString",
            FieldType::VString => "V_String",
            FieldType::VWString => "V_WString",
            FieldType::Date => "Date",
            FieldType::DateTime => "DateTime",
            FieldType::Blob => "Blob",
            FieldType::SpatialObj => "SpatialObj",
        }
    }

    pub fn family(self) -> FieldFamily {
        match self {
            FieldType::Bool => FieldFamily::Bool,
            FieldType::Byte | FieldType::Int16 | FieldType::Int32 | FieldType::Int64 => {
                FieldFamily::Int
            }
            FieldType::FixedDecimal | FieldType::Float | FieldType::Double => FieldFamily::Float,
            FieldType::String | FieldType::WString | FieldType::VString | FieldType::VWString => {
                FieldFamily::Text
            }
            FieldType::Date | FieldType::DateTime => FieldFamily::DateTime,
            FieldType::Blob | FieldType::SpatialObj => FieldFamily::Blob,
        }
    }

    /// Returns true for types stored through the variable region.
    pub fn is_variable(self) -> bool {
        matches!(
            self,
            FieldType::VString | FieldType::VWString | FieldType::Blob | FieldType::SpatialObj
        )
    }

    /// Returns true if the declared size is taken from the schema rather than
    /// implied by the type.
    pub fn is_sized(self) -> bool {
        matches!(
            self,
            FieldType::String
                | FieldType::WString
                | FieldType::VString
                | FieldType::VWString
                | FieldType::Blob
                | FieldType::SpatialObj
                | FieldType::FixedDecimal
        )
    }

    /// Declared size implied by types that carry no explicit size.
    pub fn implied_size(self) -> Option<usize> {
        match self {
            FieldType::Bool | FieldType::Byte => Some(1),
            FieldType::Int16 => Some(2),
            FieldType::Int32 | FieldType::Float => Some(4),
            FieldType::Int64 | FieldType::Double => Some(8),
            FieldType::Date => Some(10),
            FieldType::DateTime => Some(19),
            FieldType::FixedDecimal
            | FieldType::String
            | FieldType::WString
            | FieldType::VString
            | FieldType::VWString
            | FieldType::Blob
            | FieldType::SpatialObj => None,
        }
    }

    /// Bytes of raw value stored in the fixed region, excluding the null marker.
    ///
    /// Variable-length types always occupy a 4-byte slot regardless of size.
    pub fn value_width(self, size: usize) -> usize {
        match self {
            FieldType::Bool | FieldType::Byte => 1,
            FieldType::Int16 => 2,
            FieldType::Int32 | FieldType::Float => 4,
            FieldType::Int64 | FieldType::Double => 8,
            FieldType::Date => 10,
            FieldType::DateTime => 19,
            FieldType::FixedDecimal | FieldType::String => size,
            FieldType::WString => size * 2,
            FieldType::VString | FieldType::VWString | FieldType::Blob | FieldType::SpatialObj => {
                VAR_SLOT_WIDTH
            }
        }
    }

    /// Bytes of null marker trailing the value.
    ///
    /// Bool folds its null state into the value byte and variable slots
    /// encode null in the slot itself, so both have none.
    pub fn null_marker_width(self) -> usize {
        match self {
            FieldType::Bool
            | FieldType::VString
            | FieldType::VWString
            | FieldType::Blob
            | FieldType::SpatialObj => 0,
            _ => 1,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self> {
        FieldType::ALL
            .iter()
            .copied()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| RecordError::UnknownFieldType(s.to_string()))
    }
}
