use chrono::NaiveDateTime;

use super::FieldFamily;

/// A decoded field value.
///
/// Variants follow the accessor families: all integer widths decode to
/// `Int`, Float/Double/FixedDecimal to `Float`, every text type to `Text`
/// and Date/DateTime to `DateTime` (dates land at midnight).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
    Blob(Vec<u8>),
}

impl Value {
    pub fn family(&self) -> FieldFamily {
        match self {
            Value::Bool(_) => FieldFamily::Bool,
            Value::Int(_) => FieldFamily::Int,
            Value::Float(_) => FieldFamily::Float,
            Value::Text(_) => FieldFamily::Text,
            Value::DateTime(_) => FieldFamily::DateTime,
            Value::Blob(_) => FieldFamily::Blob,
        }
    }
}
