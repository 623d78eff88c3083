//! Owned parameter values.
//!
//! Builders never render literals into SQL text. Every literal is converted into
//! a [`Value`] and bound under a generated parameter name, so the final
//! [`Template`](crate::Template) can be inspected, serialized, or handed to
//! whichever driver executes it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A value bound to a statement parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL
    Null,
    /// `bit`
    Bool(bool),
    /// `int` (also used for the narrower integer types)
    Int(i32),
    /// `bigint`
    BigInt(i64),
    /// `float`
    Float(f64),
    /// `decimal`
    #[cfg(feature = "rust_decimal")]
    Decimal(rust_decimal::Decimal),
    /// `nvarchar`
    Text(String),
    /// `varbinary`
    Bytes(Vec<u8>),
    /// `uniqueidentifier`
    Uuid(Uuid),
    /// `date`
    Date(NaiveDate),
    /// `time`
    Time(NaiveTime),
    /// `datetime2`
    DateTime(NaiveDateTime),
    /// `datetimeoffset` normalized to UTC
    DateTimeUtc(DateTime<Utc>),
    /// JSON document, bound as text
    Json(serde_json::Value),
}

impl Value {
    /// Check if this value is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the variant, used in `sqlfold.sql` log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::BigInt(_) => "bigint",
            Value::Float(_) => "float",
            #[cfg(feature = "rust_decimal")]
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Uuid(_) => "uuid",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::DateTime(_) => "datetime",
            Value::DateTimeUtc(_) => "datetimeoffset",
            Value::Json(_) => "json",
        }
    }

    /// Widen any integer payload to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(i64::from(*v)),
            Value::BigInt(v) => Some(*v),
            _ => None,
        }
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    u8 => Int,
    u16 => Int,
    i64 => BigInt,
    u32 => BigInt,
    f32 => Float,
    f64 => Float,
    String => Text,
    Vec<u8> => Bytes,
    Uuid => Uuid,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
    DateTime<Utc> => DateTimeUtc,
    serde_json::Value => Json,
}

#[cfg(feature = "rust_decimal")]
impl From<rust_decimal::Decimal> for Value {
    fn from(v: rust_decimal::Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_widths() {
        assert_eq!(Value::from(5i16), Value::Int(5));
        assert_eq!(Value::from(5u32), Value::BigInt(5));
        assert_eq!(Value::from(7i64).as_i64(), Some(7));
    }

    #[test]
    fn test_option_maps_none_to_null() {
        assert!(Value::from(Option::<i32>::None).is_null());
        assert_eq!(Value::from(Some("a")), Value::Text("a".to_string()));
    }

    #[test]
    fn test_serialize_untagged() {
        let json = serde_json::to_string(&vec![
            Value::Null,
            Value::from(1),
            Value::from("x"),
            Value::from(true),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,1,"x",true]"#);
    }
}
