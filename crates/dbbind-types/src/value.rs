//! Runtime values - the representation of every value bound to a command
//!
//! [`DbValue`] covers the scalar values a provider understands plus two
//! structural forms: `List` (the values of an In/Between field) and `Map`
//! (a dynamic key/value entity).

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::ValueType;

/// The runtime value bound to a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum DbValue {
    /// Database null
    Null,
    Boolean(bool),
    Byte(u8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Single(f32),
    Double(f64),
    Decimal(Decimal),
    String(String),
    Guid(Uuid),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    DateTimeOffset(DateTime<FixedOffset>),
    Time(NaiveTime),
    Binary(Vec<u8>),
    Enum(EnumValue),

    /// Ordered values of an array parameter
    List(Vec<DbValue>),
    /// Dynamic entity (string-keyed, insertion ordered)
    Map(IndexMap<String, DbValue>),
}

impl DbValue {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get the value type of this value.
    ///
    /// Null and structural values have no value type.
    pub fn value_type(&self) -> Option<ValueType> {
        let ty = match self {
            Self::Null | Self::List(_) | Self::Map(_) => return None,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Byte(_) => ValueType::Byte,
            Self::Int16(_) => ValueType::Int16,
            Self::Int32(_) => ValueType::Int32,
            Self::Int64(_) => ValueType::Int64,
            Self::Single(_) => ValueType::Single,
            Self::Double(_) => ValueType::Double,
            Self::Decimal(_) => ValueType::Decimal,
            Self::String(_) => ValueType::String,
            Self::Guid(_) => ValueType::Guid,
            Self::Date(_) => ValueType::Date,
            Self::DateTime(_) => ValueType::DateTime,
            Self::DateTimeOffset(_) => ValueType::DateTimeOffset,
            Self::Time(_) => ValueType::Time,
            Self::Binary(_) => ValueType::Binary,
            Self::Enum(e) => ValueType::Enum(e.type_name.clone()),
        };
        Some(ty)
    }

    /// Short name of the value's shape, used in diagnostics
    pub fn shape_name(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::List(_) => "list".to_string(),
            Self::Map(_) => "map".to_string(),
            other => other
                .value_type()
                .map(|t| t.to_string())
                .unwrap_or_default(),
        }
    }

    /// Try to get as String
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as List
    pub fn as_list(&self) -> Option<&[DbValue]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    /// Try to get as Map
    pub fn as_map(&self) -> Option<&IndexMap<String, DbValue>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Create a null value
    pub fn null() -> Self {
        Self::Null
    }

    /// Create a string value
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Create a binary value
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Binary(bytes.into())
    }

    /// Create a list value
    pub fn list<T: Into<DbValue>>(values: impl IntoIterator<Item = T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    /// Create a map value
    pub fn map<K: Into<String>, V: Into<DbValue>>(
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Convert a JSON value.
    ///
    /// Integers become `Int64` (or `Int32` when they fit), other numbers
    /// `Double`, arrays `List` and objects `Map`.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Boolean(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i32::try_from(i).map(Self::Int32).unwrap_or(Self::Int64(i))
                } else {
                    n.as_f64().map(Self::Double).unwrap_or(Self::Null)
                }
            }
            serde_json::Value::String(s) => Self::String(s.clone()),
            serde_json::Value::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            serde_json::Value::Object(entries) => Self::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Render as a JSON value for display and CLI output
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as J;
        match self {
            Self::Null => J::Null,
            Self::Boolean(b) => J::Bool(*b),
            Self::Byte(v) => J::from(*v),
            Self::Int16(v) => J::from(*v),
            Self::Int32(v) => J::from(*v),
            Self::Int64(v) => J::from(*v),
            Self::Single(v) => J::from(*v),
            Self::Double(v) => J::from(*v),
            Self::Enum(e) => J::String(e.name.clone()),
            Self::List(values) => J::Array(values.iter().map(Self::to_json).collect()),
            Self::Map(map) => J::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            other => J::String(other.to_string()),
        }
    }
}

impl fmt::Display for DbValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Byte(v) => write!(f, "{}", v),
            Self::Int16(v) => write!(f, "{}", v),
            Self::Int32(v) => write!(f, "{}", v),
            Self::Int64(v) => write!(f, "{}", v),
            Self::Single(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{}", v),
            Self::Decimal(d) => write!(f, "{}", d),
            Self::String(s) => write!(f, "{}", s),
            Self::Guid(g) => write!(f, "{}", g),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::DateTimeOffset(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.f")),
            Self::Binary(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Self::Enum(e) => write!(f, "{}", e),
            Self::List(values) => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Self::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

// ============================================================================
// Enum values
// ============================================================================

/// A value of an enumerated type: its variant name and discriminant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumValue {
    /// Name of the enum type
    pub type_name: String,
    /// Variant name
    pub name: String,
    /// Discriminant
    pub value: i64,
}

impl EnumValue {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>, value: i64) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
            value,
        }
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.type_name, self.name)
    }
}

// ============================================================================
// Conversions from Rust values
// ============================================================================

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for DbValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
    bool => Boolean,
    u8 => Byte,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Single,
    f64 => Double,
    Decimal => Decimal,
    String => String,
    Uuid => Guid,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    DateTime<FixedOffset> => DateTimeOffset,
    NaiveTime => Time,
    EnumValue => Enum,
    Vec<DbValue> => List,
    IndexMap<String, DbValue> => Map,
}

impl From<&str> for DbValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl<T: Into<DbValue>> From<Option<T>> for DbValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}
