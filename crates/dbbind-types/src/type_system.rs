//! Value and database type definitions
//!
//! Two type spaces meet at the binder:
//! - [`ValueType`]: the language-side type of a value or declared member
//! - [`DbType`]: the provider-neutral native database type of a parameter

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language-side value type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Boolean,
    Byte,
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    Decimal,
    String,
    Guid,
    /// Date without a time component
    Date,
    /// Date and time without an offset
    DateTime,
    /// Date and time with a UTC offset
    DateTimeOffset,
    /// Time of day
    Time,
    Binary,
    /// Enumerated type, identified by its type name
    Enum(String),
}

impl ValueType {
    /// Create an enum type
    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::Enum(name.into())
    }

    /// Check if this is an enumerated type
    pub fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }

    /// Check if this is an integral numeric type
    pub fn is_integral(&self) -> bool {
        matches!(self, Self::Byte | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Check if this is any numeric type
    pub fn is_numeric(&self) -> bool {
        self.is_integral() || matches!(self, Self::Single | Self::Double | Self::Decimal)
    }

    /// Check if this is a temporal type
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            Self::Date | Self::DateTime | Self::DateTimeOffset | Self::Time
        )
    }

    /// Get the simple name
    pub fn name(&self) -> &str {
        match self {
            Self::Boolean => "Boolean",
            Self::Byte => "Byte",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Single => "Single",
            Self::Double => "Double",
            Self::Decimal => "Decimal",
            Self::String => "String",
            Self::Guid => "Guid",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
            Self::DateTimeOffset => "DateTimeOffset",
            Self::Time => "Time",
            Self::Binary => "Binary",
            Self::Enum(name) => name,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum(name) => write!(f, "enum {}", name),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// Provider-neutral native database type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DbType {
    AnsiString,
    AnsiStringFixedLength,
    Binary,
    Boolean,
    Byte,
    Currency,
    Date,
    DateTime,
    DateTime2,
    DateTimeOffset,
    Decimal,
    Double,
    Guid,
    Int16,
    Int32,
    Int64,
    Object,
    Single,
    String,
    StringFixedLength,
    Time,
    Xml,
}

impl DbType {
    /// Check if values of this type are written as text
    pub const fn is_string_like(&self) -> bool {
        matches!(
            self,
            Self::AnsiString
                | Self::AnsiStringFixedLength
                | Self::String
                | Self::StringFixedLength
                | Self::Xml
        )
    }

    /// Check if this is an integral type
    pub const fn is_integral(&self) -> bool {
        matches!(self, Self::Byte | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Get the type name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AnsiString => "AnsiString",
            Self::AnsiStringFixedLength => "AnsiStringFixedLength",
            Self::Binary => "Binary",
            Self::Boolean => "Boolean",
            Self::Byte => "Byte",
            Self::Currency => "Currency",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
            Self::DateTime2 => "DateTime2",
            Self::DateTimeOffset => "DateTimeOffset",
            Self::Decimal => "Decimal",
            Self::Double => "Double",
            Self::Guid => "Guid",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Object => "Object",
            Self::Single => "Single",
            Self::String => "String",
            Self::StringFixedLength => "StringFixedLength",
            Self::Time => "Time",
            Self::Xml => "Xml",
        }
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
