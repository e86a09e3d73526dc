//! Value conversion rules
//!
//! Automatic conversion rewrites a value into the type a schema column
//! expects. The supported paths are:
//! - String <-> Guid
//! - Date -> DateTime / DateTimeOffset, and the temporal narrowing back
//! - numeric <-> numeric (with range checks, integral targets round half to even)
//! - any scalar -> String, and String -> any parseable scalar
//! - Boolean <-> integral (false = 0, true = 1)
//! - Enum -> String (variant name) or integral (discriminant)

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use dbbind_diagnostics::DbBindError;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use thiserror::Error;
use uuid::Uuid;

use crate::{DbValue, ValueType};

/// Conversion errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// No conversion path between the types
    #[error("Cannot convert from {from} to {to}")]
    CannotConvert { from: String, to: String },

    /// The path exists but this value does not fit the target
    #[error("Cannot convert {value} from {from} to {to}")]
    InvalidValue {
        value: String,
        from: String,
        to: String,
    },
}

impl From<ConversionError> for DbBindError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::CannotConvert { from, to } => DbBindError::no_conversion(from, to),
            ConversionError::InvalidValue { value, from, to } => {
                DbBindError::invalid_value(from, to, &format!("'{}' is out of range or malformed", value))
            }
        }
    }
}

/// Conversion result
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Applies the conversion rules between value types
#[derive(Debug, Clone, Default)]
pub struct ValueConverter;

impl ValueConverter {
    /// Create a new converter
    pub fn new() -> Self {
        Self
    }

    /// Check if a conversion path exists from `from` to `to`
    pub fn can_convert(&self, from: &ValueType, to: &ValueType) -> bool {
        if from == to {
            return true;
        }

        match (from, to) {
            (ValueType::String, ValueType::Guid) | (ValueType::Guid, ValueType::String) => true,

            // Temporal widening and narrowing
            (ValueType::Date, ValueType::DateTime | ValueType::DateTimeOffset) => true,
            (ValueType::DateTime, ValueType::Date | ValueType::DateTimeOffset | ValueType::Time) => true,
            (ValueType::DateTimeOffset, ValueType::Date | ValueType::DateTime) => true,

            (f, t) if f.is_numeric() && t.is_numeric() => true,

            // Representation conversions
            (_, ValueType::String) => !matches!(from, ValueType::Binary),
            (ValueType::String, t) => !matches!(t, ValueType::Binary | ValueType::Enum(_)),

            (ValueType::Boolean, t) if t.is_integral() => true,
            (f, ValueType::Boolean) if f.is_integral() => true,

            (ValueType::Enum(_), t) if t.is_integral() => true,

            _ => false,
        }
    }

    /// Convert `value` to the target type.
    ///
    /// Null passes through unchanged.
    pub fn convert(&self, value: DbValue, to: &ValueType) -> ConversionResult<DbValue> {
        let Some(from) = value.value_type() else {
            return Ok(value);
        };
        if &from == to {
            return Ok(value);
        }
        if !self.can_convert(&from, to) {
            return Err(ConversionError::CannotConvert {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let invalid = || ConversionError::InvalidValue {
            value: value.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        };

        let converted = match to {
            ValueType::String => Some(DbValue::String(match &value {
                DbValue::Enum(e) => e.name.clone(),
                other => other.to_string(),
            })),
            ValueType::Guid => value
                .as_str()
                .and_then(|s| Uuid::parse_str(s.trim()).ok())
                .map(DbValue::Guid),
            ValueType::Date => to_date(&value).map(DbValue::Date),
            ValueType::DateTime => to_date_time(&value).map(DbValue::DateTime),
            ValueType::DateTimeOffset => to_date_time_offset(&value).map(DbValue::DateTimeOffset),
            ValueType::Time => to_time(&value).map(DbValue::Time),
            ValueType::Boolean => to_boolean(&value).map(DbValue::Boolean),
            ValueType::Byte => to_integer(&value).and_then(|i| u8::try_from(i).ok()).map(DbValue::Byte),
            ValueType::Int16 => to_integer(&value).and_then(|i| i16::try_from(i).ok()).map(DbValue::Int16),
            ValueType::Int32 => to_integer(&value).and_then(|i| i32::try_from(i).ok()).map(DbValue::Int32),
            ValueType::Int64 => to_integer(&value).and_then(|i| i64::try_from(i).ok()).map(DbValue::Int64),
            ValueType::Single => to_double(&value).map(|d| DbValue::Single(d as f32)),
            ValueType::Double => to_double(&value).map(DbValue::Double),
            ValueType::Decimal => to_decimal(&value).map(DbValue::Decimal),
            ValueType::Binary | ValueType::Enum(_) => None,
        };

        converted.ok_or_else(invalid)
    }
}

fn to_integer(value: &DbValue) -> Option<i128> {
    match value {
        DbValue::Boolean(b) => Some(i128::from(*b)),
        DbValue::Byte(v) => Some(i128::from(*v)),
        DbValue::Int16(v) => Some(i128::from(*v)),
        DbValue::Int32(v) => Some(i128::from(*v)),
        DbValue::Int64(v) => Some(i128::from(*v)),
        DbValue::Single(v) => round_float(f64::from(*v)),
        DbValue::Double(v) => round_float(*v),
        DbValue::Decimal(d) => d.round().to_i128(),
        DbValue::String(s) => s.trim().parse::<i128>().ok(),
        DbValue::Enum(e) => Some(i128::from(e.value)),
        _ => None,
    }
}

fn round_float(value: f64) -> Option<i128> {
    if !value.is_finite() {
        return None;
    }
    value.round_ties_even().to_i128()
}

fn to_double(value: &DbValue) -> Option<f64> {
    match value {
        DbValue::Single(v) => Some(f64::from(*v)),
        DbValue::Double(v) => Some(*v),
        DbValue::Decimal(d) => d.to_f64(),
        DbValue::String(s) => s.trim().parse::<f64>().ok(),
        other => to_integer(other).and_then(|i| i.to_f64()),
    }
}

fn to_decimal(value: &DbValue) -> Option<Decimal> {
    match value {
        DbValue::Decimal(d) => Some(*d),
        DbValue::Single(v) => Decimal::from_f32(*v),
        DbValue::Double(v) => Decimal::from_f64(*v),
        DbValue::String(s) => s.trim().parse::<Decimal>().ok(),
        other => to_integer(other).and_then(Decimal::from_i128),
    }
}

fn to_boolean(value: &DbValue) -> Option<bool> {
    match value {
        DbValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        other => to_integer(other).map(|i| i != 0),
    }
}

fn to_date(value: &DbValue) -> Option<NaiveDate> {
    match value {
        DbValue::DateTime(dt) => Some(dt.date()),
        DbValue::DateTimeOffset(dt) => Some(dt.date_naive()),
        DbValue::String(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
        _ => None,
    }
}

fn to_date_time(value: &DbValue) -> Option<NaiveDateTime> {
    match value {
        DbValue::Date(d) => d.and_hms_opt(0, 0, 0),
        DbValue::DateTimeOffset(dt) => Some(dt.naive_local()),
        DbValue::String(s) => parse_date_time(s.trim()),
        _ => None,
    }
}

fn parse_date_time(s: &str) -> Option<NaiveDateTime> {
    s.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn to_date_time_offset(value: &DbValue) -> Option<DateTime<FixedOffset>> {
    let utc = FixedOffset::east_opt(0)?;
    match value {
        DbValue::Date(d) => d
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().with_timezone(&utc)),
        DbValue::DateTime(dt) => Some(dt.and_utc().with_timezone(&utc)),
        DbValue::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .or_else(|| parse_date_time(s.trim()).map(|dt| dt.and_utc().with_timezone(&utc))),
        _ => None,
    }
}

fn to_time(value: &DbValue) -> Option<NaiveTime> {
    match value {
        DbValue::DateTime(dt) => Some(dt.time()),
        DbValue::String(s) => s.trim().parse::<NaiveTime>().ok(),
        _ => None,
    }
}
