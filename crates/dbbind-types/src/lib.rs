//! dbbind type system
//!
//! This crate defines the value layer shared by the filter model and the
//! parameter binder:
//! - Runtime values ([`DbValue`]) and enum values
//! - Language value types ([`ValueType`]) and native database types ([`DbType`])
//! - Bound parameters ([`DbParameter`]) and their direction
//! - Conversion rules used by automatic type coercion

pub mod coercion;
pub mod parameter;
pub mod type_system;
pub mod value;

pub use coercion::{ConversionError, ConversionResult, ValueConverter};
pub use parameter::{DbParameter, ParameterDirection};
pub use type_system::{DbType, ValueType};
pub use value::{DbValue, EnumValue};
