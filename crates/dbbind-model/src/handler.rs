//! Property handler contract
//!
//! A property handler transforms a member's value on its way into a
//! parameter (`set`) and on its way back from a result (`get`). Typical
//! handlers serialize structured values to text or normalize units.

use dbbind_types::{DbValue, ValueType};
use std::fmt;

use crate::{ClassProperty, DbField};

/// Context passed to [`PropertyHandler::set`]
#[derive(Debug, Clone, Copy)]
pub struct PropertyHandlerSetOptions<'a> {
    /// Property being bound
    pub property: &'a ClassProperty,
    /// Name of the parameter the value is bound to
    pub parameter_name: &'a str,
    /// Schema column matched for the property, if any
    pub db_field: Option<&'a DbField>,
}

/// Context passed to [`PropertyHandler::get`]
#[derive(Debug, Clone, Copy)]
pub struct PropertyHandlerGetOptions<'a> {
    pub property: &'a ClassProperty,
}

/// Pluggable per-property value transform
pub trait PropertyHandler: Send + Sync + fmt::Debug {
    /// Type of the values `set` produces.
    ///
    /// `None` means the binder uses the runtime type of the returned value.
    fn return_type(&self) -> Option<ValueType> {
        None
    }

    /// Transform a value before it is bound
    fn set(&self, value: DbValue, options: &PropertyHandlerSetOptions<'_>) -> DbValue;

    /// Transform a value read back from the database
    fn get(&self, value: DbValue, options: &PropertyHandlerGetOptions<'_>) -> DbValue;
}
