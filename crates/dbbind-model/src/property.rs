//! Resolved property descriptors

use dbbind_types::{DbType, DbValue, ParameterDirection, ValueType};
use std::sync::Arc;

use crate::{PropertyHandler, PropertyHandlerGetOptions, TypeKey};

/// Per-property overrides declared on a member
#[derive(Debug, Clone, Default)]
pub struct PropertyAttributes {
    /// Column name override
    pub map: Option<String>,
    pub db_type: Option<DbType>,
    pub size: Option<usize>,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
    pub direction: Option<ParameterDirection>,
    /// Parameter name override
    pub parameter_name: Option<String>,
    pub is_primary: bool,
    pub is_identity: bool,
    pub handler: Option<Arc<dyn PropertyHandler>>,
}

impl PropertyAttributes {
    /// Whether any attribute affects the bound parameter itself
    pub fn has_parameter_overrides(&self) -> bool {
        self.direction.is_some() || self.parameter_name.is_some()
    }
}

impl PartialEq for PropertyAttributes {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
            && self.db_type == other.db_type
            && self.size == other.size
            && self.precision == other.precision
            && self.scale == other.scale
            && self.direction == other.direction
            && self.parameter_name == other.parameter_name
            && self.is_primary == other.is_primary
            && self.is_identity == other.is_identity
            && same_handler(&self.handler, &other.handler)
    }
}

pub(crate) fn same_handler(
    a: &Option<Arc<dyn PropertyHandler>>,
    b: &Option<Arc<dyn PropertyHandler>>,
) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

/// A member bound to its mapped column name, handler and attributes.
///
/// Instances held by the metadata cache are immutable and shared.
#[derive(Debug, Clone)]
pub struct ClassProperty {
    /// Column name this member maps to
    pub mapped_name: String,
    /// Member identifier as declared
    pub member_name: String,
    /// Declaring entity type; `None` for dictionary and filter sources
    pub declaring_type: Option<TypeKey>,
    pub declared_type: Option<ValueType>,
    /// Effective handler (attribute, member registration or type registration)
    pub handler: Option<Arc<dyn PropertyHandler>>,
    pub attributes: PropertyAttributes,
}

impl ClassProperty {
    /// Descriptor for a dynamic (untyped) source member
    pub fn dynamic(name: impl Into<String>, declared_type: Option<ValueType>) -> Self {
        let name = name.into();
        Self {
            mapped_name: name.clone(),
            member_name: name,
            declaring_type: None,
            declared_type,
            handler: None,
            attributes: PropertyAttributes::default(),
        }
    }

    pub fn with_handler(mut self, handler: Option<Arc<dyn PropertyHandler>>) -> Self {
        self.handler = handler;
        self
    }

    pub fn is_primary(&self) -> bool {
        self.attributes.is_primary
    }

    pub fn is_identity(&self) -> bool {
        self.attributes.is_identity
    }

    /// Matches either the member identifier or the mapped column name
    pub fn is_named(&self, name: &str) -> bool {
        self.member_name.eq_ignore_ascii_case(name) || self.mapped_name.eq_ignore_ascii_case(name)
    }

    /// Apply the handler's read transform to a value coming back from the database
    pub fn read_value(&self, value: DbValue) -> DbValue {
        match &self.handler {
            Some(handler) => handler.get(value, &PropertyHandlerGetOptions { property: self }),
            None => value,
        }
    }
}

impl PartialEq for ClassProperty {
    fn eq(&self, other: &Self) -> bool {
        self.mapped_name == other.mapped_name
            && self.member_name == other.member_name
            && self.declaring_type == other.declaring_type
            && self.declared_type == other.declared_type
            && same_handler(&self.handler, &other.handler)
            && self.attributes == other.attributes
    }
}
