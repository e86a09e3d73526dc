//! Leaf predicate

use dbbind_types::{DbValue, ParameterDirection};
use serde::Serialize;
use std::fmt;

use crate::{FOR_UPDATE_PREFIX, Field, Operation};

/// A single comparison `field <operation> @parameter`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryField {
    field: Field,
    operation: Operation,
    parameter_name: String,
    value: DbValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    direction: Option<ParameterDirection>,
}

impl QueryField {
    /// Create a leaf whose parameter is named after the field
    pub fn new(field: impl Into<Field>, operation: Operation, value: impl Into<DbValue>) -> Self {
        let field = field.into();
        Self {
            parameter_name: field.name().to_string(),
            field,
            operation,
            value: value.into(),
            direction: None,
        }
    }

    /// `name = value`
    pub fn equal(name: impl Into<Field>, value: impl Into<DbValue>) -> Self {
        Self::new(name, Operation::Equal, value)
    }

    pub fn with_direction(mut self, direction: ParameterDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Base parameter name, unique within the owning group tree
    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }

    pub fn value(&self) -> &DbValue {
        &self.value
    }

    pub fn direction(&self) -> Option<ParameterDirection> {
        self.direction
    }

    /// Equal/NotEqual against null, rendered as `IS NULL` / `IS NOT NULL`
    pub fn is_null_check(&self) -> bool {
        self.operation.is_equality() && self.value.is_null()
    }

    /// Values of a collection operation.
    ///
    /// A scalar is a one-element list and null is an empty one.
    pub fn values(&self) -> &[DbValue] {
        match &self.value {
            DbValue::List(values) => values,
            DbValue::Null => &[],
            scalar => std::slice::from_ref(scalar),
        }
    }

    /// Whether the parameter name carries the for-update prefix
    pub fn is_for_update(&self) -> bool {
        self.parameter_name.starts_with(FOR_UPDATE_PREFIX)
    }

    pub(crate) fn set_parameter_name(&mut self, name: String) {
        self.parameter_name = name;
    }

    /// Names of the parameters this leaf binds, in order
    pub fn expanded_names(&self) -> Vec<String> {
        let base = &self.parameter_name;
        if self.is_null_check() {
            Vec::new()
        } else if self.operation.is_in() {
            let count = self.values().len().max(1);
            (0..count).map(|i| format!("{}_In_{}", base, i)).collect()
        } else if self.operation.is_between() {
            vec![format!("{}_Left", base), format!("{}_Right", base)]
        } else {
            vec![base.clone()]
        }
    }
}

impl fmt::Display for QueryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.field.name();
        if self.is_null_check() {
            return match self.operation {
                Operation::Equal => write!(f, "{} IS NULL", name),
                _ => write!(f, "{} IS NOT NULL", name),
            };
        }

        let names = self.expanded_names();
        if self.operation.is_in() {
            let list: Vec<String> = names.iter().map(|n| format!("@{}", n)).collect();
            write!(f, "{} {} ({})", name, self.operation, list.join(", "))
        } else if self.operation.is_between() {
            write!(
                f,
                "{} {} @{}_Left AND @{}_Right",
                name, self.operation, self.parameter_name, self.parameter_name
            )
        } else {
            write!(f, "{} {} @{}", name, self.operation, self.parameter_name)
        }
    }
}
