//! dbbind error types

use crate::{
    DBB0100, DBB0101, DBB0200, DBB0201, DBB0300, DBB0301, DBB0302, DBB0303, DBB0400, DBB0401,
    DBB0402, DBB0500, DBB0501, DBB0600, DBB0601, ErrorCode,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Coarse classification of a [`DbBindError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// No primary/identity key resolvable when one is required
    Schema,
    /// Referenced column or member is absent
    Field,
    /// Wrong arity or unsupported parameter object shape
    Shape,
    /// Predicate shape not translatable
    Expression,
    /// Automatic conversion has no path between the types
    Conversion,
    /// Bootstrap or registry misuse
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Schema => write!(f, "schema"),
            ErrorKind::Field => write!(f, "field"),
            ErrorKind::Shape => write!(f, "shape"),
            ErrorKind::Expression => write!(f, "expression"),
            ErrorKind::Conversion => write!(f, "conversion"),
            ErrorKind::Configuration => write!(f, "configuration"),
        }
    }
}

/// Main dbbind error type
///
/// Every error is raised synchronously while translating or binding, before
/// the prepared command reaches an execution layer.
#[derive(Debug, Clone, Error)]
pub enum DbBindError {
    /// Schema error (missing key/qualifier)
    #[error("{code}: {message}")]
    Schema {
        code: ErrorCode,
        message: String,
        entity: Option<String>,
    },

    /// Field error (column or member absent)
    #[error("{code}: {message}")]
    Field {
        code: ErrorCode,
        message: String,
        field: String,
    },

    /// Shape error (arity, parameter object shape)
    #[error("{code}: {message}")]
    Shape {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },

    /// Expression error (untranslatable predicate)
    #[error("{code}: {message}")]
    Expression {
        code: ErrorCode,
        message: String,
        expression: Option<String>,
    },

    /// Conversion error (no path between types)
    #[error("{code}: {message}")]
    Conversion {
        code: ErrorCode,
        message: String,
        from_type: String,
        to_type: String,
    },

    /// Configuration error
    #[error("{code}: {message}")]
    Configuration { code: ErrorCode, message: String },
}

impl DbBindError {
    /// No qualifier was supplied and the entity has no primary/identity key
    pub fn missing_primary_key_or_identity(entity: impl Into<String>) -> Self {
        let entity = entity.into();
        Self::Schema {
            code: DBB0100,
            message: format!("No primary key or identity found for '{}'", entity),
            entity: Some(entity),
        }
    }

    /// An explicit qualifier list was empty
    pub fn empty_qualifiers(entity: impl Into<String>) -> Self {
        let entity = entity.into();
        Self::Schema {
            code: DBB0101,
            message: format!("Qualifier list for '{}' is empty", entity),
            entity: Some(entity),
        }
    }

    /// Column absent from the table schema
    pub fn missing_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::Field {
            code: DBB0200,
            message: format!("Field '{}' is not present in the table schema", field),
            field,
        }
    }

    /// Member not declared on an entity type
    pub fn missing_member(type_name: &str, member: impl Into<String>) -> Self {
        let member = member.into();
        Self::Field {
            code: DBB0201,
            message: format!("Member '{}' is not declared on '{}'", member, type_name),
            field: member,
        }
    }

    /// Between/NotBetween with an arity other than two
    pub fn invalid_between(parameter: &str, count: usize) -> Self {
        Self::Shape {
            code: DBB0300,
            message: format!(
                "Between on '{}' requires exactly 2 values, found {}",
                parameter, count
            ),
            context: Some(parameter.to_string()),
        }
    }

    /// A nested map was found where a single flat key/value map was expected
    pub fn nested_map(key: &str) -> Self {
        Self::Shape {
            code: DBB0301,
            message: format!(
                "Entry '{}' is a map; a single flat key/value map was expected",
                key
            ),
            context: Some(key.to_string()),
        }
    }

    /// The whole parameter object has an unsupported shape
    pub fn ambiguous_parameter_shape(shape: impl Into<String>) -> Self {
        let shape = shape.into();
        Self::Shape {
            code: DBB0302,
            message: format!(
                "Cannot bind a value of shape '{}' as a parameter object; expected a string-keyed map",
                shape
            ),
            context: Some(shape),
        }
    }

    /// A dynamic object exposes no members
    pub fn no_inspectable_members(shape: impl Into<String>) -> Self {
        let shape = shape.into();
        Self::Shape {
            code: DBB0303,
            message: format!("Object of shape '{}' has no inspectable members", shape),
            context: Some(shape),
        }
    }

    /// Untranslatable predicate node
    pub fn invalid_expression(message: impl Into<String>, expression: impl Into<String>) -> Self {
        Self::Expression {
            code: DBB0400,
            message: message.into(),
            expression: Some(expression.into()),
        }
    }

    /// Operator with no filter counterpart
    pub fn unsupported_operator(operator: &str, expression: impl Into<String>) -> Self {
        Self::Expression {
            code: DBB0401,
            message: format!("Operator '{}' cannot be translated into a filter", operator),
            expression: Some(expression.into()),
        }
    }

    /// Value side of a comparison does not reduce to a constant
    pub fn non_constant_operand(expression: impl Into<String>) -> Self {
        Self::Expression {
            code: DBB0402,
            message: "Comparison operand does not reduce to a constant value".to_string(),
            expression: Some(expression.into()),
        }
    }

    /// No conversion path between the two types
    pub fn no_conversion(from_type: impl Into<String>, to_type: impl Into<String>) -> Self {
        let from_type = from_type.into();
        let to_type = to_type.into();
        Self::Conversion {
            code: DBB0500,
            message: format!("Cannot convert {} to {}", from_type, to_type),
            from_type,
            to_type,
        }
    }

    /// The value could not be represented in the target type
    pub fn invalid_value(
        from_type: impl Into<String>,
        to_type: impl Into<String>,
        detail: &str,
    ) -> Self {
        let from_type = from_type.into();
        let to_type = to_type.into();
        Self::Conversion {
            code: DBB0501,
            message: format!("Cannot convert {} to {}: {}", from_type, to_type, detail),
            from_type,
            to_type,
        }
    }

    /// A global instance was installed twice
    pub fn already_installed(what: &str) -> Self {
        Self::Configuration {
            code: DBB0600,
            message: format!("The global {} has already been installed", what),
        }
    }

    /// Options or registry input that cannot be used
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            code: DBB0601,
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Schema { code, .. } => *code,
            Self::Field { code, .. } => *code,
            Self::Shape { code, .. } => *code,
            Self::Expression { code, .. } => *code,
            Self::Conversion { code, .. } => *code,
            Self::Configuration { code, .. } => *code,
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Schema { .. } => ErrorKind::Schema,
            Self::Field { .. } => ErrorKind::Field,
            Self::Shape { .. } => ErrorKind::Shape,
            Self::Expression { .. } => ErrorKind::Expression,
            Self::Conversion { .. } => ErrorKind::Conversion,
            Self::Configuration { .. } => ErrorKind::Configuration,
        }
    }

    /// Help text registered for the error code, if any
    pub fn help(&self) -> Option<&'static str> {
        self.code().info().help
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_between_error_message() {
        let err = DbBindError::invalid_between("Created", 1);
        assert_eq!(err.kind(), ErrorKind::Shape);
        assert_eq!(
            err.to_string(),
            "DBB0300: Between on 'Created' requires exactly 2 values, found 1"
        );
        assert!(err.help().is_some());
    }

    #[test]
    fn test_kinds_follow_codes() {
        let errors = [
            DbBindError::missing_primary_key_or_identity("Person"),
            DbBindError::missing_field("Age"),
            DbBindError::ambiguous_parameter_shape("integer"),
            DbBindError::invalid_expression("bad", "x ? y : z"),
            DbBindError::no_conversion("String", "Guid"),
            DbBindError::already_installed("metadata cache"),
        ];
        for err in errors {
            let code = err.code();
            let matches = match err.kind() {
                ErrorKind::Schema => code.is_schema_error(),
                ErrorKind::Field => code.is_field_error(),
                ErrorKind::Shape => code.is_shape_error(),
                ErrorKind::Expression => code.is_expression_error(),
                ErrorKind::Conversion => code.is_conversion_error(),
                ErrorKind::Configuration => code.is_configuration_error(),
            };
            assert!(matches, "{} does not match kind {}", code, err.kind());
        }
    }
}
