//! Predicate operators

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Precedence 1 (lowest)
    /// Short-circuit logical or
    OrElse,

    // Precedence 2
    /// Short-circuit logical and
    AndAlso,

    // Precedence 3
    Equal,
    NotEqual,

    // Precedence 4
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,

    // Precedence 5
    Add,
    Subtract,

    // Precedence 6
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOp {
    /// Get the precedence level (1-6, higher binds tighter)
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::OrElse => 1,
            Self::AndAlso => 2,
            Self::Equal | Self::NotEqual => 3,
            Self::LessThan | Self::LessThanOrEqual | Self::GreaterThan | Self::GreaterThanOrEqual => 4,
            Self::Add | Self::Subtract => 5,
            Self::Multiply | Self::Divide | Self::Modulo => 6,
        }
    }

    /// Check if this is a comparison operator
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::LessThan
                | Self::LessThanOrEqual
                | Self::GreaterThan
                | Self::GreaterThanOrEqual
        )
    }

    /// Check if this is a logical operator
    pub const fn is_logical(&self) -> bool {
        matches!(self, Self::AndAlso | Self::OrElse)
    }

    pub const fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide | Self::Modulo
        )
    }

    /// The comparison with its operands swapped (`a < b` is `b > a`)
    pub const fn mirrored(&self) -> Self {
        match self {
            Self::LessThan => Self::GreaterThan,
            Self::LessThanOrEqual => Self::GreaterThanOrEqual,
            Self::GreaterThan => Self::LessThan,
            Self::GreaterThanOrEqual => Self::LessThanOrEqual,
            other => *other,
        }
    }

    /// The logical complement of a comparison (`!(a < b)` is `a >= b`)
    pub const fn negated(&self) -> Option<Self> {
        match self {
            Self::Equal => Some(Self::NotEqual),
            Self::NotEqual => Some(Self::Equal),
            Self::LessThan => Some(Self::GreaterThanOrEqual),
            Self::LessThanOrEqual => Some(Self::GreaterThan),
            Self::GreaterThan => Some(Self::LessThanOrEqual),
            Self::GreaterThanOrEqual => Some(Self::LessThan),
            _ => None,
        }
    }

    /// Get the operator symbol
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::OrElse => "||",
            Self::AndAlso => "&&",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Logical not
    Not,
    /// Type conversion (widening casts, nullable unwrapping)
    Convert,
    /// Arithmetic negation
    Negate,
}

impl UnaryOp {
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Convert => "convert",
            Self::Negate => "-",
        }
    }
}
