//! Predicate expression nodes

use dbbind_types::{DbValue, ValueType};
use std::fmt;

use crate::{BinaryOp, BoxExpr, UnaryOp};

/// All predicate expression kinds
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Constant value (captured locals are constants by the time a predicate is built)
    Constant(DbValue),
    /// Member access on the predicate parameter (`x.Age`)
    Member(MemberRef),
    /// Binary operation
    Binary(BinaryExpr),
    /// Unary operation
    Unary(UnaryExpr),
    /// Method call (`x.Name.starts_with("A")`, `list.contains(x.Id)`)
    Call(CallExpr),
    /// Conditional (`test ? a : b`)
    Conditional(ConditionalExpr),
}

/// Member reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRef {
    /// Member identifier as declared on the entity
    pub name: String,
}

/// Binary operation expression
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: BoxExpr,
    pub op: BinaryOp,
    pub right: BoxExpr,
}

/// Unary operation expression
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: BoxExpr,
    /// Target type of a `Convert`
    pub target_type: Option<ValueType>,
}

/// Method call expression
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    /// Receiver; `None` for free functions
    pub target: Option<BoxExpr>,
    pub method: String,
    pub arguments: Vec<Expression>,
}

/// Conditional expression
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpr {
    pub test: BoxExpr,
    pub if_true: BoxExpr,
    pub if_false: BoxExpr,
}

impl Expression {
    pub fn constant(value: impl Into<DbValue>) -> Self {
        Self::Constant(value.into())
    }

    pub fn member(name: impl Into<String>) -> Self {
        Self::Member(MemberRef { name: name.into() })
    }

    pub fn binary(left: Expression, op: BinaryOp, right: Expression) -> Self {
        Self::Binary(BinaryExpr {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: Expression) -> Self {
        Self::Unary(UnaryExpr {
            op: UnaryOp::Not,
            operand: Box::new(operand),
            target_type: None,
        })
    }

    pub fn convert(operand: Expression, target_type: ValueType) -> Self {
        Self::Unary(UnaryExpr {
            op: UnaryOp::Convert,
            operand: Box::new(operand),
            target_type: Some(target_type),
        })
    }

    pub fn negate(operand: Expression) -> Self {
        Self::Unary(UnaryExpr {
            op: UnaryOp::Negate,
            operand: Box::new(operand),
            target_type: None,
        })
    }

    /// Method call on `target`
    pub fn call(target: Expression, method: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Self::Call(CallExpr {
            target: Some(Box::new(target)),
            method: method.into(),
            arguments,
        })
    }

    pub fn conditional(test: Expression, if_true: Expression, if_false: Expression) -> Self {
        Self::Conditional(ConditionalExpr {
            test: Box::new(test),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
        })
    }

    /// Member name, looking through `Convert` wrappers
    pub fn as_member(&self) -> Option<&str> {
        match self {
            Self::Member(member) => Some(&member.name),
            Self::Unary(UnaryExpr {
                op: UnaryOp::Convert,
                operand,
                ..
            }) => operand.as_member(),
            _ => None,
        }
    }

    /// Constant value, looking through `Convert` wrappers and negation of numbers
    pub fn as_constant(&self) -> Option<DbValue> {
        match self {
            Self::Constant(value) => Some(value.clone()),
            Self::Unary(UnaryExpr {
                op: UnaryOp::Convert,
                operand,
                ..
            }) => operand.as_constant(),
            Self::Unary(UnaryExpr {
                op: UnaryOp::Negate,
                operand,
                ..
            }) => match operand.as_constant()? {
                DbValue::Int16(v) => v.checked_neg().map(DbValue::Int16),
                DbValue::Int32(v) => v.checked_neg().map(DbValue::Int32),
                DbValue::Int64(v) => v.checked_neg().map(DbValue::Int64),
                DbValue::Single(v) => Some(DbValue::Single(-v)),
                DbValue::Double(v) => Some(DbValue::Double(-v)),
                DbValue::Decimal(v) => Some(DbValue::Decimal(-v)),
                _ => None,
            },
            _ => None,
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::Binary(binary) => binary.op.precedence(),
            Self::Conditional(_) => 0,
            _ => u8::MAX,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, parent: u8) -> fmt::Result {
        if self.precedence() < parent {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(DbValue::String(s)) => write!(f, "\"{}\"", s),
            Self::Constant(value) => write!(f, "{}", value),
            Self::Member(member) => write!(f, "x.{}", member.name),
            Self::Binary(binary) => {
                let precedence = binary.op.precedence();
                binary.left.fmt_operand(f, precedence)?;
                write!(f, " {} ", binary.op)?;
                binary.right.fmt_operand(f, precedence + 1)
            }
            Self::Unary(unary) => match (unary.op, &unary.target_type) {
                (UnaryOp::Convert, Some(target)) => write!(f, "({}){}", target, unary.operand),
                (UnaryOp::Convert, None) => write!(f, "{}", unary.operand),
                (op, _) => {
                    f.write_str(op.symbol())?;
                    unary.operand.fmt_operand(f, u8::MAX)
                }
            },
            Self::Call(call) => {
                if let Some(target) = &call.target {
                    target.fmt_operand(f, u8::MAX)?;
                    f.write_str(".")?;
                }
                write!(f, "{}(", call.method)?;
                for (i, argument) in call.arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                f.write_str(")")
            }
            Self::Conditional(conditional) => write!(
                f,
                "{} ? {} : {}",
                conditional.test, conditional.if_true, conditional.if_false
            ),
        }
    }
}

impl From<DbValue> for Expression {
    fn from(value: DbValue) -> Self {
        Self::Constant(value)
    }
}
