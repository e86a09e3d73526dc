//! Predicate to filter translation
//!
//! Walks a [`Predicate`] and produces a [`QueryGroup`]. Supported shapes:
//! - comparisons between a member and a constant (either side)
//! - `&&` / `||`, which become nested groups
//! - `contains`, `starts_with` and `ends_with` on string members (Like)
//! - `list.contains(member)` (In)
//! - a bare boolean member (`= true`)
//! - `!` over any of the above
//!
//! Anything else fails immediately with an expression error.

use dbbind_ast::{BinaryExpr, BinaryOp, CallExpr, Expression, Predicate, UnaryOp};
use dbbind_diagnostics::{DbBindError, Result};
use dbbind_model::{ClassProperty, Entity, MetadataCache, TypeKey};
use dbbind_types::{DbValue, ValueType};

use crate::{Conjunction, Field, Operation, QueryField, QueryGroup, QueryNode};

/// Translate `predicate` into a filter tree, resolving member names through `metadata`
pub fn translate_predicate<T: Entity>(
    predicate: &Predicate<T>,
    metadata: &MetadataCache,
) -> Result<QueryGroup> {
    PredicateTranslator::new(metadata).translate(predicate)
}

/// Recursive visitor over predicate expressions
#[derive(Debug, Clone, Copy)]
pub struct PredicateTranslator<'a> {
    metadata: &'a MetadataCache,
}

struct Scope<'p> {
    type_key: TypeKey,
    properties: &'p [ClassProperty],
}

impl<'a> PredicateTranslator<'a> {
    pub fn new(metadata: &'a MetadataCache) -> Self {
        Self { metadata }
    }

    pub fn translate<T: Entity>(&self, predicate: &Predicate<T>) -> Result<QueryGroup> {
        let properties = self.metadata.get::<T>();
        let scope = Scope {
            type_key: TypeKey::of::<T>(),
            properties: &properties,
        };

        let group = match self.node(&scope, predicate.expression(), false)? {
            QueryNode::Group(group) => group,
            QueryNode::Field(field) => QueryGroup::and([field]),
        };
        log::debug!("Translated {} into {}", predicate, group);
        Ok(group)
    }

    fn node(&self, scope: &Scope<'_>, expr: &Expression, negated: bool) -> Result<QueryNode> {
        match expr {
            Expression::Binary(binary) if binary.op.is_logical() => {
                self.group(scope, binary, negated).map(QueryNode::Group)
            }
            Expression::Binary(binary) if binary.op.is_comparison() => {
                self.comparison(scope, expr, binary, negated).map(QueryNode::Field)
            }
            Expression::Binary(binary) => Err(DbBindError::unsupported_operator(
                binary.op.symbol(),
                expr.to_string(),
            )),
            Expression::Unary(unary) if unary.op == UnaryOp::Not => {
                self.node(scope, &unary.operand, !negated)
            }
            Expression::Call(call) => self.call(scope, expr, call, negated).map(QueryNode::Field),
            _ => match expr.as_member() {
                Some(member) => {
                    let field = self.field(scope, member)?;
                    if !matches!(field.declared_type(), None | Some(ValueType::Boolean)) {
                        return Err(DbBindError::invalid_expression(
                            format!("Member '{}' is not a boolean condition", member),
                            expr.to_string(),
                        ));
                    }
                    Ok(QueryNode::Field(QueryField::new(
                        field,
                        Operation::Equal,
                        !negated,
                    )))
                }
                None => Err(DbBindError::invalid_expression(
                    "Expression cannot be reduced to a filter",
                    expr.to_string(),
                )),
            },
        }
    }

    /// `&&` / `||`; negation applies De Morgan
    fn group(&self, scope: &Scope<'_>, binary: &BinaryExpr, negated: bool) -> Result<QueryGroup> {
        let conjunction = match binary.op {
            BinaryOp::AndAlso => Conjunction::And,
            _ => Conjunction::Or,
        };
        let conjunction = if negated {
            conjunction.negated()
        } else {
            conjunction
        };

        let left = self.node(scope, &binary.left, negated)?;
        let right = self.node(scope, &binary.right, negated)?;
        Ok(QueryGroup::new(conjunction, [left, right]))
    }

    fn comparison(
        &self,
        scope: &Scope<'_>,
        expr: &Expression,
        binary: &BinaryExpr,
        negated: bool,
    ) -> Result<QueryField> {
        let (member, op, value_side) = match (binary.left.as_member(), binary.right.as_member()) {
            (Some(_), Some(_)) => {
                return Err(DbBindError::non_constant_operand(expr.to_string()));
            }
            (Some(member), None) => (member, binary.op, &binary.right),
            (None, Some(member)) => (member, binary.op.mirrored(), &binary.left),
            (None, None) => {
                return Err(DbBindError::invalid_expression(
                    "Comparison does not reference an entity member",
                    expr.to_string(),
                ));
            }
        };

        let value = value_side
            .as_constant()
            .ok_or_else(|| DbBindError::non_constant_operand(value_side.to_string()))?;
        let operation = comparison_operation(op)
            .ok_or_else(|| DbBindError::unsupported_operator(op.symbol(), expr.to_string()))?;
        let operation = if negated {
            operation.negated()
        } else {
            operation
        };

        Ok(QueryField::new(self.field(scope, member)?, operation, value))
    }

    fn call(
        &self,
        scope: &Scope<'_>,
        expr: &Expression,
        call: &CallExpr,
        negated: bool,
    ) -> Result<QueryField> {
        let target = call.target.as_deref();
        let argument = match call.arguments.as_slice() {
            [argument] => argument,
            _ => {
                return Err(DbBindError::invalid_expression(
                    format!("Method '{}' takes exactly one argument", call.method),
                    expr.to_string(),
                ));
            }
        };

        // values.contains(x.Member)
        if let (true, Some(member)) = (call.method == "contains", argument.as_member()) {
            let values = target
                .and_then(Expression::as_constant)
                .filter(|v| matches!(v, DbValue::List(_)))
                .ok_or_else(|| DbBindError::non_constant_operand(expr.to_string()))?;
            let operation = if negated { Operation::NotIn } else { Operation::In };
            return Ok(QueryField::new(self.field(scope, member)?, operation, values));
        }

        let member = target.and_then(Expression::as_member).ok_or_else(|| {
            DbBindError::invalid_expression(
                format!("Method '{}' must be called on an entity member", call.method),
                expr.to_string(),
            )
        })?;
        let text = match argument.as_constant() {
            Some(DbValue::String(text)) => text,
            _ => return Err(DbBindError::non_constant_operand(argument.to_string())),
        };

        let pattern = match call.method.as_str() {
            "contains" => format!("%{}%", text),
            "starts_with" => format!("{}%", text),
            "ends_with" => format!("%{}", text),
            other => {
                return Err(DbBindError::invalid_expression(
                    format!("Method '{}' cannot be translated into a filter", other),
                    expr.to_string(),
                ));
            }
        };
        let operation = if negated {
            Operation::NotLike
        } else {
            Operation::Like
        };
        Ok(QueryField::new(self.field(scope, member)?, operation, pattern))
    }

    fn field(&self, scope: &Scope<'_>, member: &str) -> Result<Field> {
        let property = scope
            .properties
            .iter()
            .find(|p| p.member_name.eq_ignore_ascii_case(member))
            .ok_or_else(|| DbBindError::missing_member(scope.type_key.short_name(), member))?;

        Ok(match &property.declared_type {
            Some(declared) => Field::with_type(property.mapped_name.clone(), declared.clone()),
            None => Field::new(property.mapped_name.clone()),
        })
    }
}

fn comparison_operation(op: BinaryOp) -> Option<Operation> {
    match op {
        BinaryOp::Equal => Some(Operation::Equal),
        BinaryOp::NotEqual => Some(Operation::NotEqual),
        BinaryOp::LessThan => Some(Operation::LessThan),
        BinaryOp::LessThanOrEqual => Some(Operation::LessThanOrEqual),
        BinaryOp::GreaterThan => Some(Operation::GreaterThan),
        BinaryOp::GreaterThanOrEqual => Some(Operation::GreaterThanOrEqual),
        _ => None,
    }
}
