//! Typed predicate builder

use dbbind_types::DbValue;
use std::fmt;
use std::marker::PhantomData;

use crate::{BinaryOp, Expression};

/// A boolean predicate over entities of type `T`
pub struct Predicate<T> {
    expression: Expression,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Predicate<T> {
    /// Wrap an arbitrary expression
    pub fn new(expression: Expression) -> Self {
        Self {
            expression,
            _entity: PhantomData,
        }
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn into_expression(self) -> Expression {
        self.expression
    }

    pub fn and(self, other: Predicate<T>) -> Self {
        Self::new(Expression::binary(
            self.expression,
            BinaryOp::AndAlso,
            other.expression,
        ))
    }

    pub fn or(self, other: Predicate<T>) -> Self {
        Self::new(Expression::binary(
            self.expression,
            BinaryOp::OrElse,
            other.expression,
        ))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::new(Expression::not(self.expression))
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self::new(self.expression.clone())
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.expression).finish()
    }
}

impl<T> fmt::Display for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x => {}", self.expression)
    }
}

/// Member access on entities of type `T`, the starting point of a predicate
pub struct Member<T> {
    name: String,
    _entity: PhantomData<fn() -> T>,
}

/// Start a predicate on `name`
pub fn member<T>(name: impl Into<String>) -> Member<T> {
    Member {
        name: name.into(),
        _entity: PhantomData,
    }
}

impl<T> Member<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expression(&self) -> Expression {
        Expression::member(self.name.clone())
    }

    fn compare(self, op: BinaryOp, value: impl Into<DbValue>) -> Predicate<T> {
        Predicate::new(Expression::binary(
            self.expression(),
            op,
            Expression::constant(value),
        ))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn eq(self, value: impl Into<DbValue>) -> Predicate<T> {
        self.compare(BinaryOp::Equal, value)
    }

    pub fn ne(self, value: impl Into<DbValue>) -> Predicate<T> {
        self.compare(BinaryOp::NotEqual, value)
    }

    pub fn lt(self, value: impl Into<DbValue>) -> Predicate<T> {
        self.compare(BinaryOp::LessThan, value)
    }

    pub fn le(self, value: impl Into<DbValue>) -> Predicate<T> {
        self.compare(BinaryOp::LessThanOrEqual, value)
    }

    pub fn gt(self, value: impl Into<DbValue>) -> Predicate<T> {
        self.compare(BinaryOp::GreaterThan, value)
    }

    pub fn ge(self, value: impl Into<DbValue>) -> Predicate<T> {
        self.compare(BinaryOp::GreaterThanOrEqual, value)
    }

    /// `x.Member == null`
    pub fn is_null(self) -> Predicate<T> {
        self.compare(BinaryOp::Equal, DbValue::Null)
    }

    /// `x.Member != null`
    pub fn is_not_null(self) -> Predicate<T> {
        self.compare(BinaryOp::NotEqual, DbValue::Null)
    }

    /// `x.Member.contains(text)`
    pub fn contains(self, text: impl Into<String>) -> Predicate<T> {
        self.call("contains", text.into())
    }

    /// `x.Member.starts_with(text)`
    pub fn starts_with(self, text: impl Into<String>) -> Predicate<T> {
        self.call("starts_with", text.into())
    }

    /// `x.Member.ends_with(text)`
    pub fn ends_with(self, text: impl Into<String>) -> Predicate<T> {
        self.call("ends_with", text.into())
    }

    /// `values.contains(x.Member)`
    pub fn is_in<V: Into<DbValue>>(self, values: impl IntoIterator<Item = V>) -> Predicate<T> {
        let list = Expression::constant(DbValue::list(values));
        Predicate::new(Expression::call(list, "contains", vec![self.expression()]))
    }

    /// A boolean member used as the predicate itself (`x => x.IsActive`)
    pub fn is_true(self) -> Predicate<T> {
        Predicate::new(self.expression())
    }

    fn call(self, method: &str, text: String) -> Predicate<T> {
        Predicate::new(Expression::call(
            self.expression(),
            method,
            vec![Expression::constant(text)],
        ))
    }
}
