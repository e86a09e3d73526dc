//! Predicate expression tree
//!
//! A small sum-typed AST for boolean predicates over entity members, plus the
//! typed [`Predicate`] builder used to construct them:
//!
//! ```ignore
//! let adults = member::<Person>("Age").gt(30).and(member::<Person>("Name").eq("Bob"));
//! ```

mod expression;
mod operator;
mod predicate;

pub use expression::*;
pub use operator::*;
pub use predicate::*;

/// Type alias for boxed expressions
pub type BoxExpr = Box<Expression>;
