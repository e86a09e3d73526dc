//! dbbind filter model
//!
//! Predicates are represented as an immutable tree of [`QueryField`] leaves
//! joined by [`QueryGroup`]s, independent of SQL syntax. Trees come from
//! callers directly, from [`translate_predicate`] or from [`parse_dynamic`].

mod dynamic;
mod field;
mod operation;
mod query_field;
mod query_group;
mod translator;

pub use dynamic::{parse_dynamic, parse_map};
pub use field::Field;
pub use operation::{Conjunction, Operation};
pub use query_field::QueryField;
pub use query_group::{QueryGroup, QueryNode};
pub use translator::{PredicateTranslator, translate_predicate};

/// Prefix carried by parameter names generated for the WHERE part of an update
pub const FOR_UPDATE_PREFIX: &str = "_";
