//! Schema-aware parameter binding for SQL commands
//!
//! This crate ties together:
//! - Filter trees (`QueryField` / `QueryGroup`) built by hand, from dynamic
//!   objects or translated from typed predicates
//! - A memoized metadata cache describing entity members
//! - A parameter binder that resolves native types, converts values against
//!   the target schema and expands In/Between operands
//!
//! # Example
//!
//! ```ignore
//! use dbbind::{member, translate_predicate, BindOptions, BindScope, BindSource};
//! use dbbind::{CommandParameters, MetadataCache, ParameterBinder, TypeResolverRegistry};
//!
//! let predicate = member::<Person>("Age").gt(30).and(member::<Person>("Name").eq("Bob"));
//! let group = translate_predicate(&predicate, MetadataCache::global())?;
//!
//! let options = BindOptions::default();
//! let binder = ParameterBinder::new(&options, TypeResolverRegistry::global(), MetadataCache::global());
//! let mut command = CommandParameters::new();
//! binder.bind_parameters(&mut command, BindSource::Group(&group), &schema, &BindScope::default())?;
//! ```

// Re-export all public APIs from internal crates
pub use dbbind_ast as ast;
pub use dbbind_binder as binder;
pub use dbbind_diagnostics as diagnostics;
pub use dbbind_filter as filter;
pub use dbbind_model as model;
pub use dbbind_types as types;

// Convenience re-exports
pub use dbbind_ast::{Predicate, member};
pub use dbbind_binder::{
    BindOptions, BindScope, BindSource, BindSummary, CommandParameters, ParameterBinder,
    PreparedCommand, TypeResolverRegistry, get_schema_field,
};
pub use dbbind_diagnostics::{DbBindError, Result};
pub use dbbind_filter::{
    Field, Operation, QueryField, QueryGroup, parse_dynamic, translate_predicate,
};
pub use dbbind_model::{DbField, Entity, MemberInfo, MetadataCache};
pub use dbbind_types::{DbParameter, DbType, DbValue, ValueType};

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
