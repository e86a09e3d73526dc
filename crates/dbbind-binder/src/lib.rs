//! dbbind parameter binder
//!
//! Walks entities, dictionaries and filter trees and materializes bound
//! parameters onto a [`PreparedCommand`]:
//!
//! - [`ParameterBinder`]: the binding algorithm (type resolution, automatic
//!   conversion, property handlers, In/Between expansion)
//! - [`TypeResolverRegistry`]: value type to native type mapping per provider
//! - [`BindOptions`]: explicit configuration passed into the binder
//!
//! # Example
//!
//! ```ignore
//! let options = BindOptions::default();
//! let binder = ParameterBinder::new(&options, TypeResolverRegistry::global(), MetadataCache::global());
//! let mut command = CommandParameters::new();
//! let field = QueryField::new("Age", Operation::GreaterThan, 30);
//! binder.bind_parameters(&mut command, BindSource::Field(&field), &[], &BindScope::default())?;
//! ```
//!
//! A failed bind leaves the command untouched: parameters are staged and
//! attached only once the whole source has been bound.

pub mod binder;
pub mod command;
pub mod config;
pub mod context;
pub mod resolver;

pub use binder::{BindSummary, FieldBinding, ParameterBinder, get_schema_field};
pub use command::{CommandArrayParameter, CommandParameters, PreparedCommand, expand_array_parameters};
pub use config::{BindOptions, BindOptionsBuilder, ConversionType};
pub use context::{BindScope, BindSource};
pub use resolver::{TypeResolverRegistry, TypeResolverRegistryBuilder, providers};
