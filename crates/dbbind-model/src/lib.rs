//! dbbind metadata model
//!
//! This crate describes what the binder binds against:
//! - [`DbField`]: schema-derived column descriptors and the [`SchemaProvider`] contract
//! - [`Entity`]: the static member declaration of a typed entity
//! - [`ClassProperty`]: a member resolved to its mapped column, handler and attributes
//! - [`PropertyHandler`]: pluggable per-property value transforms
//! - [`MetadataCache`]: memoized, process-wide property descriptors
//!
//! Mapping registrations are collected in a [`MappingRegistry`] during bootstrap
//! and frozen into the cache when it is constructed.

pub mod cache;
pub mod db_field;
pub mod entity;
pub mod handler;
pub mod mapping;
pub mod property;
pub mod schema;

pub use cache::MetadataCache;
pub use db_field::DbField;
pub use entity::{Entity, EntityValues, MemberInfo, TypeKey};
pub use handler::{PropertyHandler, PropertyHandlerGetOptions, PropertyHandlerSetOptions};
pub use mapping::MappingRegistry;
pub use property::{ClassProperty, PropertyAttributes};
pub use schema::{DbFieldCache, InMemorySchema, SchemaProvider};
