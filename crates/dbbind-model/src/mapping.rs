//! Bootstrap-time mapping registrations
//!
//! Registrations are collected into a [`MappingRegistry`] before any binding
//! happens and frozen into a [`MetadataCache`](crate::MetadataCache). After
//! that point nothing mutates them.

use dbbind_types::ValueType;
use std::collections::HashMap;
use std::sync::Arc;

use crate::{PropertyHandler, TypeKey};

/// Global field mappings, property handlers and key declarations
#[derive(Debug, Default, Clone)]
pub struct MappingRegistry {
    field_mappings: HashMap<(TypeKey, String), String>,
    member_handlers: HashMap<(TypeKey, String), Arc<dyn PropertyHandler>>,
    type_handlers: HashMap<ValueType, Arc<dyn PropertyHandler>>,
    primary: HashMap<TypeKey, String>,
    identity: HashMap<TypeKey, String>,
}

fn member_key(member: &str) -> String {
    member.to_ascii_lowercase()
}

impl MappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `member` of `T` to `column`
    pub fn with_field_mapping<T: 'static>(
        mut self,
        member: impl AsRef<str>,
        column: impl Into<String>,
    ) -> Self {
        self.field_mappings.insert(
            (TypeKey::of::<T>(), member_key(member.as_ref())),
            column.into(),
        );
        self
    }

    /// Register a handler for one member of `T`
    pub fn with_handler<T: 'static>(
        mut self,
        member: impl AsRef<str>,
        handler: Arc<dyn PropertyHandler>,
    ) -> Self {
        self.member_handlers
            .insert((TypeKey::of::<T>(), member_key(member.as_ref())), handler);
        self
    }

    /// Register a handler for every value of `value_type`
    pub fn with_type_handler(
        mut self,
        value_type: ValueType,
        handler: Arc<dyn PropertyHandler>,
    ) -> Self {
        self.type_handlers.insert(value_type, handler);
        self
    }

    /// Declare the primary-key member of `T`
    pub fn with_primary<T: 'static>(mut self, member: impl Into<String>) -> Self {
        self.primary.insert(TypeKey::of::<T>(), member.into());
        self
    }

    /// Declare the identity member of `T`
    pub fn with_identity<T: 'static>(mut self, member: impl Into<String>) -> Self {
        self.identity.insert(TypeKey::of::<T>(), member.into());
        self
    }

    pub fn field_mapping(&self, key: TypeKey, member: &str) -> Option<&str> {
        self.field_mappings
            .get(&(key, member_key(member)))
            .map(String::as_str)
    }

    pub fn member_handler(&self, key: TypeKey, member: &str) -> Option<&Arc<dyn PropertyHandler>> {
        self.member_handlers.get(&(key, member_key(member)))
    }

    pub fn type_handler(&self, value_type: &ValueType) -> Option<&Arc<dyn PropertyHandler>> {
        self.type_handlers.get(value_type)
    }

    pub fn primary(&self, key: TypeKey) -> Option<&str> {
        self.primary.get(&key).map(String::as_str)
    }

    pub fn identity(&self, key: TypeKey) -> Option<&str> {
        self.identity.get(&key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.field_mappings.is_empty()
            && self.member_handlers.is_empty()
            && self.type_handlers.is_empty()
            && self.primary.is_empty()
            && self.identity.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Customer;

    #[test]
    fn test_field_mapping_lookup_is_case_insensitive() {
        let registry = MappingRegistry::new().with_field_mapping::<Customer>("FirstName", "first_name");
        let key = TypeKey::of::<Customer>();
        assert_eq!(registry.field_mapping(key, "firstname"), Some("first_name"));
        assert_eq!(registry.field_mapping(key, "LastName"), None);
        assert!(!registry.is_empty());
    }
}
