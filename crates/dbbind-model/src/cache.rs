//! Metadata cache
//!
//! Memoizes the resolved [`ClassProperty`] list of every entity type. Entries
//! are created on first lookup and never evicted. Two threads racing on the
//! same key both compute the same list; the first stored result wins.

use dbbind_diagnostics::{DbBindError, Result};
use dbbind_types::ValueType;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::{ClassProperty, Entity, MappingRegistry, MemberInfo, PropertyHandler, TypeKey};

static GLOBAL: OnceCell<MetadataCache> = OnceCell::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum KeyRole {
    Primary,
    Identity,
}

/// Process-wide memoized property descriptors
#[derive(Debug, Default)]
pub struct MetadataCache {
    registry: MappingRegistry,
    properties: RwLock<HashMap<TypeKey, Arc<[ClassProperty]>>>,
    keys: RwLock<HashMap<(TypeKey, KeyRole), Option<ClassProperty>>>,
}

impl MetadataCache {
    /// Create a cache over frozen registrations
    pub fn new(registry: MappingRegistry) -> Self {
        Self {
            registry,
            properties: RwLock::new(HashMap::new()),
            keys: RwLock::new(HashMap::new()),
        }
    }

    /// Install the process-wide cache. Fails if one is already installed.
    pub fn install_global(cache: MetadataCache) -> Result<&'static MetadataCache> {
        GLOBAL
            .try_insert(cache)
            .map_err(|_| DbBindError::already_installed("metadata cache"))
    }

    /// The process-wide cache; an empty-registry cache if none was installed
    pub fn global() -> &'static MetadataCache {
        GLOBAL.get_or_init(|| MetadataCache::new(MappingRegistry::default()))
    }

    pub fn registry(&self) -> &MappingRegistry {
        &self.registry
    }

    /// Properties of `T`, in declaration order
    pub fn get<T: Entity>(&self) -> Arc<[ClassProperty]> {
        self.get_by_key(TypeKey::of::<T>(), T::members)
    }

    /// Properties for `key`, computing them from `members` on first access
    pub fn get_by_key<F>(&self, key: TypeKey, members: F) -> Arc<[ClassProperty]>
    where
        F: FnOnce() -> Vec<MemberInfo>,
    {
        if let Some(hit) = self.properties.read().get(&key) {
            return Arc::clone(hit);
        }

        let computed: Arc<[ClassProperty]> = self.resolve_members(key, members()).into();
        log::trace!(
            "Resolved {} properties for {}",
            computed.len(),
            key.short_name()
        );

        let mut guard = self.properties.write();
        Arc::clone(guard.entry(key).or_insert(computed))
    }

    /// One property of `T`, matched by member name first, then mapped name
    pub fn get_member<T: Entity>(&self, member: &str) -> Option<ClassProperty> {
        let properties = self.get::<T>();
        find_member(&properties, member).cloned()
    }

    /// Mapped column name of `member` on `T`
    pub fn mapped_name<T: Entity>(&self, member: &str) -> Option<String> {
        self.get_member::<T>(member).map(|p| p.mapped_name)
    }

    /// Primary-key property of `T`.
    ///
    /// Resolution: primary attribute, then the registered primary member,
    /// then a member named `Id`, then `<TypeName>Id`.
    pub fn primary<T: Entity>(&self) -> Option<ClassProperty> {
        self.key_property(TypeKey::of::<T>(), KeyRole::Primary, T::members)
    }

    /// Identity property of `T`: identity attribute, then the registered identity member
    pub fn identity<T: Entity>(&self) -> Option<ClassProperty> {
        self.key_property(TypeKey::of::<T>(), KeyRole::Identity, T::members)
    }

    /// Handler registered for every value of `value_type`
    pub fn type_handler(&self, value_type: &ValueType) -> Option<Arc<dyn PropertyHandler>> {
        self.registry.type_handler(value_type).cloned()
    }

    /// Synthesize descriptors for a dictionary or dynamic source.
    ///
    /// These are not cached; dictionary keys vary per call.
    pub fn dynamic_properties<I, S>(&self, members: I) -> Vec<ClassProperty>
    where
        I: IntoIterator<Item = (S, Option<ValueType>)>,
        S: Into<String>,
    {
        members
            .into_iter()
            .map(|(name, declared_type)| {
                let handler = declared_type
                    .as_ref()
                    .and_then(|vt| self.type_handler(vt));
                ClassProperty::dynamic(name, declared_type).with_handler(handler)
            })
            .collect()
    }

    /// Number of memoized entity types
    pub fn len(&self) -> usize {
        self.properties.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.read().is_empty()
    }

    fn key_property<F>(&self, key: TypeKey, role: KeyRole, members: F) -> Option<ClassProperty>
    where
        F: FnOnce() -> Vec<MemberInfo>,
    {
        if let Some(hit) = self.keys.read().get(&(key, role)) {
            return hit.clone();
        }

        let properties = self.get_by_key(key, members);
        let resolved = match role {
            KeyRole::Primary => properties
                .iter()
                .find(|p| p.is_primary())
                .or_else(|| {
                    self.registry
                        .primary(key)
                        .and_then(|name| find_member(&properties, name))
                })
                .or_else(|| find_member(&properties, "Id"))
                .or_else(|| find_member(&properties, &format!("{}Id", key.short_name()))),
            KeyRole::Identity => properties.iter().find(|p| p.is_identity()).or_else(|| {
                self.registry
                    .identity(key)
                    .and_then(|name| find_member(&properties, name))
            }),
        }
        .cloned();

        let mut guard = self.keys.write();
        guard.entry((key, role)).or_insert(resolved).clone()
    }

    fn resolve_members(&self, key: TypeKey, members: Vec<MemberInfo>) -> Vec<ClassProperty> {
        members
            .into_iter()
            .map(|member| {
                let mapped_name = member
                    .attributes
                    .map
                    .clone()
                    .or_else(|| {
                        self.registry
                            .field_mapping(key, &member.name)
                            .map(str::to_string)
                    })
                    .unwrap_or_else(|| member.name.clone());

                let handler = member
                    .attributes
                    .handler
                    .clone()
                    .or_else(|| self.registry.member_handler(key, &member.name).cloned())
                    .or_else(|| {
                        member
                            .declared_type
                            .as_ref()
                            .and_then(|vt| self.type_handler(vt))
                    });

                ClassProperty {
                    mapped_name,
                    member_name: member.name,
                    declaring_type: Some(key),
                    declared_type: member.declared_type,
                    handler,
                    attributes: member.attributes,
                }
            })
            .collect()
    }
}

fn find_member<'a>(properties: &'a [ClassProperty], name: &str) -> Option<&'a ClassProperty> {
    properties
        .iter()
        .find(|p| p.member_name.eq_ignore_ascii_case(name))
        .or_else(|| properties.iter().find(|p| p.mapped_name.eq_ignore_ascii_case(name)))
}
