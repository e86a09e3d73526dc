//! Bind sources and per-call overrides

use dbbind_filter::{QueryField, QueryGroup};
use dbbind_model::{Entity, EntityValues, MemberInfo, TypeKey};
use dbbind_types::{DbType, DbValue};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// What a bind call walks
#[derive(Clone, Copy)]
pub enum BindSource<'s> {
    /// A typed entity; see [`BindSource::entity`]
    Entity {
        key: TypeKey,
        members: fn() -> Vec<MemberInfo>,
        values: &'s dyn EntityValues,
    },
    /// A flat string-keyed map
    Dictionary(&'s IndexMap<String, DbValue>),
    /// A dynamic value; must be a flat map
    Value(&'s DbValue),
    /// A JSON value; must be a flat object
    Json(&'s serde_json::Value),
    Field(&'s QueryField),
    Group(&'s QueryGroup),
    /// Sibling fields joined by AND; repeated columns are renamed
    Fields(&'s [QueryField]),
}

impl<'s> BindSource<'s> {
    pub fn entity<T: Entity>(entity: &'s T) -> Self {
        Self::Entity {
            key: TypeKey::of::<T>(),
            members: T::members,
            values: entity,
        }
    }

    /// Short description for logs and errors
    pub fn describe(&self) -> String {
        match self {
            Self::Entity { key, .. } => key.short_name().to_string(),
            Self::Dictionary(_) => "dictionary".to_string(),
            Self::Value(value) => value.shape_name(),
            Self::Json(_) => "json".to_string(),
            Self::Field(field) => field.to_string(),
            Self::Group(_) => "query group".to_string(),
            Self::Fields(_) => "query fields".to_string(),
        }
    }
}

impl<'s> From<&'s QueryField> for BindSource<'s> {
    fn from(field: &'s QueryField) -> Self {
        Self::Field(field)
    }
}

impl<'s> From<&'s QueryGroup> for BindSource<'s> {
    fn from(group: &'s QueryGroup) -> Self {
        Self::Group(group)
    }
}

impl<'s> From<&'s IndexMap<String, DbValue>> for BindSource<'s> {
    fn from(map: &'s IndexMap<String, DbValue>) -> Self {
        Self::Dictionary(map)
    }
}

/// Per-call overrides: properties to skip and explicit native types and sizes.
///
/// Keys match member names, mapped column names or parameter names,
/// case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct BindScope {
    skip: HashSet<String>,
    db_types: HashMap<String, DbType>,
    sizes: HashMap<String, usize>,
}

impl BindScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip(mut self, name: impl AsRef<str>) -> Self {
        self.skip.insert(name.as_ref().to_ascii_lowercase());
        self
    }

    pub fn skip_all<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.skip
            .extend(names.into_iter().map(|n| n.as_ref().to_ascii_lowercase()));
        self
    }

    pub fn with_db_type(mut self, name: impl AsRef<str>, db_type: DbType) -> Self {
        self.db_types
            .insert(name.as_ref().to_ascii_lowercase(), db_type);
        self
    }

    pub fn with_size(mut self, name: impl AsRef<str>, size: usize) -> Self {
        self.sizes.insert(name.as_ref().to_ascii_lowercase(), size);
        self
    }

    pub fn is_skipped(&self, names: &[&str]) -> bool {
        names
            .iter()
            .any(|n| self.skip.contains(&n.to_ascii_lowercase()))
    }

    pub fn db_type(&self, names: &[&str]) -> Option<DbType> {
        names
            .iter()
            .find_map(|n| self.db_types.get(&n.to_ascii_lowercase()).copied())
    }

    pub fn size(&self, names: &[&str]) -> Option<usize> {
        names
            .iter()
            .find_map(|n| self.sizes.get(&n.to_ascii_lowercase()).copied())
    }
}
