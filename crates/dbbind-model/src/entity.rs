//! Entity contract and static member declarations

use dbbind_types::{DbType, DbValue, ParameterDirection, ValueType};
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::{PropertyAttributes, PropertyHandler};

/// Identity of an entity type, used as the metadata cache key
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key of `T`
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

/// Static declaration of one entity member and its attributes
#[derive(Debug, Clone, PartialEq)]
pub struct MemberInfo {
    /// Member identifier
    pub name: String,
    /// Declared value type (`None` for untyped members)
    pub declared_type: Option<ValueType>,
    pub attributes: PropertyAttributes,
}

impl MemberInfo {
    pub fn new(name: impl Into<String>, declared_type: ValueType) -> Self {
        Self {
            name: name.into(),
            declared_type: Some(declared_type),
            attributes: PropertyAttributes::default(),
        }
    }

    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            attributes: PropertyAttributes::default(),
        }
    }

    /// Map the member to a differently named column
    pub fn map(mut self, column: impl Into<String>) -> Self {
        self.attributes.map = Some(column.into());
        self
    }

    pub fn primary(mut self) -> Self {
        self.attributes.is_primary = true;
        self
    }

    pub fn identity(mut self) -> Self {
        self.attributes.is_identity = true;
        self
    }

    pub fn db_type(mut self, db_type: DbType) -> Self {
        self.attributes.db_type = Some(db_type);
        self
    }

    pub fn size(mut self, size: usize) -> Self {
        self.attributes.size = Some(size);
        self
    }

    pub fn precision(mut self, precision: u8, scale: u8) -> Self {
        self.attributes.precision = Some(precision);
        self.attributes.scale = Some(scale);
        self
    }

    pub fn direction(mut self, direction: ParameterDirection) -> Self {
        self.attributes.direction = Some(direction);
        self
    }

    pub fn parameter_name(mut self, name: impl Into<String>) -> Self {
        self.attributes.parameter_name = Some(name.into());
        self
    }

    pub fn handler(mut self, handler: Arc<dyn PropertyHandler>) -> Self {
        self.attributes.handler = Some(handler);
        self
    }
}

/// Type-erased access to an entity's member values
pub trait EntityValues: Send + Sync {
    /// Current value of `member`, or `None` if the member does not exist
    fn value(&self, member: &str) -> Option<DbValue>;
}

/// A typed entity.
///
/// `members` is the static declaration the metadata cache memoizes; it must
/// return the same list on every call.
///
/// ```ignore
/// struct Person { id: i64, name: String }
///
/// impl Entity for Person {
///     fn members() -> Vec<MemberInfo> {
///         vec![
///             MemberInfo::new("Id", ValueType::Int64).primary().identity(),
///             MemberInfo::new("Name", ValueType::String).map("FullName"),
///         ]
///     }
///
///     fn value(&self, member: &str) -> Option<DbValue> {
///         match member {
///             "Id" => Some(self.id.into()),
///             "Name" => Some(self.name.clone().into()),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Entity: Send + Sync + 'static {
    fn members() -> Vec<MemberInfo>;

    fn value(&self, member: &str) -> Option<DbValue>;
}

impl<T: Entity> EntityValues for T {
    fn value(&self, member: &str) -> Option<DbValue> {
        Entity::value(self, member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Invoice;

    #[test]
    fn test_type_key_short_name() {
        let key = TypeKey::of::<Invoice>();
        assert_eq!(key.short_name(), "Invoice");
        assert_eq!(key, TypeKey::of::<Invoice>());
        assert_ne!(key, TypeKey::of::<String>());
    }

    #[test]
    fn test_member_builder_sets_attributes() {
        let member = MemberInfo::new("Name", ValueType::String)
            .map("FullName")
            .size(100)
            .db_type(DbType::AnsiString);
        assert_eq!(member.attributes.map.as_deref(), Some("FullName"));
        assert_eq!(member.attributes.size, Some(100));
        assert_eq!(member.attributes.db_type, Some(DbType::AnsiString));
    }
}
