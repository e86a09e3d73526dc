//! Type resolver registry
//!
//! Maps language value types to native database types and back, and native
//! type names reported by each provider's catalog to value types. Built once
//! during bootstrap through [`TypeResolverRegistryBuilder`] and read-only
//! afterwards.

use dbbind_diagnostics::{DbBindError, Result};
use dbbind_types::{DbType, ValueType};
use once_cell::sync::OnceCell;
use std::collections::HashMap;

static GLOBAL: OnceCell<TypeResolverRegistry> = OnceCell::new();

/// Provider ids as reported in [`DbField::provider`](dbbind_model::DbField)
pub mod providers {
    pub const SQL_SERVER: &str = "MSSQL";
    pub const POSTGRESQL: &str = dbbind_model::db_field::POSTGRESQL_PROVIDER;
    pub const MYSQL: &str = "MYSQL";
    pub const SQLITE: &str = "SQLITE";
}

type TypeNameTable = &'static [(&'static str, ValueType, DbType)];

const SQL_SERVER_TYPES: TypeNameTable = &[
    ("bigint", ValueType::Int64, DbType::Int64),
    ("int", ValueType::Int32, DbType::Int32),
    ("smallint", ValueType::Int16, DbType::Int16),
    ("tinyint", ValueType::Byte, DbType::Byte),
    ("bit", ValueType::Boolean, DbType::Boolean),
    ("decimal", ValueType::Decimal, DbType::Decimal),
    ("numeric", ValueType::Decimal, DbType::Decimal),
    ("money", ValueType::Decimal, DbType::Currency),
    ("smallmoney", ValueType::Decimal, DbType::Currency),
    ("float", ValueType::Double, DbType::Double),
    ("real", ValueType::Single, DbType::Single),
    ("date", ValueType::Date, DbType::Date),
    ("datetime", ValueType::DateTime, DbType::DateTime),
    ("datetime2", ValueType::DateTime, DbType::DateTime2),
    ("smalldatetime", ValueType::DateTime, DbType::DateTime),
    ("datetimeoffset", ValueType::DateTimeOffset, DbType::DateTimeOffset),
    ("time", ValueType::Time, DbType::Time),
    ("char", ValueType::String, DbType::AnsiStringFixedLength),
    ("varchar", ValueType::String, DbType::AnsiString),
    ("text", ValueType::String, DbType::AnsiString),
    ("nchar", ValueType::String, DbType::StringFixedLength),
    ("nvarchar", ValueType::String, DbType::String),
    ("ntext", ValueType::String, DbType::String),
    ("xml", ValueType::String, DbType::Xml),
    ("uniqueidentifier", ValueType::Guid, DbType::Guid),
    ("binary", ValueType::Binary, DbType::Binary),
    ("varbinary", ValueType::Binary, DbType::Binary),
    ("image", ValueType::Binary, DbType::Binary),
    ("rowversion", ValueType::Binary, DbType::Binary),
    ("timestamp", ValueType::Binary, DbType::Binary),
];

const POSTGRESQL_TYPES: TypeNameTable = &[
    ("bigint", ValueType::Int64, DbType::Int64),
    ("int8", ValueType::Int64, DbType::Int64),
    ("integer", ValueType::Int32, DbType::Int32),
    ("int", ValueType::Int32, DbType::Int32),
    ("int4", ValueType::Int32, DbType::Int32),
    ("smallint", ValueType::Int16, DbType::Int16),
    ("int2", ValueType::Int16, DbType::Int16),
    ("boolean", ValueType::Boolean, DbType::Boolean),
    ("bool", ValueType::Boolean, DbType::Boolean),
    ("numeric", ValueType::Decimal, DbType::Decimal),
    ("decimal", ValueType::Decimal, DbType::Decimal),
    ("money", ValueType::Decimal, DbType::Currency),
    ("double precision", ValueType::Double, DbType::Double),
    ("float8", ValueType::Double, DbType::Double),
    ("real", ValueType::Single, DbType::Single),
    ("float4", ValueType::Single, DbType::Single),
    ("date", ValueType::Date, DbType::Date),
    ("timestamp", ValueType::DateTime, DbType::DateTime),
    ("timestamp without time zone", ValueType::DateTime, DbType::DateTime),
    ("timestamp with time zone", ValueType::DateTimeOffset, DbType::DateTimeOffset),
    ("timestamptz", ValueType::DateTimeOffset, DbType::DateTimeOffset),
    ("time", ValueType::Time, DbType::Time),
    ("time without time zone", ValueType::Time, DbType::Time),
    ("character varying", ValueType::String, DbType::String),
    ("varchar", ValueType::String, DbType::String),
    ("character", ValueType::String, DbType::StringFixedLength),
    ("char", ValueType::String, DbType::StringFixedLength),
    ("bpchar", ValueType::String, DbType::StringFixedLength),
    ("text", ValueType::String, DbType::String),
    ("json", ValueType::String, DbType::String),
    ("jsonb", ValueType::String, DbType::String),
    ("xml", ValueType::String, DbType::Xml),
    ("uuid", ValueType::Guid, DbType::Guid),
    ("bytea", ValueType::Binary, DbType::Binary),
];

const MYSQL_TYPES: TypeNameTable = &[
    ("bigint", ValueType::Int64, DbType::Int64),
    ("int", ValueType::Int32, DbType::Int32),
    ("integer", ValueType::Int32, DbType::Int32),
    ("mediumint", ValueType::Int32, DbType::Int32),
    ("smallint", ValueType::Int16, DbType::Int16),
    ("tinyint", ValueType::Byte, DbType::Byte),
    ("bit", ValueType::Boolean, DbType::Boolean),
    ("bool", ValueType::Boolean, DbType::Boolean),
    ("boolean", ValueType::Boolean, DbType::Boolean),
    ("decimal", ValueType::Decimal, DbType::Decimal),
    ("numeric", ValueType::Decimal, DbType::Decimal),
    ("double", ValueType::Double, DbType::Double),
    ("float", ValueType::Single, DbType::Single),
    ("date", ValueType::Date, DbType::Date),
    ("datetime", ValueType::DateTime, DbType::DateTime),
    ("timestamp", ValueType::DateTime, DbType::DateTime),
    ("time", ValueType::Time, DbType::Time),
    ("char", ValueType::String, DbType::StringFixedLength),
    ("varchar", ValueType::String, DbType::String),
    ("tinytext", ValueType::String, DbType::String),
    ("text", ValueType::String, DbType::String),
    ("mediumtext", ValueType::String, DbType::String),
    ("longtext", ValueType::String, DbType::String),
    ("enum", ValueType::String, DbType::String),
    ("set", ValueType::String, DbType::String),
    ("json", ValueType::String, DbType::String),
    ("binary", ValueType::Binary, DbType::Binary),
    ("varbinary", ValueType::Binary, DbType::Binary),
    ("blob", ValueType::Binary, DbType::Binary),
    ("longblob", ValueType::Binary, DbType::Binary),
];

const SQLITE_TYPES: TypeNameTable = &[
    ("integer", ValueType::Int64, DbType::Int64),
    ("int", ValueType::Int64, DbType::Int64),
    ("bigint", ValueType::Int64, DbType::Int64),
    ("real", ValueType::Double, DbType::Double),
    ("double", ValueType::Double, DbType::Double),
    ("numeric", ValueType::Decimal, DbType::Decimal),
    ("decimal", ValueType::Decimal, DbType::Decimal),
    ("boolean", ValueType::Boolean, DbType::Boolean),
    ("date", ValueType::Date, DbType::Date),
    ("datetime", ValueType::DateTime, DbType::DateTime),
    ("text", ValueType::String, DbType::String),
    ("varchar", ValueType::String, DbType::String),
    ("blob", ValueType::Binary, DbType::Binary),
];

fn builtin_table(provider: &str) -> TypeNameTable {
    if provider.eq_ignore_ascii_case(providers::SQL_SERVER) {
        SQL_SERVER_TYPES
    } else if provider.eq_ignore_ascii_case(providers::POSTGRESQL) {
        POSTGRESQL_TYPES
    } else if provider.eq_ignore_ascii_case(providers::MYSQL) {
        MYSQL_TYPES
    } else if provider.eq_ignore_ascii_case(providers::SQLITE) {
        SQLITE_TYPES
    } else {
        &[]
    }
}

fn builtin_enum_fallback(provider: &str) -> Option<DbType> {
    if provider.eq_ignore_ascii_case(providers::MYSQL) {
        Some(DbType::String)
    } else if provider.eq_ignore_ascii_case(providers::SQLITE) {
        Some(DbType::Int64)
    } else {
        None
    }
}

/// Native type name without length/precision arguments, lowercased
fn normalize_type_name(name: &str) -> String {
    let base = name.split('(').next().unwrap_or(name);
    base.trim().to_ascii_lowercase()
}

fn builtin_db_type(value_type: &ValueType) -> Option<DbType> {
    let db_type = match value_type {
        ValueType::Boolean => DbType::Boolean,
        ValueType::Byte => DbType::Byte,
        ValueType::Int16 => DbType::Int16,
        ValueType::Int32 => DbType::Int32,
        ValueType::Int64 => DbType::Int64,
        ValueType::Single => DbType::Single,
        ValueType::Double => DbType::Double,
        ValueType::Decimal => DbType::Decimal,
        ValueType::String => DbType::String,
        ValueType::Guid => DbType::Guid,
        ValueType::Date => DbType::Date,
        ValueType::DateTime => DbType::DateTime,
        ValueType::DateTimeOffset => DbType::DateTimeOffset,
        ValueType::Time => DbType::Time,
        ValueType::Binary => DbType::Binary,
        ValueType::Enum(_) => return None,
    };
    Some(db_type)
}

fn builtin_value_type(db_type: DbType) -> Option<ValueType> {
    let value_type = match db_type {
        DbType::AnsiString
        | DbType::AnsiStringFixedLength
        | DbType::String
        | DbType::StringFixedLength
        | DbType::Xml => ValueType::String,
        DbType::Binary => ValueType::Binary,
        DbType::Boolean => ValueType::Boolean,
        DbType::Byte => ValueType::Byte,
        DbType::Currency | DbType::Decimal => ValueType::Decimal,
        DbType::Date => ValueType::Date,
        DbType::DateTime | DbType::DateTime2 => ValueType::DateTime,
        DbType::DateTimeOffset => ValueType::DateTimeOffset,
        DbType::Double => ValueType::Double,
        DbType::Guid => ValueType::Guid,
        DbType::Int16 => ValueType::Int16,
        DbType::Int32 => ValueType::Int32,
        DbType::Int64 => ValueType::Int64,
        DbType::Single => ValueType::Single,
        DbType::Time => ValueType::Time,
        DbType::Object => return None,
    };
    Some(value_type)
}

/// Bidirectional value type / native type mapping
#[derive(Debug, Clone, Default)]
pub struct TypeResolverRegistry {
    db_types: HashMap<ValueType, DbType>,
    value_types: HashMap<DbType, ValueType>,
    type_names: HashMap<(String, String), (ValueType, DbType)>,
    enum_fallbacks: HashMap<String, DbType>,
}

impl TypeResolverRegistry {
    /// Registry with only the built-in mappings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> TypeResolverRegistryBuilder {
        TypeResolverRegistryBuilder::default()
    }

    /// Install the process-wide registry. Fails if one is already installed.
    pub fn install_global(registry: TypeResolverRegistry) -> Result<&'static TypeResolverRegistry> {
        GLOBAL
            .try_insert(registry)
            .map_err(|_| DbBindError::already_installed("type resolver registry"))
    }

    /// The process-wide registry; built-ins only if none was installed
    pub fn global() -> &'static TypeResolverRegistry {
        GLOBAL.get_or_init(TypeResolverRegistry::new)
    }

    /// Native type for a value type
    pub fn resolve(&self, value_type: &ValueType) -> Option<DbType> {
        self.db_types
            .get(value_type)
            .copied()
            .or_else(|| builtin_db_type(value_type))
    }

    /// Value type for a native type
    pub fn resolve_db_type(&self, db_type: DbType) -> Option<ValueType> {
        self.value_types
            .get(&db_type)
            .cloned()
            .or_else(|| builtin_value_type(db_type))
    }

    /// Value type for a catalog type name (e.g. `nvarchar(50)` on MSSQL)
    pub fn resolve_type_name(&self, provider: &str, name: &str) -> Option<ValueType> {
        self.lookup_type_name(provider, name).map(|(vt, _)| vt)
    }

    /// Native type for a catalog type name
    pub fn resolve_type_name_db_type(&self, provider: &str, name: &str) -> Option<DbType> {
        self.lookup_type_name(provider, name).map(|(_, db)| db)
    }

    /// Native type for enum values on `provider` when nothing else resolves one
    pub fn enum_fallback(&self, provider: &str) -> Option<DbType> {
        self.enum_fallbacks
            .get(&provider.to_ascii_uppercase())
            .copied()
            .or_else(|| builtin_enum_fallback(provider))
    }

    fn lookup_type_name(&self, provider: &str, name: &str) -> Option<(ValueType, DbType)> {
        let name = normalize_type_name(name);
        if let Some(custom) = self
            .type_names
            .get(&(provider.to_ascii_uppercase(), name.clone()))
        {
            return Some(custom.clone());
        }
        builtin_table(provider)
            .iter()
            .find(|(n, _, _)| *n == name)
            .map(|(_, vt, db)| (vt.clone(), *db))
    }
}

/// Single-writer builder for [`TypeResolverRegistry`]
#[derive(Debug, Default)]
pub struct TypeResolverRegistryBuilder {
    registry: TypeResolverRegistry,
}

impl TypeResolverRegistryBuilder {
    /// Map `value_type` to `db_type`, overriding the built-in mapping
    pub fn map(mut self, value_type: ValueType, db_type: DbType) -> Self {
        self.registry.db_types.insert(value_type, db_type);
        self
    }

    /// Map `db_type` back to `value_type`
    pub fn map_db_type(mut self, db_type: DbType, value_type: ValueType) -> Self {
        self.registry.value_types.insert(db_type, value_type);
        self
    }

    /// Register a catalog type name for `provider`
    pub fn type_name(
        mut self,
        provider: &str,
        name: &str,
        value_type: ValueType,
        db_type: DbType,
    ) -> Self {
        self.registry.type_names.insert(
            (provider.to_ascii_uppercase(), normalize_type_name(name)),
            (value_type, db_type),
        );
        self
    }

    pub fn enum_fallback(mut self, provider: &str, db_type: DbType) -> Self {
        self.registry
            .enum_fallbacks
            .insert(provider.to_ascii_uppercase(), db_type);
        self
    }

    pub fn build(self) -> TypeResolverRegistry {
        self.registry
    }
}
