//! Schema column descriptors

use dbbind_types::ValueType;
use serde::{Deserialize, Serialize};

/// Provider id reported by PostgreSQL schema readers
pub const POSTGRESQL_PROVIDER: &str = "PGSQL";

/// Native type name PostgreSQL reports for enums and other user-defined types
pub const USER_DEFINED_TYPE_NAME: &str = "USER-DEFINED";

/// A column as reported by the database catalog
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DbField {
    /// Column name
    pub name: String,
    /// Native type name (e.g. "nvarchar", "int4", "USER-DEFINED")
    pub database_type: Option<String>,
    /// Language-side type the native type maps to, when known
    pub value_type: Option<ValueType>,
    pub size: Option<usize>,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
    pub is_primary: bool,
    pub is_identity: bool,
    pub is_nullable: bool,
    /// Provider id (e.g. "MSSQL", "PGSQL")
    pub provider: Option<String>,
}

impl DbField {
    /// Create a nullable column with no type information
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_nullable: true,
            ..Self::default()
        }
    }

    pub fn with_database_type(mut self, database_type: impl Into<String>) -> Self {
        self.database_type = Some(database_type.into());
        self
    }

    pub fn with_value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_precision(mut self, precision: u8, scale: u8) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self.is_nullable = false;
        self
    }

    pub fn identity(mut self) -> Self {
        self.is_identity = true;
        self.is_nullable = false;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.is_nullable = false;
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Case-insensitive name comparison
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// PostgreSQL user-defined column (enums, domains, composites).
    ///
    /// Parameters bound to these columns keep the provider default type.
    pub fn is_postgres_user_defined(&self) -> bool {
        self.provider.as_deref() == Some(POSTGRESQL_PROVIDER)
            && self
                .database_type
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(USER_DEFINED_TYPE_NAME))
    }
}
