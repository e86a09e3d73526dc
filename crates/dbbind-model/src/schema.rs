//! Schema catalog contract and column caches

use dbbind_diagnostics::{DbBindError, Result};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::DbField;

/// Catalog abstraction returning a table's columns in ordinal order
pub trait SchemaProvider: Send + Sync {
    fn columns(&self, table: &str) -> Result<Vec<DbField>>;
}

/// Schema held in memory, keyed by table name (case-insensitive)
#[derive(Debug, Clone, Default)]
pub struct InMemorySchema {
    tables: IndexMap<String, Vec<DbField>>,
}

impl InMemorySchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: impl AsRef<str>, columns: Vec<DbField>) -> Self {
        self.tables
            .insert(table.as_ref().to_ascii_lowercase(), columns);
        self
    }

    /// Load from a JSON object mapping table names to column arrays
    pub fn from_json(json: &str) -> Result<Self> {
        let tables: IndexMap<String, Vec<DbField>> = serde_json::from_str(json)
            .map_err(|e| DbBindError::invalid_configuration(format!("Invalid schema JSON: {}", e)))?;
        Ok(tables
            .into_iter()
            .fold(Self::new(), |schema, (table, columns)| {
                schema.with_table(table, columns)
            }))
    }

    /// Load from a JSON file at runtime
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            DbBindError::invalid_configuration(format!(
                "Cannot read schema file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

impl SchemaProvider for InMemorySchema {
    fn columns(&self, table: &str) -> Result<Vec<DbField>> {
        Ok(self
            .tables
            .get(&table.to_ascii_lowercase())
            .cloned()
            .unwrap_or_default())
    }
}

/// Per-table column cache in front of a [`SchemaProvider`].
///
/// Columns are fetched once per table and shared afterwards.
pub struct DbFieldCache<P> {
    provider: P,
    tables: RwLock<HashMap<String, Arc<[DbField]>>>,
}

impl<P: SchemaProvider> DbFieldCache<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Columns of `table`, fetched from the provider on first access
    pub fn get(&self, table: &str) -> Result<Arc<[DbField]>> {
        let key = table.to_ascii_lowercase();
        if let Some(hit) = self.tables.read().get(&key) {
            return Ok(Arc::clone(hit));
        }

        let columns: Arc<[DbField]> = self.provider.columns(table)?.into();
        log::trace!("Cached {} columns for table {}", columns.len(), table);

        let mut guard = self.tables.write();
        Ok(Arc::clone(guard.entry(key).or_insert(columns)))
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbbind_types::ValueType;

    #[test]
    fn test_in_memory_schema_from_json() {
        let schema = InMemorySchema::from_json(
            r#"{"Person": [
                {"name": "Id", "databaseType": "int", "valueType": "Int32", "isIdentity": true},
                {"name": "Name", "databaseType": "nvarchar", "size": 100, "isNullable": true}
            ]}"#,
        )
        .unwrap();

        let columns = schema.columns("person").unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].value_type, Some(ValueType::Int32));
        assert_eq!(columns[1].size, Some(100));
        assert!(schema.columns("Missing").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_schema_json_is_configuration_error() {
        let err = InMemorySchema::from_json("[1, 2]").unwrap_err();
        assert_eq!(err.kind(), dbbind_diagnostics::ErrorKind::Configuration);
    }
}
