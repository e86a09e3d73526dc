//! Loading schemas and bind sources from JSON files

use anyhow::{Context, Result, bail};
use dbbind_filter::{Conjunction, Field, Operation, QueryField, QueryGroup, QueryNode};
use dbbind_model::{DbField, DbFieldCache, InMemorySchema};
use dbbind_types::DbValue;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Columns of `table` from a schema file.
///
/// The file maps table names to column arrays. `table` may be omitted when
/// the file describes exactly one table.
pub fn load_schema(path: &Path, table: Option<&str>) -> Result<Vec<DbField>> {
    let schema = InMemorySchema::from_json_file(path)?;
    let table = match table {
        Some(table) => table.to_string(),
        None => {
            let names: Vec<&str> = schema.table_names().collect();
            match names.as_slice() {
                [only] => only.to_string(),
                [] => bail!("Schema file {} has no tables", path.display()),
                _ => bail!(
                    "Schema file {} has several tables ({}); pick one with --table",
                    path.display(),
                    names.join(", ")
                ),
            }
        }
    };

    if !schema.table_names().any(|name| name.eq_ignore_ascii_case(&table)) {
        bail!("Table '{}' not found in {}", table, path.display());
    }

    let cache = DbFieldCache::new(schema);
    let columns = cache.get(&table)?;
    Ok(columns.to_vec())
}

/// Parse a JSON file
pub fn load_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse source file: {}", path.display()))
}

/// A filter description:
///
/// ```json
/// {"conjunction": "Or", "children": [
///     {"field": "Age", "operation": "GreaterThan", "value": 30},
///     {"field": "Status", "operation": "In", "value": ["A", "B"]}
/// ]}
/// ```
///
/// A bare array is an AND group.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FilterNode {
    Group {
        #[serde(default)]
        conjunction: Conjunction,
        children: Vec<FilterNode>,
    },
    Field {
        field: String,
        #[serde(default = "default_operation")]
        operation: Operation,
        #[serde(default)]
        value: Value,
    },
    List(Vec<FilterNode>),
}

fn default_operation() -> Operation {
    Operation::Equal
}

impl FilterNode {
    fn into_node(self) -> QueryNode {
        match self {
            Self::Field {
                field,
                operation,
                value,
            } => QueryField::new(Field::new(field), operation, DbValue::from_json(&value)).into(),
            Self::Group {
                conjunction,
                children,
            } => QueryGroup::new(conjunction, children.into_iter().map(Self::into_node)).into(),
            Self::List(children) => {
                QueryGroup::and(children.into_iter().map(Self::into_node)).into()
            }
        }
    }
}

/// Build a filter tree from its JSON description
pub fn parse_filter(value: Value) -> Result<QueryGroup> {
    let node: FilterNode =
        serde_json::from_value(value).context("Source is not a filter description")?;
    Ok(match node.into_node() {
        QueryNode::Group(group) => group,
        field @ QueryNode::Field(_) => QueryGroup::and([field]),
    })
}
