//! Field command implementation

use super::{output, source};
use anyhow::{Context, Result, bail};
use dbbind_binder::get_schema_field;
use dbbind_model::DbField;
use std::path::PathBuf;

/// Configuration for field command
pub struct FieldConfig {
    /// Parameter or column name, e.g. `@Status_In_3`
    pub name: String,
    pub schema: PathBuf,
    pub table: Option<String>,
    pub output_file: Option<PathBuf>,
}

/// Column a parameter name resolves to
pub fn lookup(config: &FieldConfig) -> Result<DbField> {
    let schema = source::load_schema(&config.schema, config.table.as_deref())?;
    match get_schema_field(&config.name, &schema) {
        Some(field) => Ok(field.clone()),
        None => bail!("No column matches '{}'", config.name),
    }
}

/// Resolve a parameter name against a schema file and print the column
pub fn field(config: FieldConfig) -> Result<()> {
    let column = lookup(&config)?;
    let value = serde_json::to_value(&column).context("Failed to serialize column")?;
    let content = output::format_json(&value, true)?;
    output::write_output(&content, config.output_file.as_deref())
}
