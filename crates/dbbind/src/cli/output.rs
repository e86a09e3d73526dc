//! Output formatting utilities

use anyhow::{Context, Result};
use colored::Colorize;
use dbbind_types::DbParameter;
use serde_json::Value;
use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    JsonPretty,
    Table,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "table" => Self::Table,
            _ => Self::JsonPretty,
        }
    }
}

/// Set up color output based on user preference
pub fn setup_colors(mode: &str) {
    match mode.to_lowercase().as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::set_override(io::stdout().is_terminal()),
    }
}

/// Format an error for display
pub fn format_error(error: &anyhow::Error) -> String {
    let mut message = format!("{} {}", "Error:".red().bold(), error);
    if let Some(help) = error
        .downcast_ref::<dbbind_diagnostics::DbBindError>()
        .and_then(|e| e.help())
    {
        message.push_str(&format!("\n  {} {}", "help:".cyan(), help));
    }
    message
}

/// Format a success message for display
pub fn format_success(message: &str) -> String {
    format!("{} {}", "Success:".green().bold(), message)
}

/// Write output to a file or stdout
pub fn write_output(content: &str, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write to output file: {}", path.display()))?;
        eprintln!(
            "{}",
            format_success(&format!("Output written to {}", path.display()))
        );
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Format JSON value for output
pub fn format_json(value: &Value, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(value).context("Failed to serialize JSON")
    } else {
        serde_json::to_string(value).context("Failed to serialize JSON")
    }
}

#[derive(Tabled)]
struct ParameterRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "DbType")]
    db_type: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Direction")]
    direction: String,
}

impl From<&DbParameter> for ParameterRow {
    fn from(parameter: &DbParameter) -> Self {
        Self {
            name: parameter.name.clone(),
            value: parameter.value.to_string(),
            db_type: parameter
                .db_type
                .map_or_else(|| "(provider default)".to_string(), |t| t.to_string()),
            size: parameter.size.map_or_else(String::new, |s| s.to_string()),
            direction: parameter.direction.to_string(),
        }
    }
}

/// Format bound parameters as a table
pub fn format_parameters_table(parameters: &[DbParameter]) -> String {
    if parameters.is_empty() {
        return "(no parameters)".to_string();
    }
    Table::new(parameters.iter().map(ParameterRow::from))
        .with(Style::modern())
        .to_string()
}
