//! Bind command implementation

use super::{output, source};
use anyhow::{Context, Result};
use dbbind_binder::{
    BindOptions, BindScope, BindSource, BindSummary, CommandParameters, ParameterBinder,
    PreparedCommand, TypeResolverRegistry,
};
use dbbind_model::MetadataCache;
use serde_json::{Value, json};
use std::path::PathBuf;

/// Configuration for bind command
pub struct BindConfig {
    pub schema: PathBuf,
    pub table: Option<String>,
    pub source: PathBuf,
    /// Treat the source as a filter description instead of a flat object
    pub filter: bool,
    pub automatic: bool,
    pub options: Option<PathBuf>,
    pub skip: Vec<String>,
    pub verbose: bool,
    pub output_format: Option<String>,
    pub output_file: Option<PathBuf>,
}

/// Everything one bind run produced
#[derive(Debug)]
pub struct BindOutcome {
    pub command: CommandParameters,
    pub summary: BindSummary,
}

impl BindOutcome {
    pub fn to_json(&self) -> Result<Value> {
        Ok(json!({
            "parameters": serde_json::to_value(self.command.parameters())
                .context("Failed to serialize parameters")?,
            "summary": serde_json::to_value(&self.summary)
                .context("Failed to serialize summary")?,
        }))
    }
}

/// Bind command options from an options file and the command-line flags
pub fn load_options(config: &BindConfig) -> Result<BindOptions> {
    let options = match &config.options {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read options file: {}", path.display()))?;
            BindOptions::from_json(&json)?
        }
        None => BindOptions::default(),
    };
    Ok(if config.automatic {
        BindOptions {
            conversion_type: dbbind_binder::ConversionType::Automatic,
            ..options
        }
    } else {
        options
    })
}

/// Load the schema and source and bind them
pub fn run(config: &BindConfig) -> Result<BindOutcome> {
    let schema = source::load_schema(&config.schema, config.table.as_deref())?;
    let value = source::load_json(&config.source)?;
    let options = load_options(config)?;

    if config.verbose {
        eprintln!(
            "Loaded {} column(s) from {}",
            schema.len(),
            config.schema.display()
        );
        eprintln!("Options: {:?}", options);
    }

    let scope = BindScope::new().skip_all(&config.skip);
    let binder = ParameterBinder::new(
        &options,
        TypeResolverRegistry::global(),
        MetadataCache::global(),
    );
    let mut command = CommandParameters::new();

    let summary = if config.filter {
        let group = source::parse_filter(value)?;
        if config.verbose {
            eprintln!("Filter: {}", group);
        }
        binder.bind_parameters(&mut command, BindSource::Group(&group), &schema, &scope)?
    } else {
        binder.bind_parameters(&mut command, BindSource::Json(&value), &schema, &scope)?
    };

    Ok(BindOutcome { command, summary })
}

/// Bind a source file against a schema file and print the parameters
pub fn bind(config: BindConfig) -> Result<()> {
    let outcome = run(&config)?;

    let format =
        output::OutputFormat::parse(config.output_format.as_deref().unwrap_or("pretty"));
    let content = match format {
        output::OutputFormat::Table => {
            output::format_parameters_table(outcome.command.parameters())
        }
        output::OutputFormat::Json => output::format_json(&outcome.to_json()?, false)?,
        output::OutputFormat::JsonPretty => output::format_json(&outcome.to_json()?, true)?,
    };
    output::write_output(&content, config.output_file.as_deref())?;

    if config.verbose {
        eprintln!(
            "{}",
            output::format_success(&format!(
                "Bound {} parameter(s)",
                outcome.command.len()
            ))
        );
    }

    Ok(())
}
