//! Binder configuration

use dbbind_diagnostics::{DbBindError, Result};
use dbbind_types::DbType;
use serde::{Deserialize, Serialize};

/// When the binder coerces values to the schema column's type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConversionType {
    /// Only primary and identity columns are converted
    #[default]
    Default,
    /// Every column with a known type is converted
    Automatic,
}

/// Immutable binder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BindOptions {
    pub conversion_type: ConversionType,
    /// Native type for enum values when nothing else resolves one
    pub enum_default_db_type: DbType,
    /// Prefix prepended to every bound parameter name (e.g. "@")
    pub parameter_prefix: Option<String>,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            conversion_type: ConversionType::Default,
            enum_default_db_type: DbType::String,
            parameter_prefix: None,
        }
    }
}

impl BindOptions {
    pub fn builder() -> BindOptionsBuilder {
        BindOptionsBuilder::default()
    }

    /// Parse options from JSON; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| DbBindError::invalid_configuration(format!("Invalid bind options: {}", e)))
    }

    pub fn is_automatic(&self) -> bool {
        self.conversion_type == ConversionType::Automatic
    }

    /// `name` with the configured prefix, unless it already carries it
    pub fn prefixed(&self, name: &str) -> String {
        match &self.parameter_prefix {
            Some(prefix) if !name.starts_with(prefix.as_str()) => format!("{}{}", prefix, name),
            _ => name.to_string(),
        }
    }
}

/// Builder for [`BindOptions`]
#[derive(Debug, Clone, Default)]
pub struct BindOptionsBuilder {
    options: BindOptions,
}

impl BindOptionsBuilder {
    pub fn conversion_type(mut self, conversion_type: ConversionType) -> Self {
        self.options.conversion_type = conversion_type;
        self
    }

    /// Shorthand for [`ConversionType::Automatic`]
    pub fn automatic(self) -> Self {
        self.conversion_type(ConversionType::Automatic)
    }

    pub fn enum_default_db_type(mut self, db_type: DbType) -> Self {
        self.options.enum_default_db_type = db_type;
        self
    }

    pub fn parameter_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.parameter_prefix = Some(prefix.into());
        self
    }

    pub fn build(self) -> BindOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_json_fills_defaults() {
        let options = BindOptions::from_json(r#"{"conversionType": "Automatic"}"#).unwrap();
        assert!(options.is_automatic());
        assert_eq!(options.enum_default_db_type, DbType::String);
        assert_eq!(options.parameter_prefix, None);
    }

    #[test]
    fn test_prefix_is_not_doubled() {
        let options = BindOptions::builder().parameter_prefix("@").build();
        assert_eq!(options.prefixed("Age"), "@Age");
        assert_eq!(options.prefixed("@Age"), "@Age");
    }

    #[test]
    fn test_unknown_conversion_type_is_configuration_error() {
        let err = BindOptions::from_json(r#"{"conversionType": "Sometimes"}"#).unwrap_err();
        assert_eq!(err.kind(), dbbind_diagnostics::ErrorKind::Configuration);
    }
}
