//! dbbind error codes following a structured numbering system
//!
//! Error code ranges:
//! - DBB0100-DBB0199: Schema errors (keys, qualifiers)
//! - DBB0200-DBB0299: Field errors (columns and members)
//! - DBB0300-DBB0399: Shape errors (arity, parameter object shape)
//! - DBB0400-DBB0499: Expression errors (predicate translation)
//! - DBB0500-DBB0599: Conversion errors (automatic type coercion)
//! - DBB0600-DBB0699: Configuration errors (bootstrap, registries)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    pub const fn is_schema_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    pub const fn is_field_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    pub const fn is_shape_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    pub const fn is_expression_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }

    pub const fn is_conversion_error(&self) -> bool {
        self.0 >= 500 && self.0 < 600
    }

    pub const fn is_configuration_error(&self) -> bool {
        self.0 >= 600 && self.0 < 700
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DBB{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Schema errors (0100-0199)
    map.insert(
        100,
        ErrorInfo::new("Missing primary key or identity")
            .with_help("Pass explicit qualifiers or mark a primary/identity member"),
    );
    map.insert(101, ErrorInfo::new("Qualifier list is empty"));

    // Field errors (0200-0299)
    map.insert(
        200,
        ErrorInfo::new("Field is not present in the table schema")
            .with_help("Check the column name against the schema returned by the catalog"),
    );
    map.insert(201, ErrorInfo::new("Member is not declared on the entity type"));

    // Shape errors (0300-0399)
    map.insert(
        300,
        ErrorInfo::new("Between requires exactly two values")
            .with_help("Supply a two-element list: [low, high]"),
    );
    map.insert(301, ErrorInfo::new("Nested map where a flat key/value map was expected"));
    map.insert(302, ErrorInfo::new("Ambiguous parameter object shape"));
    map.insert(303, ErrorInfo::new("Object has no inspectable members"));

    // Expression errors (0400-0499)
    map.insert(
        400,
        ErrorInfo::new("Invalid expression")
            .with_help("Only comparisons, AND/OR groups and contains/starts_with/ends_with calls are supported"),
    );
    map.insert(401, ErrorInfo::new("Unsupported operator"));
    map.insert(402, ErrorInfo::new("Operand is not a constant value"));

    // Conversion errors (0500-0599)
    map.insert(500, ErrorInfo::new("No conversion path between types"));
    map.insert(501, ErrorInfo::new("Value cannot be represented in the target type"));

    // Configuration errors (0600-0699)
    map.insert(600, ErrorInfo::new("Global instance already installed"));
    map.insert(601, ErrorInfo::new("Invalid configuration"));

    map
});

// Schema errors
pub const DBB0100: ErrorCode = ErrorCode::new(100);
pub const DBB0101: ErrorCode = ErrorCode::new(101);

// Field errors
pub const DBB0200: ErrorCode = ErrorCode::new(200);
pub const DBB0201: ErrorCode = ErrorCode::new(201);

// Shape errors
pub const DBB0300: ErrorCode = ErrorCode::new(300);
pub const DBB0301: ErrorCode = ErrorCode::new(301);
pub const DBB0302: ErrorCode = ErrorCode::new(302);
pub const DBB0303: ErrorCode = ErrorCode::new(303);

// Expression errors
pub const DBB0400: ErrorCode = ErrorCode::new(400);
pub const DBB0401: ErrorCode = ErrorCode::new(401);
pub const DBB0402: ErrorCode = ErrorCode::new(402);

// Conversion errors
pub const DBB0500: ErrorCode = ErrorCode::new(500);
pub const DBB0501: ErrorCode = ErrorCode::new(501);

// Configuration errors
pub const DBB0600: ErrorCode = ErrorCode::new(600);
pub const DBB0601: ErrorCode = ErrorCode::new(601);
