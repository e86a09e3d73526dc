//! dbbind diagnostics and error handling
//!
//! This crate provides the error taxonomy shared by every dbbind crate:
//! structured error codes and the [`DbBindError`] type raised while
//! translating predicates and binding parameters.

mod error;
mod error_code;

pub use error::*;
pub use error_code::*;

/// Result type for dbbind operations
pub type Result<T> = std::result::Result<T, DbBindError>;
