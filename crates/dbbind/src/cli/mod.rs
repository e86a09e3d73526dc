//! CLI functionality for the dbbind tool
//!
//! - Binding a JSON source against a JSON schema
//! - Schema field lookup
//! - Source and schema loading
//! - Output formatting

pub mod bind;
pub mod field;
pub mod output;
pub mod source;
