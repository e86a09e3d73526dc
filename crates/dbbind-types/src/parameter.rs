//! Bound parameters

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{DbType, DbValue};

/// Direction of a command parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ParameterDirection {
    #[default]
    Input,
    Output,
    InputOutput,
    ReturnValue,
}

impl fmt::Display for ParameterDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
            Self::InputOutput => write!(f, "input/output"),
            Self::ReturnValue => write!(f, "return"),
        }
    }
}

/// A finished parameter, ready to be attached to a prepared command.
///
/// `db_type` is `None` when the provider default applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbParameter {
    pub name: String,
    pub value: DbValue,
    pub db_type: Option<DbType>,
    pub size: Option<usize>,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
    pub direction: ParameterDirection,
}

impl DbParameter {
    /// Create an input parameter with provider-default type and size
    pub fn new(name: impl Into<String>, value: impl Into<DbValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            db_type: None,
            size: None,
            precision: None,
            scale: None,
            direction: ParameterDirection::Input,
        }
    }

    pub fn with_db_type(mut self, db_type: DbType) -> Self {
        self.db_type = Some(db_type);
        self
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_direction(mut self, direction: ParameterDirection) -> Self {
        self.direction = direction;
        self
    }
}

impl fmt::Display for DbParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.value)?;
        if let Some(db_type) = self.db_type {
            write!(f, " ({}", db_type)?;
            if let Some(size) = self.size {
                write!(f, ", size {}", size)?;
            }
            write!(f, ")")?;
        }
        if self.direction != ParameterDirection::Input {
            write!(f, " [{}]", self.direction)?;
        }
        Ok(())
    }
}
