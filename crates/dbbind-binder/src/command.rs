//! Prepared command contract

use dbbind_types::{DbParameter, DbValue};
use indexmap::IndexMap;
use serde::Serialize;

/// A command whose execution belongs to someone else; the binder only adds parameters
pub trait PreparedCommand {
    fn add_parameter(&mut self, parameter: DbParameter);

    fn parameters(&self) -> &[DbParameter];
}

/// In-memory parameter collection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommandParameters {
    parameters: Vec<DbParameter>,
}

impl CommandParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameter by name, case-insensitive
    pub fn get(&self, name: &str) -> Option<&DbParameter> {
        self.parameters
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DbParameter> {
        self.parameters.iter()
    }

    pub fn into_inner(self) -> Vec<DbParameter> {
        self.parameters
    }
}

impl PreparedCommand for CommandParameters {
    fn add_parameter(&mut self, parameter: DbParameter) {
        self.parameters.push(parameter);
    }

    fn parameters(&self) -> &[DbParameter] {
        &self.parameters
    }
}

impl<'a> IntoIterator for &'a CommandParameters {
    type Item = &'a DbParameter;
    type IntoIter = std::slice::Iter<'a, DbParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}

/// One array-valued input before expansion into singular parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandArrayParameter {
    base_name: String,
    values: Vec<DbValue>,
}

impl CommandArrayParameter {
    pub fn new(base_name: impl Into<String>, values: Vec<DbValue>) -> Self {
        Self {
            base_name: base_name.into(),
            values,
        }
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn values(&self) -> &[DbValue] {
        &self.values
    }

    /// `<base>_In_<i>` for every value; one null sentinel when there are none
    pub fn expand(&self) -> Vec<(String, DbValue)> {
        if self.values.is_empty() {
            return vec![(format!("{}_In_0", self.base_name), DbValue::Null)];
        }
        self.values
            .iter()
            .enumerate()
            .map(|(i, value)| (format!("{}_In_{}", self.base_name, i), value.clone()))
            .collect()
    }

    /// Names produced by [`expand`](Self::expand)
    pub fn parameter_names(&self) -> Vec<String> {
        self.expand().into_iter().map(|(name, _)| name).collect()
    }
}

/// Array parameters for every list-valued entry of a dictionary, in entry order
pub fn expand_array_parameters(values: &IndexMap<String, DbValue>) -> Vec<CommandArrayParameter> {
    values
        .iter()
        .filter_map(|(name, value)| match value {
            DbValue::List(items) => Some(CommandArrayParameter::new(name.clone(), items.clone())),
            _ => None,
        })
        .collect()
}
