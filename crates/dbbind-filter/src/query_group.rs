//! Composite predicate

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::{Conjunction, FOR_UPDATE_PREFIX, QueryField};

/// A child of a [`QueryGroup`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryNode {
    Field(QueryField),
    Group(QueryGroup),
}

impl From<QueryField> for QueryNode {
    fn from(field: QueryField) -> Self {
        Self::Field(field)
    }
}

impl From<QueryGroup> for QueryNode {
    fn from(group: QueryGroup) -> Self {
        Self::Group(group)
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => write!(f, "{}", field),
            Self::Group(group) => write!(f, "{}", group),
        }
    }
}

/// Ordered children joined by a conjunction.
///
/// Construction assigns every leaf a parameter name unique across the whole
/// tree: the first occurrence of a field keeps its name, later ones become
/// `Name_1`, `Name_2`, ... in depth-first order. Children cannot be modified
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryGroup {
    conjunction: Conjunction,
    children: Vec<QueryNode>,
}

impl QueryGroup {
    pub fn new<I, N>(conjunction: Conjunction, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<QueryNode>,
    {
        let mut group = Self {
            conjunction,
            children: children.into_iter().map(Into::into).collect(),
        };
        group.assign_parameter_names();
        group
    }

    pub fn and<I, N>(children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<QueryNode>,
    {
        Self::new(Conjunction::And, children)
    }

    pub fn or<I, N>(children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<QueryNode>,
    {
        Self::new(Conjunction::Or, children)
    }

    pub fn conjunction(&self) -> Conjunction {
        self.conjunction
    }

    pub fn children(&self) -> &[QueryNode] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Leaf fields in depth-first, left-to-right order.
    ///
    /// Without `recursive` only the direct leaf children are returned.
    pub fn get_fields(&self, recursive: bool) -> Vec<&QueryField> {
        let mut fields = Vec::new();
        self.collect_fields(recursive, &mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, recursive: bool, out: &mut Vec<&'a QueryField>) {
        for child in &self.children {
            match child {
                QueryNode::Field(field) => out.push(field),
                QueryNode::Group(group) if recursive => group.collect_fields(recursive, out),
                QueryNode::Group(_) => {}
            }
        }
    }

    /// Copy whose parameter names carry the for-update prefix.
    ///
    /// Used when SET values and WHERE values of an update share one command.
    pub fn prefixed_for_update(&self) -> Self {
        let mut group = self.clone();
        group.for_each_field_mut(&mut |field| {
            if !field.is_for_update() {
                let name = format!("{}{}", FOR_UPDATE_PREFIX, field.parameter_name());
                field.set_parameter_name(name);
            }
        });
        group
    }

    fn for_each_field_mut(&mut self, f: &mut dyn FnMut(&mut QueryField)) {
        for child in &mut self.children {
            match child {
                QueryNode::Field(field) => f(field),
                QueryNode::Group(group) => group.for_each_field_mut(f),
            }
        }
    }

    fn assign_parameter_names(&mut self) {
        let mut used = HashSet::new();
        self.for_each_field_mut(&mut |field| {
            let name = field.field().name();
            let base = if field.is_for_update() && !name.starts_with(FOR_UPDATE_PREFIX) {
                format!("{}{}", FOR_UPDATE_PREFIX, name)
            } else {
                name.to_string()
            };
            let mut candidate = base.clone();
            let mut suffix = 0usize;
            while !used.insert(candidate.to_ascii_lowercase()) {
                suffix += 1;
                candidate = format!("{}_{}", base, suffix);
            }
            field.set_parameter_name(candidate);
        });
    }
}

impl fmt::Display for QueryGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", self.conjunction)?;
            }
            write!(f, "{}", child)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Operation;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_duplicate_fields_are_renamed_depth_first() {
        let group = QueryGroup::or([
            QueryNode::from(QueryField::new("Age", Operation::LessThan, 18)),
            QueryGroup::and([
                QueryField::new("Age", Operation::GreaterThan, 65),
                QueryField::equal("Retired", true),
            ])
            .into(),
            QueryField::new("AGE", Operation::Equal, 40).into(),
        ]);

        let names: Vec<&str> = group
            .get_fields(true)
            .iter()
            .map(|f| f.parameter_name())
            .collect();
        assert_eq!(names, vec!["Age", "Age_1", "Retired", "AGE_2"]);
        assert_eq!(
            group.to_string(),
            "(Age < @Age OR (Age > @Age_1 AND Retired = @Retired) OR AGE = @AGE_2)"
        );
    }

    #[test]
    fn test_non_recursive_fields_skip_nested_groups() {
        let group = QueryGroup::and([
            QueryNode::from(QueryField::equal("A", 1)),
            QueryGroup::or([QueryField::equal("B", 2)]).into(),
            QueryField::equal("C", 3).into(),
        ]);
        let names: Vec<&str> = group.get_fields(false).iter().map(|f| f.field().name()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn test_nested_update_group_keeps_prefix() {
        let where_group = QueryGroup::and([QueryField::equal("Id", 1)]).prefixed_for_update();
        let group = QueryGroup::and([
            QueryNode::from(QueryField::equal("Id", 2)),
            where_group.into(),
            QueryField::equal("Id", 3).into(),
        ]);

        let names: Vec<&str> = group
            .get_fields(true)
            .iter()
            .map(|f| f.parameter_name())
            .collect();
        assert_eq!(names, vec!["Id", "_Id", "Id_1"]);
    }

    #[test]
    fn test_prefixed_for_update_is_idempotent() {
        let group = QueryGroup::and([QueryField::equal("Id", 1)]);
        let prefixed = group.prefixed_for_update().prefixed_for_update();
        assert_eq!(prefixed.get_fields(true)[0].parameter_name(), "_Id");
        assert_eq!(group.get_fields(true)[0].parameter_name(), "Id");
    }
}
