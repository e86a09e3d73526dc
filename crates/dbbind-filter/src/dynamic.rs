//! Anonymous-shape objects as filters

use dbbind_diagnostics::{DbBindError, Result};
use dbbind_types::DbValue;
use indexmap::IndexMap;
use serde::Serialize;

use crate::{Field, QueryField, QueryGroup};

/// Turn any serializable object into an AND group of Equal fields.
///
/// Members keep their declaration order. Fails when the object does not
/// serialize to a non-empty JSON object.
pub fn parse_dynamic<S: Serialize + ?Sized>(object: &S) -> Result<QueryGroup> {
    let json = serde_json::to_value(object)
        .map_err(|e| DbBindError::no_inspectable_members(e.to_string()))?;

    match DbValue::from_json(&json) {
        DbValue::Map(map) => parse_map(&map),
        other => Err(DbBindError::no_inspectable_members(other.shape_name())),
    }
}

/// Turn a flat key/value map into an AND group of Equal fields
pub fn parse_map(map: &IndexMap<String, DbValue>) -> Result<QueryGroup> {
    if map.is_empty() {
        return Err(DbBindError::no_inspectable_members("empty map"));
    }

    let fields = map
        .iter()
        .map(|(name, value)| {
            if matches!(value, DbValue::Map(_)) {
                return Err(DbBindError::nested_map(name));
            }
            let field = match value.value_type() {
                Some(value_type) => Field::with_type(name.clone(), value_type),
                None => Field::new(name.clone()),
            };
            Ok(QueryField::equal(field, value.clone()))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QueryGroup::and(fields))
}
