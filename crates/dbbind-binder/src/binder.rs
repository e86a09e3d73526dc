//! Parameter binder
//!
//! Turns a [`BindSource`] into [`DbParameter`]s. For each member or filter
//! field the binder resolves the value type, converts the value when the
//! schema asks for it, runs property handlers and picks the native type, size
//! and direction. Parameters are staged and attached to the command only when
//! the whole source has bound successfully.

use std::borrow::Cow;

use dbbind_diagnostics::{DbBindError, Result};
use dbbind_filter::{FOR_UPDATE_PREFIX, Field, Operation, QueryField, QueryGroup};
use dbbind_model::{
    ClassProperty, DbField, Entity, MetadataCache, PropertyHandlerSetOptions, TypeKey,
};
use dbbind_types::{DbParameter, DbType, DbValue, ParameterDirection, ValueConverter, ValueType};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use smallvec::SmallVec;

use crate::command::{CommandArrayParameter, PreparedCommand};
use crate::config::BindOptions;
use crate::context::{BindScope, BindSource};
use crate::resolver::TypeResolverRegistry;

static IN_SUFFIX: Lazy<std::result::Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"_In_\d+$"));

/// Schema column for a parameter or member name.
///
/// A leading `@` and an `_In_<n>` expansion suffix are ignored; the match is
/// case-insensitive.
pub fn get_schema_field<'s>(name: &str, schema: &'s [DbField]) -> Option<&'s DbField> {
    let name = name.strip_prefix('@').unwrap_or(name);
    let name = match IN_SUFFIX.as_ref() {
        Ok(suffix) => suffix.replace(name, ""),
        Err(_) => Cow::Borrowed(name),
    };
    schema.iter().find(|field| field.is_named(&name))
}

/// What happened to one member or filter field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldBinding {
    /// Names of the parameters created; more than one for In and Between
    Parameters(SmallVec<[String; 2]>),
    /// Equality against null, rendered as `IS NULL` with no parameter
    IsNull,
    IsNotNull,
    /// Excluded by the scope or absent from the schema
    Skipped,
}

/// Result of a successful bind
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindSummary {
    bindings: Vec<(String, FieldBinding)>,
    array_parameters: Vec<CommandArrayParameter>,
}

impl BindSummary {
    /// Per-field outcomes in binding order
    pub fn bindings(&self) -> &[(String, FieldBinding)] {
        &self.bindings
    }

    /// First outcome recorded for `name`, case-insensitive
    pub fn get(&self, name: &str) -> Option<&FieldBinding> {
        self.bindings
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, binding)| binding)
    }

    /// Array-valued inputs that were expanded into `_In_` parameters
    pub fn array_parameters(&self) -> &[CommandArrayParameter] {
        &self.array_parameters
    }

    pub fn parameter_count(&self) -> usize {
        self.bindings
            .iter()
            .map(|(_, binding)| match binding {
                FieldBinding::Parameters(names) => names.len(),
                _ => 0,
            })
            .sum()
    }

    fn push(&mut self, name: impl Into<String>, binding: FieldBinding) {
        self.bindings.push((name.into(), binding));
    }

    fn extend(&mut self, other: BindSummary) {
        self.bindings.extend(other.bindings);
        self.array_parameters.extend(other.array_parameters);
    }
}

/// Parameters and summary accumulated before anything touches the command
#[derive(Default)]
struct Staged {
    parameters: Vec<DbParameter>,
    summary: BindSummary,
}

impl Staged {
    fn commit<C: PreparedCommand + ?Sized>(self, command: &mut C) -> BindSummary {
        for parameter in self.parameters {
            command.add_parameter(parameter);
        }
        self.summary
    }
}

/// One member or field on its way to becoming parameters
struct BindItem<'p> {
    /// Column name used for schema lookups, scope keys and the summary
    column: String,
    property: Cow<'p, ClassProperty>,
    /// Parameter name before expansion and attribute renames
    base_name: String,
    value: DbValue,
    operation: Option<Operation>,
    direction: Option<ParameterDirection>,
}

/// Binds entities, dictionaries and filter trees onto prepared commands.
///
/// Holds only shared, read-only state; a single binder may serve any number
/// of threads.
#[derive(Debug, Clone)]
pub struct ParameterBinder<'a> {
    options: &'a BindOptions,
    resolvers: &'a TypeResolverRegistry,
    metadata: &'a MetadataCache,
    converter: ValueConverter,
}

impl<'a> ParameterBinder<'a> {
    pub fn new(
        options: &'a BindOptions,
        resolvers: &'a TypeResolverRegistry,
        metadata: &'a MetadataCache,
    ) -> Self {
        Self {
            options,
            resolvers,
            metadata,
            converter: ValueConverter::new(),
        }
    }

    pub fn options(&self) -> &BindOptions {
        self.options
    }

    /// Bind every member or field of `source` onto `command`.
    ///
    /// `schema` may be empty, in which case nothing is skipped for being
    /// absent and no schema-driven conversion happens. On error the command
    /// is left as it was.
    pub fn bind_parameters<C: PreparedCommand + ?Sized>(
        &self,
        command: &mut C,
        source: BindSource<'_>,
        schema: &[DbField],
        scope: &BindScope,
    ) -> Result<BindSummary> {
        let mut staged = Staged::default();
        self.stage(source, schema, scope, &mut staged)?;
        log::debug!(
            "Bound {} parameter(s) from {}",
            staged.parameters.len(),
            source.describe()
        );
        Ok(staged.commit(command))
    }

    /// Shorthand for binding a typed entity
    pub fn bind_entity<T: Entity, C: PreparedCommand + ?Sized>(
        &self,
        command: &mut C,
        entity: &T,
        schema: &[DbField],
        scope: &BindScope,
    ) -> Result<BindSummary> {
        self.bind_parameters(command, BindSource::entity(entity), schema, scope)
    }

    /// Bind an update: the entity's members as SET parameters and the
    /// `where_group` fields under the for-update prefix, in one commit.
    pub fn bind_update<T: Entity, C: PreparedCommand + ?Sized>(
        &self,
        command: &mut C,
        entity: &T,
        where_group: &QueryGroup,
        schema: &[DbField],
        scope: &BindScope,
    ) -> Result<BindSummary> {
        let mut staged = Staged::default();
        self.stage(BindSource::entity(entity), schema, scope, &mut staged)?;

        let where_group = where_group.prefixed_for_update();
        let mut where_staged = Staged::default();
        self.stage(BindSource::Group(&where_group), schema, scope, &mut where_staged)?;

        staged.parameters.extend(where_staged.parameters);
        staged.summary.extend(where_staged.summary);
        Ok(staged.commit(command))
    }

    /// Equality group identifying `entity`.
    ///
    /// Explicit `qualifiers` win. Without them the key is the first of: a
    /// member declared primary or identity, the member behind the schema's
    /// primary or identity column, the conventional primary key, the
    /// registered identity.
    pub fn qualifier_group<T: Entity>(
        &self,
        entity: &T,
        schema: &[DbField],
        qualifiers: Option<&[Field]>,
    ) -> Result<QueryGroup> {
        let type_name = TypeKey::of::<T>().short_name();
        let properties = self.metadata.get::<T>();

        let keys: Vec<ClassProperty> = match qualifiers {
            Some([]) => return Err(DbBindError::empty_qualifiers(type_name)),
            Some(fields) => fields
                .iter()
                .map(|field| {
                    properties
                        .iter()
                        .find(|p| p.is_named(field.name()))
                        .cloned()
                        .ok_or_else(|| DbBindError::missing_member(type_name, field.name()))
                })
                .collect::<Result<_>>()?,
            None => vec![
                self.key_property::<T>(&properties, schema)
                    .ok_or_else(|| DbBindError::missing_primary_key_or_identity(type_name))?,
            ],
        };

        let mut fields = Vec::with_capacity(keys.len());
        for key in keys {
            if !schema.is_empty() && get_schema_field(&key.mapped_name, schema).is_none() {
                return Err(DbBindError::missing_field(key.mapped_name));
            }
            let value = Entity::value(entity, &key.member_name)
                .ok_or_else(|| DbBindError::missing_member(type_name, key.member_name.as_str()))?;
            let field = match key.declared_type {
                Some(declared) => Field::with_type(key.mapped_name, declared),
                None => Field::new(key.mapped_name),
            };
            fields.push(QueryField::equal(field, value));
        }
        Ok(QueryGroup::and(fields))
    }

    fn key_property<T: Entity>(
        &self,
        properties: &[ClassProperty],
        schema: &[DbField],
    ) -> Option<ClassProperty> {
        properties
            .iter()
            .find(|p| p.is_primary())
            .or_else(|| properties.iter().find(|p| p.is_identity()))
            .cloned()
            .or_else(|| {
                schema
                    .iter()
                    .find(|f| f.is_primary)
                    .or_else(|| schema.iter().find(|f| f.is_identity))
                    .and_then(|column| properties.iter().find(|p| p.is_named(&column.name)))
                    .cloned()
            })
            .or_else(|| self.metadata.primary::<T>())
            .or_else(|| self.metadata.identity::<T>())
    }

    fn stage(
        &self,
        source: BindSource<'_>,
        schema: &[DbField],
        scope: &BindScope,
        staged: &mut Staged,
    ) -> Result<()> {
        match source {
            BindSource::Entity {
                key,
                members,
                values,
            } => {
                let properties = self.metadata.get_by_key(key, members);
                for property in properties.iter() {
                    let column = property.mapped_name.as_str();
                    if scope.is_skipped(&[property.member_name.as_str(), column]) {
                        staged.summary.push(column, FieldBinding::Skipped);
                        continue;
                    }
                    let db_field = get_schema_field(column, schema);
                    if !schema.is_empty() && db_field.is_none() {
                        log::trace!("{} is not a column of the target, skipped", column);
                        staged.summary.push(column, FieldBinding::Skipped);
                        continue;
                    }
                    let value = values.value(&property.member_name).ok_or_else(|| {
                        DbBindError::missing_member(key.short_name(), property.member_name.as_str())
                    })?;
                    let item = BindItem {
                        column: column.to_string(),
                        property: Cow::Borrowed(property),
                        base_name: column.to_string(),
                        value,
                        operation: None,
                        direction: None,
                    };
                    self.bind_item(item, db_field, scope, staged)?;
                }
                Ok(())
            }
            BindSource::Dictionary(map) => self.stage_map(map, schema, scope, staged),
            BindSource::Value(value) => match value {
                DbValue::Map(map) => self.stage_map(map, schema, scope, staged),
                DbValue::List(items) if items.iter().any(|v| matches!(v, DbValue::Map(_))) => {
                    Err(DbBindError::ambiguous_parameter_shape("list of maps"))
                }
                other => Err(DbBindError::ambiguous_parameter_shape(other.shape_name())),
            },
            BindSource::Json(json) => {
                let value = DbValue::from_json(json);
                self.stage(BindSource::Value(&value), schema, scope, staged)
            }
            BindSource::Field(field) => self.stage_query_field(field, schema, scope, staged),
            BindSource::Group(group) => group
                .get_fields(true)
                .into_iter()
                .try_for_each(|field| self.stage_query_field(field, schema, scope, staged)),
            BindSource::Fields(fields) => {
                let group = QueryGroup::and(fields.iter().cloned());
                self.stage(BindSource::Group(&group), schema, scope, staged)
            }
        }
    }

    fn stage_map(
        &self,
        map: &IndexMap<String, DbValue>,
        schema: &[DbField],
        scope: &BindScope,
        staged: &mut Staged,
    ) -> Result<()> {
        let properties = self
            .metadata
            .dynamic_properties(map.iter().map(|(name, value)| (name.as_str(), value.value_type())));

        for (property, (name, value)) in properties.into_iter().zip(map) {
            if scope.is_skipped(&[name.as_str()]) {
                staged.summary.push(name.as_str(), FieldBinding::Skipped);
                continue;
            }
            if let DbValue::Map(_) = value {
                return Err(DbBindError::nested_map(name));
            }
            let db_field = get_schema_field(name, schema);
            if !schema.is_empty() && db_field.is_none() {
                log::trace!("{} is not a column of the target, skipped", name);
                staged.summary.push(name.as_str(), FieldBinding::Skipped);
                continue;
            }
            let item = BindItem {
                column: name.clone(),
                property: Cow::Owned(property),
                base_name: name.clone(),
                value: value.clone(),
                operation: None,
                direction: None,
            };
            self.bind_item(item, db_field, scope, staged)?;
        }
        Ok(())
    }

    fn stage_query_field(
        &self,
        field: &QueryField,
        schema: &[DbField],
        scope: &BindScope,
        staged: &mut Staged,
    ) -> Result<()> {
        let name = field.field().name();
        // update WHERE fields share their column with a SET member that may be skipped
        let skipped = if field.is_for_update() {
            scope.is_skipped(&[field.parameter_name()])
        } else {
            scope.is_skipped(&[name, field.parameter_name()])
        };
        if skipped {
            staged.summary.push(name, FieldBinding::Skipped);
            return Ok(());
        }
        let db_field = get_schema_field(name, schema);
        if !schema.is_empty() && db_field.is_none() {
            return Err(DbBindError::missing_field(name));
        }

        let property = self
            .metadata
            .dynamic_properties([(name, field.field().declared_type().cloned())])
            .pop()
            .unwrap_or_else(|| ClassProperty::dynamic(name, None));

        let item = BindItem {
            column: name.to_string(),
            property: Cow::Owned(property),
            base_name: field.parameter_name().to_string(),
            value: field.value().clone(),
            operation: Some(field.operation()),
            direction: field.direction(),
        };
        self.bind_item(item, db_field, scope, staged)
    }

    fn bind_item(
        &self,
        item: BindItem<'_>,
        db_field: Option<&DbField>,
        scope: &BindScope,
        staged: &mut Staged,
    ) -> Result<()> {
        if let Some(operation) = item.operation {
            if operation.is_equality() && item.value.is_null() {
                let binding = match operation {
                    Operation::Equal => FieldBinding::IsNull,
                    _ => FieldBinding::IsNotNull,
                };
                staged.summary.push(item.column, binding);
                return Ok(());
            }
        }

        let base = self.parameter_base_name(&item);
        let expanded = match item.operation {
            Some(operation) if operation.is_in() => {
                let array = CommandArrayParameter::new(base, collection_values(&item.value));
                let expanded = array.expand();
                staged.summary.array_parameters.push(array);
                expanded
            }
            Some(operation) if operation.is_between() => match collection_values(&item.value).as_slice() {
                [left, right] => vec![
                    (format!("{}_Left", base), left.clone()),
                    (format!("{}_Right", base), right.clone()),
                ],
                values => return Err(DbBindError::invalid_between(&item.base_name, values.len())),
            },
            _ => match &item.value {
                DbValue::List(values) => {
                    let array = CommandArrayParameter::new(base, values.clone());
                    let expanded = array.expand();
                    staged.summary.array_parameters.push(array);
                    expanded
                }
                DbValue::Map(_) => return Err(DbBindError::nested_map(&item.column)),
                value => vec![(base, value.clone())],
            },
        };

        let mut names = SmallVec::new();
        for (name, value) in expanded {
            let parameter = self.build_parameter(&item, name, value, db_field, scope)?;
            log::debug!("Parameter {}", parameter);
            names.push(parameter.name.clone());
            staged.parameters.push(parameter);
        }
        staged
            .summary
            .push(item.column, FieldBinding::Parameters(names));
        Ok(())
    }

    fn parameter_base_name(&self, item: &BindItem<'_>) -> String {
        let for_update = item.base_name.starts_with(FOR_UPDATE_PREFIX)
            || item
                .base_name
                .strip_prefix('@')
                .is_some_and(|n| n.starts_with(FOR_UPDATE_PREFIX));
        match &item.property.attributes.parameter_name {
            Some(rename) if !for_update => rename.clone(),
            _ => item.base_name.clone(),
        }
    }

    fn build_parameter(
        &self,
        item: &BindItem<'_>,
        name: String,
        value: DbValue,
        db_field: Option<&DbField>,
        scope: &BindScope,
    ) -> Result<DbParameter> {
        let property = item.property.as_ref();
        let keys = [
            name.as_str(),
            item.column.as_str(),
            property.member_name.as_str(),
            item.base_name.as_str(),
        ];
        let schema_type = db_field.and_then(|f| self.schema_value_type(f));

        let mut value = value;
        let mut value_type = value
            .value_type()
            .or_else(|| property.declared_type.clone())
            .or_else(|| schema_type.clone());
        let mut resolved: Option<DbType> = None;
        let mut declared = property.declared_type.as_ref();
        let mut provider_default = false;

        if value_type.as_ref().is_some_and(ValueType::is_enum) {
            if db_field.is_some_and(DbField::is_postgres_user_defined) {
                provider_default = true;
                value = enum_name(value);
            } else {
                let db_type = property
                    .attributes
                    .db_type
                    .or_else(|| db_field.and_then(|f| self.schema_db_type(f)))
                    .or_else(|| {
                        db_field
                            .and_then(|f| f.provider.as_deref())
                            .and_then(|p| self.resolvers.enum_fallback(p))
                    })
                    .unwrap_or(self.options.enum_default_db_type);
                value = self.enum_value(value, db_type)?;
                resolved = Some(db_type);
            }
        } else if let (Some(target), Some(field)) = (schema_type.as_ref(), db_field) {
            let convertible = self.options.is_automatic() || field.is_primary || field.is_identity;
            if convertible && !value.is_null() && value.value_type().as_ref() != Some(target) {
                log::trace!("Converting {} to {} for {}", value, target, name);
                value = self.converter.convert(value, target)?;
                resolved = self.resolvers.resolve(target);
                value_type = Some(target.clone());
            }
        }

        let handler = property
            .handler
            .clone()
            .or_else(|| value_type.as_ref().and_then(|vt| self.metadata.type_handler(vt)));
        if let Some(handler) = handler {
            let options = PropertyHandlerSetOptions {
                property,
                parameter_name: &name,
                db_field,
            };
            value = handler.set(value, &options);
            let handled_type = handler
                .return_type()
                .or_else(|| value.value_type())
                .or_else(|| value_type.clone());
            if handled_type != value_type {
                resolved = None;
                declared = None;
                value_type = handled_type;
            }
        }

        let db_type = if provider_default {
            None
        } else {
            scope
                .db_type(&keys)
                .or(property.attributes.db_type)
                .or(resolved)
                .or_else(|| db_field.and_then(|f| self.schema_db_type(f)))
                .or_else(|| declared.and_then(|vt| self.resolvers.resolve(vt)))
                .or_else(|| value_type.as_ref().and_then(|vt| self.resolvers.resolve(vt)))
        };

        Ok(DbParameter {
            name: self.options.prefixed(&name),
            value,
            db_type,
            size: scope
                .size(&keys)
                .or(property.attributes.size)
                .or_else(|| db_field.and_then(|f| f.size)),
            precision: property
                .attributes
                .precision
                .or_else(|| db_field.and_then(|f| f.precision)),
            scale: property
                .attributes
                .scale
                .or_else(|| db_field.and_then(|f| f.scale)),
            direction: item
                .direction
                .or(property.attributes.direction)
                .unwrap_or_default(),
        })
    }

    /// Value type of a column: declared on the field, else from its native type name
    fn schema_value_type(&self, field: &DbField) -> Option<ValueType> {
        field.value_type.clone().or_else(|| {
            let provider = field.provider.as_deref()?;
            let type_name = field.database_type.as_deref()?;
            self.resolvers.resolve_type_name(provider, type_name)
        })
    }

    /// Native type of a column: from its native type name, else its value type
    fn schema_db_type(&self, field: &DbField) -> Option<DbType> {
        let by_name = match (field.provider.as_deref(), field.database_type.as_deref()) {
            (Some(provider), Some(type_name)) => {
                self.resolvers.resolve_type_name_db_type(provider, type_name)
            }
            _ => None,
        };
        by_name.or_else(|| {
            field
                .value_type
                .as_ref()
                .and_then(|vt| self.resolvers.resolve(vt))
        })
    }

    /// Enum values travel as their name for text columns and as their discriminant otherwise
    fn enum_value(&self, value: DbValue, db_type: DbType) -> Result<DbValue> {
        if !matches!(value, DbValue::Enum(_)) {
            return Ok(value);
        }
        if db_type.is_integral() {
            let target = self
                .resolvers
                .resolve_db_type(db_type)
                .unwrap_or(ValueType::Int64);
            return Ok(self.converter.convert(value, &target)?);
        }
        Ok(enum_name(value))
    }
}

fn enum_name(value: DbValue) -> DbValue {
    match value {
        DbValue::Enum(e) => DbValue::String(e.name),
        other => other,
    }
}

/// Items of a collection value; null is empty and a scalar is a single item
fn collection_values(value: &DbValue) -> Vec<DbValue> {
    match value {
        DbValue::List(values) => values.clone(),
        DbValue::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_schema_field_ignores_at_and_in_suffix() {
        let schema = vec![DbField::new("Status"), DbField::new("Name")];
        assert_eq!(get_schema_field("@status", &schema).map(|f| f.name.as_str()), Some("Status"));
        assert_eq!(get_schema_field("Status_In_12", &schema).map(|f| f.name.as_str()), Some("Status"));
        assert!(get_schema_field("Status_In_", &schema).is_none());
        assert!(get_schema_field("Age", &schema).is_none());
    }

    #[test]
    fn test_collection_values() {
        assert!(collection_values(&DbValue::Null).is_empty());
        assert_eq!(collection_values(&DbValue::from(3)), vec![DbValue::from(3)]);
        assert_eq!(collection_values(&DbValue::list([1, 2])).len(), 2);
    }

    #[test]
    fn test_summary_counts_parameters() {
        let mut summary = BindSummary::default();
        summary.push("A", FieldBinding::Parameters(SmallVec::from_vec(vec!["A".into(), "A_1".into()])));
        summary.push("B", FieldBinding::IsNull);
        summary.push("C", FieldBinding::Skipped);
        assert_eq!(summary.parameter_count(), 2);
        assert_eq!(summary.get("b"), Some(&FieldBinding::IsNull));
    }
}
