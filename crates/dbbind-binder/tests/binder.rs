//! Parameter binder tests
//!
//! End-to-end binding of filter fields, dictionaries and entities against
//! optional schemas: naming, type precedence, conversion, handlers and the
//! staged commit.

use chrono::NaiveDate;
use dbbind_ast::member;
use dbbind_binder::*;
use dbbind_diagnostics::{DBB0100, DBB0101, DBB0200, DBB0300, DBB0301, DBB0302, ErrorKind};
use dbbind_filter::{Field, Operation, QueryField, QueryGroup, translate_predicate};
use dbbind_model::{
    DbField, Entity, MappingRegistry, MemberInfo, MetadataCache, PropertyHandler,
    PropertyHandlerGetOptions, PropertyHandlerSetOptions,
};
use dbbind_types::{DbParameter, DbType, DbValue, EnumValue, ParameterDirection, ValueType};
use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Arc;
use uuid::Uuid;

// ----------------------------------------------------------------------------
// Fixtures
// ----------------------------------------------------------------------------

struct Person {
    id: i64,
    name: String,
    status: EnumValue,
}

impl Entity for Person {
    fn members() -> Vec<MemberInfo> {
        vec![
            MemberInfo::new("Id", ValueType::Int64).identity(),
            MemberInfo::new("Name", ValueType::String)
                .map("FullName")
                .db_type(DbType::AnsiString)
                .size(50),
            MemberInfo::new("Status", ValueType::enumeration("Status")),
        ]
    }

    fn value(&self, member: &str) -> Option<DbValue> {
        match member {
            "Id" => Some(self.id.into()),
            "Name" => Some(self.name.as_str().into()),
            "Status" => Some(self.status.clone().into()),
            _ => None,
        }
    }
}

fn bob() -> Person {
    Person {
        id: 7,
        name: "Bob".to_string(),
        status: EnumValue::new("Status", "Active", 1),
    }
}

fn person_schema() -> Vec<DbField> {
    vec![
        DbField::new("Id")
            .with_database_type("int")
            .with_provider(providers::SQL_SERVER)
            .identity(),
        DbField::new("FullName")
            .with_database_type("nvarchar(100)")
            .with_size(100)
            .with_provider(providers::SQL_SERVER),
        DbField::new("Status")
            .with_database_type("int")
            .with_provider(providers::SQL_SERVER),
    ]
}

/// Entity with no key member and no conventional key name
struct Note {
    text: String,
}

impl Entity for Note {
    fn members() -> Vec<MemberInfo> {
        vec![MemberInfo::new("Text", ValueType::String)]
    }

    fn value(&self, member: &str) -> Option<DbValue> {
        (member == "Text").then(|| self.text.as_str().into())
    }
}

/// Entity whose key is only known from the schema
struct Order {
    code: String,
    total: i32,
}

impl Entity for Order {
    fn members() -> Vec<MemberInfo> {
        vec![
            MemberInfo::new("Code", ValueType::String),
            MemberInfo::new("Total", ValueType::Int32),
        ]
    }

    fn value(&self, member: &str) -> Option<DbValue> {
        match member {
            "Code" => Some(self.code.as_str().into()),
            "Total" => Some(self.total.into()),
            _ => None,
        }
    }
}

struct Ticket {
    token: Uuid,
    owner: String,
}

impl Entity for Ticket {
    fn members() -> Vec<MemberInfo> {
        vec![
            MemberInfo::new("Token", ValueType::Guid).handler(Arc::new(GuidAsText)),
            MemberInfo::new("Owner", ValueType::String)
                .parameter_name("p_owner")
                .direction(ParameterDirection::InputOutput),
        ]
    }

    fn value(&self, member: &str) -> Option<DbValue> {
        match member {
            "Token" => Some(self.token.into()),
            "Owner" => Some(self.owner.as_str().into()),
            _ => None,
        }
    }
}

/// Members mapped to update-prefixed columns
struct Claim {
    owner: String,
    reviewer: String,
}

impl Entity for Claim {
    fn members() -> Vec<MemberInfo> {
        vec![
            MemberInfo::new("Owner", ValueType::String)
                .map("_Owner")
                .parameter_name("renamed"),
            MemberInfo::new("Reviewer", ValueType::String)
                .map("@_Reviewer")
                .parameter_name("other"),
        ]
    }

    fn value(&self, member: &str) -> Option<DbValue> {
        match member {
            "Owner" => Some(self.owner.as_str().into()),
            "Reviewer" => Some(self.reviewer.as_str().into()),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct GuidAsText;

impl PropertyHandler for GuidAsText {
    fn return_type(&self) -> Option<ValueType> {
        Some(ValueType::String)
    }

    fn set(&self, value: DbValue, _options: &PropertyHandlerSetOptions<'_>) -> DbValue {
        match value {
            DbValue::Guid(g) => DbValue::String(g.simple().to_string()),
            other => other,
        }
    }

    fn get(&self, value: DbValue, _options: &PropertyHandlerGetOptions<'_>) -> DbValue {
        value
    }
}

#[derive(Debug)]
struct UpperCase;

impl PropertyHandler for UpperCase {
    fn set(&self, value: DbValue, options: &PropertyHandlerSetOptions<'_>) -> DbValue {
        assert!(!options.parameter_name.is_empty());
        match value {
            DbValue::String(s) => DbValue::String(s.to_uppercase()),
            other => other,
        }
    }

    fn get(&self, value: DbValue, _options: &PropertyHandlerGetOptions<'_>) -> DbValue {
        value
    }
}

struct Harness {
    options: BindOptions,
    resolvers: TypeResolverRegistry,
    metadata: MetadataCache,
}

impl Harness {
    fn new(options: BindOptions) -> Self {
        Self::with_registry(options, MappingRegistry::new())
    }

    fn with_registry(options: BindOptions, registry: MappingRegistry) -> Self {
        Self {
            options,
            resolvers: TypeResolverRegistry::new(),
            metadata: MetadataCache::new(registry),
        }
    }

    fn binder(&self) -> ParameterBinder<'_> {
        ParameterBinder::new(&self.options, &self.resolvers, &self.metadata)
    }

    fn bind(&self, source: BindSource<'_>, schema: &[DbField]) -> dbbind_diagnostics::Result<CommandParameters> {
        let mut command = CommandParameters::new();
        self.binder()
            .bind_parameters(&mut command, source, schema, &BindScope::default())?;
        Ok(command)
    }
}

fn dictionary<const N: usize>(entries: [(&str, DbValue); N]) -> IndexMap<String, DbValue> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn parameter<'c>(command: &'c CommandParameters, name: &str) -> &'c DbParameter {
    command
        .get(name)
        .unwrap_or_else(|| panic!("missing parameter {name}; have {:?}", command.names()))
}

// ----------------------------------------------------------------------------
// Filter fields
// ----------------------------------------------------------------------------

#[test]
fn test_scalar_field_without_schema() {
    let harness = Harness::new(BindOptions::default());
    let field = QueryField::new("Age", Operation::GreaterThan, 30);
    let command = harness.bind(BindSource::Field(&field), &[]).unwrap();

    assert_eq!(command.names(), vec!["Age"]);
    let age = parameter(&command, "Age");
    assert_eq!(age.value, DbValue::Int32(30));
    assert_eq!(age.db_type, Some(DbType::Int32));
    assert_eq!(age.direction, ParameterDirection::Input);
}

#[test]
fn test_in_field_expands_each_value() {
    let harness = Harness::new(BindOptions::default());
    let field = QueryField::new("Status", Operation::In, DbValue::list(["A", "B", "C"]));
    let mut command = CommandParameters::new();
    let summary = harness
        .binder()
        .bind_parameters(&mut command, BindSource::Field(&field), &[], &BindScope::default())
        .unwrap();

    assert_eq!(command.names(), vec!["Status_In_0", "Status_In_1", "Status_In_2"]);
    assert_eq!(parameter(&command, "Status_In_2").value, DbValue::string("C"));
    assert_eq!(summary.array_parameters().len(), 1);
    assert_eq!(summary.array_parameters()[0].base_name(), "Status");
}

#[test]
fn test_empty_not_in_binds_null_sentinel() {
    let harness = Harness::new(BindOptions::default());
    let field = QueryField::new("Status", Operation::NotIn, DbValue::List(Vec::new()));
    let command = harness.bind(BindSource::Field(&field), &[]).unwrap();

    assert_eq!(command.names(), vec!["Status_In_0"]);
    assert_eq!(parameter(&command, "Status_In_0").value, DbValue::Null);
}

#[rstest]
#[case::two_values(vec![NaiveDate::from_ymd_opt(2024, 1, 1), NaiveDate::from_ymd_opt(2024, 12, 31)], true)]
#[case::one_value(vec![NaiveDate::from_ymd_opt(2024, 1, 1)], false)]
#[case::three_values(
    vec![NaiveDate::from_ymd_opt(2024, 1, 1), NaiveDate::from_ymd_opt(2024, 2, 1), NaiveDate::from_ymd_opt(2024, 3, 1)],
    false
)]
fn test_between_requires_two_values(#[case] dates: Vec<Option<NaiveDate>>, #[case] ok: bool) {
    let harness = Harness::new(BindOptions::default());
    let values = DbValue::list(dates.into_iter().flatten());
    let field = QueryField::new("Created", Operation::Between, values);
    let result = harness.bind(BindSource::Field(&field), &[]);

    if ok {
        let command = result.unwrap();
        assert_eq!(command.names(), vec!["Created_Left", "Created_Right"]);
        assert_eq!(
            parameter(&command, "Created_Right").value,
            DbValue::Date(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap())
        );
    } else {
        let err = result.unwrap_err();
        assert_eq!(err.code(), DBB0300);
        assert_eq!(err.kind(), ErrorKind::Shape);
    }
}

#[rstest]
#[case::equal(Operation::Equal, FieldBinding::IsNull)]
#[case::not_equal(Operation::NotEqual, FieldBinding::IsNotNull)]
fn test_null_equality_binds_nothing(#[case] operation: Operation, #[case] expected: FieldBinding) {
    let harness = Harness::new(BindOptions::default());
    let field = QueryField::new("Name", operation, DbValue::Null);
    let mut command = CommandParameters::new();
    let summary = harness
        .binder()
        .bind_parameters(&mut command, BindSource::Field(&field), &[], &BindScope::default())
        .unwrap();

    assert!(command.is_empty());
    assert_eq!(summary.get("Name"), Some(&expected));
    assert_eq!(summary.parameter_count(), 0);
}

#[test]
fn test_group_binds_renamed_duplicates() {
    let harness = Harness::new(BindOptions::default());
    let group = QueryGroup::and([
        QueryField::new("Age", Operation::GreaterThan, 18),
        QueryField::new("Age", Operation::LessThan, 65),
    ]);
    let command = harness.bind(BindSource::Group(&group), &[]).unwrap();

    assert_eq!(command.names(), vec!["Age", "Age_1"]);
    assert_eq!(parameter(&command, "Age_1").value, DbValue::Int32(65));
}

#[test]
fn test_field_slice_binds_renamed_duplicates() {
    let harness = Harness::new(BindOptions::default());
    let fields = [
        QueryField::new("Age", Operation::GreaterThan, 18),
        QueryField::new("Age", Operation::LessThan, 65),
    ];
    let command = harness.bind(BindSource::Fields(&fields), &[]).unwrap();

    assert_eq!(command.names(), vec!["Age", "Age_1"]);
    assert_eq!(parameter(&command, "Age").value, DbValue::Int32(18));
    assert_eq!(parameter(&command, "Age_1").value, DbValue::Int32(65));
}

#[test]
fn test_field_absent_from_schema_is_an_error() {
    let harness = Harness::new(BindOptions::default());
    let field = QueryField::equal("Nickname", "Bobby");
    let err = harness
        .bind(BindSource::Field(&field), &person_schema())
        .unwrap_err();
    assert_eq!(err.code(), DBB0200);
    assert_eq!(err.kind(), ErrorKind::Field);
}

#[test]
fn test_in_field_matches_schema_column() {
    let harness = Harness::new(BindOptions::default());
    let field = QueryField::new("FullName", Operation::In, DbValue::list(["Ann", "Bob"]));
    let command = harness
        .bind(BindSource::Field(&field), &person_schema())
        .unwrap();

    let first = parameter(&command, "FullName_In_0");
    assert_eq!(first.db_type, Some(DbType::String));
    assert_eq!(first.size, Some(100));
}

#[test]
fn test_direction_comes_from_field() {
    let harness = Harness::new(BindOptions::default());
    let field = QueryField::equal("Total", 0).with_direction(ParameterDirection::Output);
    let command = harness.bind(BindSource::Field(&field), &[]).unwrap();
    assert_eq!(parameter(&command, "Total").direction, ParameterDirection::Output);
}

#[test]
fn test_parameter_prefix_is_applied() {
    let harness = Harness::new(BindOptions::builder().parameter_prefix("@").build());
    let fields = [
        QueryField::new("Age", Operation::GreaterThan, 30),
        QueryField::new("Status", Operation::In, DbValue::list([1])),
    ];
    let command = harness.bind(BindSource::Fields(&fields), &[]).unwrap();
    assert_eq!(command.names(), vec!["@Age", "@Status_In_0"]);
}

#[test]
fn test_translated_predicate_binds_mapped_columns() {
    let harness = Harness::new(BindOptions::default());
    let predicate = member::<Person>("Name")
        .eq("Bob")
        .and(member::<Person>("Id").gt(5i64));
    let group = translate_predicate(&predicate, &harness.metadata).unwrap();
    let command = harness
        .bind(BindSource::Group(&group), &person_schema())
        .unwrap();

    assert_eq!(command.names(), vec!["FullName", "Id"]);
    // identity column: converted to the schema's int
    assert_eq!(parameter(&command, "Id").value, DbValue::Int32(5));
}

// ----------------------------------------------------------------------------
// Dictionaries and dynamic values
// ----------------------------------------------------------------------------

#[test]
fn test_identity_is_converted_in_automatic_mode() {
    let harness = Harness::new(BindOptions::builder().automatic().build());
    let values = dictionary([("Id", DbValue::Int64(42)), ("FullName", DbValue::string("Bob"))]);
    let command = harness
        .bind(BindSource::Dictionary(&values), &person_schema())
        .unwrap();

    let id = parameter(&command, "Id");
    assert_eq!(id.value, DbValue::Int32(42));
    assert_eq!(id.db_type, Some(DbType::Int32));
}

#[rstest]
#[case::default_mode(BindOptions::default(), DbValue::string("30"))]
#[case::automatic(BindOptions::builder().automatic().build(), DbValue::Int32(30))]
fn test_plain_columns_convert_only_in_automatic_mode(
    #[case] options: BindOptions,
    #[case] expected: DbValue,
) {
    let harness = Harness::new(options);
    let schema = vec![DbField::new("Age").with_database_type("int").with_provider(providers::SQL_SERVER)];
    let values = dictionary([("Age", DbValue::string("30"))]);
    let command = harness.bind(BindSource::Dictionary(&values), &schema).unwrap();

    let age = parameter(&command, "Age");
    assert_eq!(age.value, expected);
    assert_eq!(age.db_type, Some(DbType::Int32));
}

#[test]
fn test_unknown_schema_type_passes_value_through() {
    let harness = Harness::new(BindOptions::builder().automatic().build());
    let schema = vec![DbField::new("Age")];
    let values = dictionary([("Age", DbValue::string("30"))]);
    let command = harness.bind(BindSource::Dictionary(&values), &schema).unwrap();

    let age = parameter(&command, "Age");
    assert_eq!(age.value, DbValue::string("30"));
    assert_eq!(age.db_type, Some(DbType::String));
}

#[test]
fn test_failed_conversion_leaves_command_untouched() {
    let harness = Harness::new(BindOptions::builder().automatic().build());
    let schema = vec![
        DbField::new("Name").with_database_type("nvarchar").with_provider(providers::SQL_SERVER),
        DbField::new("Age").with_database_type("int").with_provider(providers::SQL_SERVER),
    ];
    let values = dictionary([("Name", DbValue::string("Bob")), ("Age", DbValue::string("abc"))]);

    let mut command = CommandParameters::new();
    command.add_parameter(DbParameter::new("Existing", 1));
    let err = harness
        .binder()
        .bind_parameters(&mut command, BindSource::Dictionary(&values), &schema, &BindScope::default())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conversion);
    assert_eq!(command.names(), vec!["Existing"]);
}

#[test]
fn test_schema_type_beats_value_type() {
    let harness = Harness::new(BindOptions::default());
    let schema = vec![DbField::new("Code").with_database_type("varchar(10)").with_provider(providers::SQL_SERVER)];
    let values = dictionary([("Code", DbValue::string("X1"))]);
    let command = harness.bind(BindSource::Dictionary(&values), &schema).unwrap();
    assert_eq!(parameter(&command, "Code").db_type, Some(DbType::AnsiString));
}

#[test]
fn test_columns_missing_from_schema_are_skipped() {
    let harness = Harness::new(BindOptions::default());
    let values = dictionary([("FullName", DbValue::string("Bob")), ("Extra", DbValue::from(1))]);
    let mut command = CommandParameters::new();
    let summary = harness
        .binder()
        .bind_parameters(
            &mut command,
            BindSource::Dictionary(&values),
            &person_schema(),
            &BindScope::default(),
        )
        .unwrap();

    assert_eq!(command.names(), vec!["FullName"]);
    assert_eq!(summary.get("Extra"), Some(&FieldBinding::Skipped));
}

#[test]
fn test_list_value_expands_like_in() {
    let harness = Harness::new(BindOptions::default());
    let values = dictionary([("Ids", DbValue::list([3, 4]))]);
    let mut command = CommandParameters::new();
    let summary = harness
        .binder()
        .bind_parameters(&mut command, BindSource::Dictionary(&values), &[], &BindScope::default())
        .unwrap();

    assert_eq!(command.names(), vec!["Ids_In_0", "Ids_In_1"]);
    assert_eq!(summary.array_parameters(), expand_array_parameters(&values).as_slice());
}

#[test]
fn test_nested_map_is_rejected() {
    let harness = Harness::new(BindOptions::default());
    let values = dictionary([("Address", DbValue::map([("City", "Oslo")]))]);
    let err = harness.bind(BindSource::Dictionary(&values), &[]).unwrap_err();
    assert_eq!(err.code(), DBB0301);
}

#[test]
fn test_skipped_nested_map_is_ignored() {
    let harness = Harness::new(BindOptions::default());
    let values = dictionary([
        ("Address", DbValue::map([("City", "Oslo")])),
        ("Age", DbValue::from(41)),
    ]);
    let mut command = CommandParameters::new();
    let summary = harness
        .binder()
        .bind_parameters(
            &mut command,
            BindSource::Dictionary(&values),
            &[],
            &BindScope::new().skip("address"),
        )
        .unwrap();

    assert_eq!(command.names(), vec!["Age"]);
    assert_eq!(summary.get("Address"), Some(&FieldBinding::Skipped));
}

#[rstest]
#[case::scalar(DbValue::from(5))]
#[case::list_of_maps(DbValue::List(vec![DbValue::map([("A", 1)])]))]
fn test_non_map_values_are_ambiguous(#[case] value: DbValue) {
    let harness = Harness::new(BindOptions::default());
    let err = harness.bind(BindSource::Value(&value), &[]).unwrap_err();
    assert_eq!(err.code(), DBB0302);
    assert_eq!(err.kind(), ErrorKind::Shape);
}

#[test]
fn test_json_object_binds_in_key_order() {
    let harness = Harness::new(BindOptions::default());
    let json = serde_json::json!({"Zeta": 1, "Alpha": "a"});
    let command = harness.bind(BindSource::Json(&json), &[]).unwrap();
    assert_eq!(command.names(), vec!["Zeta", "Alpha"]);
}

#[test]
fn test_type_handler_applies_to_dictionary_values() {
    let registry = MappingRegistry::new().with_type_handler(ValueType::String, Arc::new(UpperCase));
    let harness = Harness::with_registry(BindOptions::default(), registry);
    let values = dictionary([("Name", DbValue::string("bob")), ("Age", DbValue::from(3))]);
    let command = harness.bind(BindSource::Dictionary(&values), &[]).unwrap();

    assert_eq!(parameter(&command, "Name").value, DbValue::string("BOB"));
    assert_eq!(parameter(&command, "Age").value, DbValue::Int32(3));
}

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

fn mood(name: &str, value: i64) -> DbValue {
    EnumValue::new("Mood", name, value).into()
}

#[test]
fn test_enum_defaults_to_name_as_string() {
    let harness = Harness::new(BindOptions::default());
    let values = dictionary([("Mood", mood("Happy", 2))]);
    let command = harness.bind(BindSource::Dictionary(&values), &[]).unwrap();

    let parameter = parameter(&command, "Mood");
    assert_eq!(parameter.value, DbValue::string("Happy"));
    assert_eq!(parameter.db_type, Some(DbType::String));
}

#[test]
fn test_enum_default_type_is_configurable() {
    let harness = Harness::new(BindOptions::builder().enum_default_db_type(DbType::Int32).build());
    let values = dictionary([("Mood", mood("Happy", 2))]);
    let command = harness.bind(BindSource::Dictionary(&values), &[]).unwrap();

    let parameter = parameter(&command, "Mood");
    assert_eq!(parameter.value, DbValue::Int32(2));
    assert_eq!(parameter.db_type, Some(DbType::Int32));
}

#[rstest]
#[case::schema_native(
    DbField::new("Mood").with_database_type("smallint").with_provider(providers::SQL_SERVER),
    Some(DbType::Int16),
    DbValue::Int16(2)
)]
#[case::provider_fallback(
    DbField::new("Mood").with_provider(providers::SQLITE),
    Some(DbType::Int64),
    DbValue::Int64(2)
)]
#[case::postgres_user_defined(
    DbField::new("Mood").with_database_type("USER-DEFINED").with_provider(providers::POSTGRESQL),
    None,
    DbValue::string("Happy")
)]
fn test_enum_type_from_schema(
    #[case] column: DbField,
    #[case] db_type: Option<DbType>,
    #[case] value: DbValue,
) {
    let harness = Harness::new(BindOptions::default());
    let values = dictionary([("Mood", mood("Happy", 2))]);
    let command = harness
        .bind(BindSource::Dictionary(&values), &[column])
        .unwrap();

    let parameter = parameter(&command, "Mood");
    assert_eq!(parameter.db_type, db_type);
    assert_eq!(parameter.value, value);
}

// ----------------------------------------------------------------------------
// Entities
// ----------------------------------------------------------------------------

#[test]
fn test_entity_without_schema() {
    let harness = Harness::new(BindOptions::default());
    let command = harness.bind(BindSource::entity(&bob()), &[]).unwrap();

    assert_eq!(command.names(), vec!["Id", "FullName", "Status"]);
    assert_eq!(parameter(&command, "Id").db_type, Some(DbType::Int64));

    let name = parameter(&command, "FullName");
    assert_eq!(name.db_type, Some(DbType::AnsiString));
    assert_eq!(name.size, Some(50));

    assert_eq!(parameter(&command, "Status").value, DbValue::string("Active"));
}

#[test]
fn test_entity_against_schema() {
    let harness = Harness::new(BindOptions::default());
    let command = harness
        .bind(BindSource::entity(&bob()), &person_schema())
        .unwrap();

    let id = parameter(&command, "Id");
    assert_eq!(id.value, DbValue::Int32(7));
    assert_eq!(id.db_type, Some(DbType::Int32));

    // attribute beats the schema's nvarchar and size
    let name = parameter(&command, "FullName");
    assert_eq!(name.db_type, Some(DbType::AnsiString));
    assert_eq!(name.size, Some(50));

    let status = parameter(&command, "Status");
    assert_eq!(status.value, DbValue::Int32(1));
    assert_eq!(status.db_type, Some(DbType::Int32));
}

#[test]
fn test_scope_override_beats_attribute() {
    let harness = Harness::new(BindOptions::default());
    let scope = BindScope::new()
        .with_db_type("Name", DbType::StringFixedLength)
        .with_size("FullName", 10);
    let mut command = CommandParameters::new();
    harness
        .binder()
        .bind_entity(&mut command, &bob(), &person_schema(), &scope)
        .unwrap();

    let name = parameter(&command, "FullName");
    assert_eq!(name.db_type, Some(DbType::StringFixedLength));
    assert_eq!(name.size, Some(10));
}

#[test]
fn test_scope_skips_members() {
    let harness = Harness::new(BindOptions::default());
    let mut command = CommandParameters::new();
    let summary = harness
        .binder()
        .bind_entity(&mut command, &bob(), &[], &BindScope::new().skip_all(["Id", "status"]))
        .unwrap();

    assert_eq!(command.names(), vec!["FullName"]);
    assert_eq!(summary.get("Id"), Some(&FieldBinding::Skipped));
    assert_eq!(summary.get("Status"), Some(&FieldBinding::Skipped));
}

#[test]
fn test_entity_columns_missing_from_schema_are_skipped() {
    let harness = Harness::new(BindOptions::default());
    let schema = vec![DbField::new("Id")];
    let command = harness.bind(BindSource::entity(&bob()), &schema).unwrap();
    assert_eq!(command.names(), vec!["Id"]);
}

#[test]
fn test_member_handler_changes_bound_type() {
    let harness = Harness::new(BindOptions::default());
    let ticket = Ticket {
        token: Uuid::nil(),
        owner: "ann".to_string(),
    };
    let command = harness.bind(BindSource::entity(&ticket), &[]).unwrap();

    let token = parameter(&command, "Token");
    assert_eq!(token.value, DbValue::string("00000000000000000000000000000000"));
    assert_eq!(token.db_type, Some(DbType::String));
}

#[test]
fn test_attribute_renames_parameter_and_sets_direction() {
    let harness = Harness::new(BindOptions::default());
    let ticket = Ticket {
        token: Uuid::nil(),
        owner: "ann".to_string(),
    };
    let mut command = CommandParameters::new();
    let summary = harness
        .binder()
        .bind_entity(&mut command, &ticket, &[], &BindScope::default())
        .unwrap();

    let owner = parameter(&command, "p_owner");
    assert_eq!(owner.direction, ParameterDirection::InputOutput);
    assert!(matches!(
        summary.get("Owner"),
        Some(FieldBinding::Parameters(names)) if names.as_slice() == ["p_owner".to_string()]
    ));
}

#[test]
fn test_attribute_rename_ignored_for_update_prefixed_columns() {
    let harness = Harness::new(BindOptions::default());
    let claim = Claim {
        owner: "ann".to_string(),
        reviewer: "bob".to_string(),
    };
    let command = harness.bind(BindSource::entity(&claim), &[]).unwrap();

    assert_eq!(command.names(), vec!["_Owner", "@_Reviewer"]);
    assert_eq!(parameter(&command, "_Owner").value, DbValue::string("ann"));
}

// ----------------------------------------------------------------------------
// Qualifiers and updates
// ----------------------------------------------------------------------------

#[test]
fn test_qualifier_group_uses_identity_member() {
    let harness = Harness::new(BindOptions::default());
    let group = harness
        .binder()
        .qualifier_group(&bob(), &person_schema(), None)
        .unwrap();

    let fields = group.get_fields(true);
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].field().name(), "Id");
    assert_eq!(fields[0].value(), &DbValue::Int64(7));
}

#[test]
fn test_qualifier_group_with_explicit_fields() {
    let harness = Harness::new(BindOptions::default());
    let qualifiers = Field::from_names(["Name", "Status"]);
    let group = harness
        .binder()
        .qualifier_group(&bob(), &person_schema(), Some(&qualifiers))
        .unwrap();

    let names: Vec<&str> = group.get_fields(true).iter().map(|f| f.field().name()).collect();
    assert_eq!(names, vec!["FullName", "Status"]);
}

#[test]
fn test_qualifier_group_from_schema_primary() {
    let harness = Harness::new(BindOptions::default());
    let order = Order {
        code: "A-1".to_string(),
        total: 10,
    };
    let schema = vec![DbField::new("Code").primary(), DbField::new("Total")];
    let group = harness.binder().qualifier_group(&order, &schema, None).unwrap();
    assert_eq!(group.get_fields(true)[0].field().name(), "Code");
}

#[test]
fn test_qualifier_group_errors() {
    let harness = Harness::new(BindOptions::default());
    let binder = harness.binder();
    let note = Note {
        text: "hi".to_string(),
    };

    let err = binder.qualifier_group(&note, &[], None).unwrap_err();
    assert_eq!(err.code(), DBB0100);
    assert_eq!(err.kind(), ErrorKind::Schema);

    let err = binder.qualifier_group(&bob(), &[], Some(&[])).unwrap_err();
    assert_eq!(err.code(), DBB0101);

    let err = binder
        .qualifier_group(&bob(), &[DbField::new("FullName")], None)
        .unwrap_err();
    assert_eq!(err.code(), DBB0200);
}

#[test]
fn test_update_binds_set_and_where_together() {
    let harness = Harness::new(BindOptions::default());
    let binder = harness.binder();
    let person = bob();
    let schema = person_schema();
    let where_group = binder.qualifier_group(&person, &schema, None).unwrap();

    let mut command = CommandParameters::new();
    binder
        .bind_update(&mut command, &person, &where_group, &schema, &BindScope::new().skip("Id"))
        .unwrap();

    assert_eq!(command.names(), vec!["FullName", "Status", "_Id"]);
    assert_eq!(parameter(&command, "_Id").value, DbValue::Int32(7));
    // the caller's group keeps its names
    assert_eq!(where_group.get_fields(true)[0].parameter_name(), "Id");
}
