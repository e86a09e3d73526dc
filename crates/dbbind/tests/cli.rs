//! CLI command tests against files on disk

use dbbind::cli::bind::{BindConfig, run};
use dbbind::cli::field::{FieldConfig, lookup};
use dbbind::{DbType, DbValue};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use std::io::Write;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};

const SCHEMA: &str = r#"{
    "People": [
        {"name": "Id", "databaseType": "int", "provider": "MSSQL", "isIdentity": true},
        {"name": "Name", "databaseType": "nvarchar(100)", "size": 100, "provider": "MSSQL"},
        {"name": "Age", "databaseType": "int", "provider": "MSSQL"},
        {"name": "Status", "databaseType": "varchar(10)", "provider": "MSSQL"}
    ]
}"#;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[fixture]
fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_file(&dir, "schema.json", SCHEMA);
    dir
}

fn config(dir: &TempDir, source: &str, filter: bool) -> BindConfig {
    BindConfig {
        schema: dir.path().join("schema.json"),
        table: None,
        source: write_file(dir, "source.json", source),
        filter,
        automatic: false,
        options: None,
        skip: Vec::new(),
        verbose: false,
        output_format: None,
        output_file: None,
    }
}

#[rstest]
fn test_bind_object_source(workspace: TempDir) {
    let config = config(&workspace, r#"{"Id": "12", "Name": "Bob", "Extra": 1}"#, false);
    let outcome = run(&config).unwrap();

    assert_eq!(outcome.command.names(), vec!["Id", "Name"]);
    // identity column converts even without --automatic
    let id = outcome.command.get("Id").unwrap();
    assert_eq!(id.value, DbValue::Int32(12));
    assert_eq!(id.db_type, Some(DbType::Int32));
    assert_eq!(outcome.command.get("Name").unwrap().size, Some(100));
}

#[rstest]
fn test_automatic_flag_converts_plain_columns(workspace: TempDir) {
    let mut config = config(&workspace, r#"{"Age": "41"}"#, false);
    assert_eq!(
        run(&config).unwrap().command.get("Age").unwrap().value,
        DbValue::string("41")
    );

    config.automatic = true;
    assert_eq!(
        run(&config).unwrap().command.get("Age").unwrap().value,
        DbValue::Int32(41)
    );
}

#[rstest]
fn test_options_file_sets_prefix(workspace: TempDir) {
    let mut config = config(&workspace, r#"{"Age": 41}"#, false);
    config.options = Some(write_file(
        &workspace,
        "options.json",
        r#"{"parameterPrefix": "@"}"#,
    ));
    assert_eq!(run(&config).unwrap().command.names(), vec!["@Age"]);
}

#[rstest]
fn test_bind_filter_source(workspace: TempDir) {
    let filter = r#"[
        {"field": "Age", "operation": "GreaterThan", "value": 30},
        {"field": "Status", "operation": "In", "value": ["A", "B"]},
        {"field": "Name", "value": null}
    ]"#;
    let outcome = run(&config(&workspace, filter, true)).unwrap();

    assert_eq!(
        outcome.command.names(),
        vec!["Age", "Status_In_0", "Status_In_1"]
    );
    assert_eq!(
        outcome.command.get("Status_In_1").unwrap().db_type,
        Some(DbType::AnsiString)
    );

    let json = outcome.to_json().unwrap();
    assert_eq!(json["parameters"].as_array().map(Vec::len), Some(3));
}

#[rstest]
fn test_filter_on_unknown_column_fails(workspace: TempDir) {
    let filter = r#"{"field": "Nickname", "value": "Bobby"}"#;
    let err = run(&config(&workspace, filter, true)).unwrap_err();
    let err = err.downcast::<dbbind::DbBindError>().unwrap();
    assert_eq!(err.code(), dbbind::diagnostics::DBB0200);
}

#[rstest]
fn test_scalar_source_is_rejected(workspace: TempDir) {
    assert!(run(&config(&workspace, "42", false)).is_err());
}

#[rstest]
#[case::plain("age", "Age")]
#[case::prefixed("@Status", "Status")]
#[case::expanded("Status_In_4", "Status")]
fn test_field_lookup(workspace: TempDir, #[case] name: &str, #[case] expected: &str) {
    let config = FieldConfig {
        name: name.to_string(),
        schema: workspace.path().join("schema.json"),
        table: Some("people".to_string()),
        output_file: None,
    };
    assert_eq!(lookup(&config).unwrap().name, expected);
}

#[test]
fn test_schema_with_several_tables_needs_table() {
    let mut schema = NamedTempFile::new().unwrap();
    schema
        .write_all(br#"{"A": [{"name": "Id"}], "B": [{"name": "Id"}]}"#)
        .unwrap();
    let config = FieldConfig {
        name: "Id".to_string(),
        schema: schema.path().to_path_buf(),
        table: None,
        output_file: None,
    };
    let err = lookup(&config).unwrap_err();
    assert!(err.to_string().contains("--table"));
}
