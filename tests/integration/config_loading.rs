use attribute_explorer::config::ConfigLoader;
use attribute_explorer::error::ApiError;
use attribute_explorer::mapping::{MappingTable, PathLevels, PathMapping};
use attribute_explorer::tooling::cli::CliContext;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn workspace_file_sets_tree_and_mapping_options() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("attrx.toml"),
        r#"
[mappings]
path = "mappings.json"

[tree]
raw_paths = true

[logging]
level = "warn"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load(temp_dir.path()).unwrap();
    assert!(config.tree.raw_paths);
    assert!(!config.tree.include_containers);
    assert_eq!(config.mappings.path, Some(PathBuf::from("mappings.json")));
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format, "text");
}

#[test]
fn explicit_config_file_must_exist() {
    let temp_dir = TempDir::new().unwrap();
    let err = ConfigLoader::load_from_file(&temp_dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ApiError::ConfigError(_)));
}

#[test]
fn explicit_config_file_is_used_alone() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom.toml");
    fs::write(&path, "[tree]\ninclude_containers = true\n").unwrap();

    let config = ConfigLoader::load_from_file(&path).unwrap();
    assert!(config.tree.include_containers);
    assert!(config.mappings.path.is_none());
    assert!(config.logging.enabled);
}

#[test]
fn context_loads_the_configured_mapping_table() {
    let temp_dir = TempDir::new().unwrap();
    let table = MappingTable::from_mappings(vec![PathMapping::new(
        1,
        "crm/email",
        PathLevels::new("userDetails", "contact", "email", "", ""),
    )])
    .unwrap();
    table
        .save_to_path(&temp_dir.path().join("tables/crm.json"))
        .unwrap();
    fs::write(
        temp_dir.path().join("attrx.toml"),
        "[mappings]\npath = \"tables/crm.json\"\n",
    )
    .unwrap();

    let cli = CliContext::new(temp_dir.path().to_path_buf(), None).unwrap();
    assert_eq!(cli.mappings().get_all_mappings().len(), 1);
    assert_eq!(
        cli.mappings().resolve("crm/email/verified"),
        "userDetails/contact/email/verified"
    );
    assert_eq!(
        cli.config().mappings.path,
        Some(PathBuf::from("tables/crm.json"))
    );
}

#[test]
fn broken_mapping_file_fails_context_creation() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("bad.json"), "[{\"id\": 1}]").unwrap();
    fs::write(
        temp_dir.path().join("attrx.toml"),
        "[mappings]\npath = \"bad.json\"\n",
    )
    .unwrap();

    let result = CliContext::new(temp_dir.path().to_path_buf(), None);
    assert!(matches!(result, Err(ApiError::Parse { .. })));
}
