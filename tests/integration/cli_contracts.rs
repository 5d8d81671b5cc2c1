use attribute_explorer::config::{AppConfig, MappingsConfig};
use attribute_explorer::error::ApiError;
use attribute_explorer::mapping::{Level, MappingTable};
use attribute_explorer::tooling::cli::{CliContext, Commands, LevelArgs, MappingCommands};
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::integration::support::{data_file, seeded_context};

fn parse(output: &str) -> Value {
    serde_json::from_str(output).unwrap()
}

#[test]
fn extract_json_lists_segments_and_values() {
    let temp_dir = TempDir::new().unwrap();
    let mut cli = seeded_context(&temp_dir);

    let output = cli
        .execute(&Commands::Extract {
            input: data_file("sample_profile.json"),
            include_containers: false,
            format: "json".to_string(),
        })
        .unwrap();

    let leaves = parse(&output);
    let leaves = leaves.as_array().unwrap();
    assert_eq!(leaves.len(), 23);
    assert_eq!(
        leaves[0]["segments"],
        serde_json::json!(["person", "name", "firstname"])
    );
    assert_eq!(leaves[0]["value"], "Ada");
    assert!(leaves[1]["value"].is_null());
}

#[test]
fn resolve_json_reports_match_kind() {
    let temp_dir = TempDir::new().unwrap();
    let mut cli = seeded_context(&temp_dir);

    let output = cli
        .execute(&Commands::Resolve {
            raw_paths: vec![
                "contact/email/domain".to_string(),
                "contact/email/alias".to_string(),
                "contact/emailx".to_string(),
            ],
            format: "json".to_string(),
        })
        .unwrap();

    let resolutions = parse(&output);
    assert_eq!(
        resolutions[0]["transformedPath"],
        "userDetails/contact/email/primary/emailDomain"
    );
    assert_eq!(resolutions[0]["matched"]["kind"], "exact");
    assert_eq!(resolutions[0]["matched"]["mappingId"], 8);

    assert_eq!(
        resolutions[1]["transformedPath"],
        "userDetails/contact/email/other/alias"
    );
    assert_eq!(resolutions[1]["matched"]["kind"], "prefix");
    assert_eq!(resolutions[1]["matched"]["prefix"], "contact/email");

    // Prefixes only match on whole segments
    assert_eq!(resolutions[2]["transformedPath"], "contact/emailx");
    assert_eq!(resolutions[2]["matched"]["kind"], "unmapped");
}

#[test]
fn levels_json_has_all_five_levels() {
    let temp_dir = TempDir::new().unwrap();
    let mut cli = seeded_context(&temp_dir);

    let output = cli
        .execute(&Commands::Levels {
            path: "a/b/c/d/e/f/g".to_string(),
            format: "json".to_string(),
        })
        .unwrap();

    let levels = parse(&output);
    assert_eq!(levels["level1"], "a");
    assert_eq!(levels["level4"], "d");
    assert_eq!(levels["level5"], "e/f/g");
}

#[test]
fn mapping_list_and_values_contracts() {
    let temp_dir = TempDir::new().unwrap();
    let mut cli = seeded_context(&temp_dir);

    let output = cli
        .execute(&Commands::Mappings {
            command: MappingCommands::List {
                format: "json".to_string(),
            },
        })
        .unwrap();
    let mappings = parse(&output);
    let mappings = mappings.as_array().unwrap();
    assert_eq!(mappings.len(), 25);
    for mapping in mappings {
        assert!(mapping.get("id").and_then(Value::as_u64).is_some());
        assert!(mapping.get("rawPath").and_then(Value::as_str).is_some());
        assert!(mapping.get("transformedPath").and_then(Value::as_str).is_some());
        assert!(mapping.get("levels").and_then(Value::as_object).is_some());
    }

    let output = cli
        .execute(&Commands::Mappings {
            command: MappingCommands::Values {
                level: Level::Level1,
                format: "json".to_string(),
            },
        })
        .unwrap();
    let values = parse(&output);
    assert_eq!(values["level"], "level1");
    assert_eq!(
        values["values"],
        serde_json::json!(["engagement", "preferences", "userDetails"])
    );
}

#[test]
fn update_requires_levels_and_known_id() {
    let temp_dir = TempDir::new().unwrap();
    let mut cli = seeded_context(&temp_dir);

    let err = cli
        .execute(&Commands::Mappings {
            command: MappingCommands::Update {
                id: 1,
                levels: LevelArgs::default(),
                save: false,
            },
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let err = cli
        .execute(&Commands::Mappings {
            command: MappingCommands::Update {
                id: 999,
                levels: LevelArgs {
                    level1: Some("x".to_string()),
                    ..Default::default()
                },
                save: false,
            },
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::MappingNotFound(_)));
}

#[test]
fn update_changes_resolution_for_following_commands() {
    let temp_dir = TempDir::new().unwrap();
    let mut cli = seeded_context(&temp_dir);

    cli.execute(&Commands::Mappings {
        command: MappingCommands::Update {
            id: 6,
            levels: LevelArgs {
                level2: Some("person".to_string()),
                ..Default::default()
            },
            save: false,
        },
    })
    .unwrap();

    assert_eq!(
        cli.mappings().resolve("person/nickname"),
        "userDetails/person/nickname"
    );
    assert_eq!(cli.mappings().resolve("person/gender"), "userDetails/identity/gender");
}

#[test]
fn add_with_save_writes_configured_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = AppConfig {
        mappings: MappingsConfig {
            path: Some(PathBuf::from("maps/mappings.yaml")),
        },
        ..Default::default()
    };
    let mappings_path = temp_dir.path().join("maps/mappings.yaml");
    attribute_explorer::mapping::seed::seed_table()
        .unwrap()
        .save_to_path(&mappings_path)
        .unwrap();

    let mut cli = CliContext::with_config(temp_dir.path().to_path_buf(), config).unwrap();
    let output = cli
        .execute(&Commands::Mappings {
            command: MappingCommands::Add {
                raw_path: "device/browser".to_string(),
                transformed: Some("engagement/device/browser/name".to_string()),
                levels: LevelArgs::default(),
                description: Some("Browser family".to_string()),
                data_type: Some("string".to_string()),
                save: true,
            },
        })
        .unwrap();
    assert!(output.contains("Added mapping #26"));
    assert!(output.contains("Saved to"));

    let saved = MappingTable::load_from_path(&mappings_path).unwrap();
    assert_eq!(saved.len(), 26);
    let added = saved.get_by_raw_path("device/browser").unwrap();
    assert_eq!(added.id, 26);
    assert_eq!(added.levels.level4, "name");
    assert_eq!(added.description.as_deref(), Some("Browser family"));

    let err = cli
        .execute(&Commands::Mappings {
            command: MappingCommands::Add {
                raw_path: "device/browser".to_string(),
                transformed: Some("elsewhere".to_string()),
                levels: LevelArgs::default(),
                description: None,
                data_type: None,
                save: false,
            },
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[test]
fn save_without_configured_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut cli = seeded_context(&temp_dir);

    let err = cli
        .execute(&Commands::Mappings {
            command: MappingCommands::Add {
                raw_path: "device/browser".to_string(),
                transformed: Some("engagement/device/browser".to_string()),
                levels: LevelArgs::default(),
                description: None,
                data_type: None,
                save: true,
            },
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::ConfigError(_)));
}

#[test]
fn tree_json_contract_has_tree_and_flat_nodes() {
    let temp_dir = TempDir::new().unwrap();
    let mut cli = seeded_context(&temp_dir);

    let output = cli
        .execute(&Commands::Tree {
            input: data_file("sample_profile.json"),
            raw: false,
            include_containers: false,
            search: None,
            format: "json".to_string(),
        })
        .unwrap();

    let parsed = parse(&output);
    let roots = parsed["tree"].as_array().unwrap();
    assert_eq!(roots.len(), 3);
    assert_eq!(roots[0]["type"], "folder");
    assert_eq!(roots[0]["name"], "Engagement");

    let flat = parsed["flatNodes"].as_object().unwrap();
    assert!(!flat.is_empty());
    let first_id = flat.keys().next().unwrap();
    assert_eq!(first_id, "node_1");
    for (id, node) in flat {
        assert_eq!(node["id"].as_str(), Some(id.as_str()));
        assert!(node["childrenIds"].is_array());
        assert!(node["path"].is_string());
    }
}

#[test]
fn tree_search_text_lists_matches() {
    let temp_dir = TempDir::new().unwrap();
    let mut cli = seeded_context(&temp_dir);

    let output = cli
        .execute(&Commands::Tree {
            input: data_file("sample_profile.json"),
            raw: false,
            include_containers: false,
            search: Some("lovelace".to_string()),
            format: "text".to_string(),
        })
        .unwrap();
    assert!(output.contains("userDetails/identity/lastName"));
    assert!(output.contains("Total: 1"));
}

#[test]
fn catalog_search_finds_metadata_matches() {
    let temp_dir = TempDir::new().unwrap();
    let mut cli = seeded_context(&temp_dir);

    let output = cli
        .execute(&Commands::Catalog {
            input: data_file("sample_catalog.json"),
            search: Some("growth".to_string()),
            format: "json".to_string(),
        })
        .unwrap();

    let matches = parse(&output);
    let paths: Vec<&str> = matches
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["path"].as_str().unwrap())
        .collect();
    assert_eq!(
        paths,
        vec![
            "userDetails/contact/email/primary/emailDomain",
            "userDetails/contact/email/primary/emailValidFlag",
        ]
    );
    assert_eq!(matches[0]["dataOwner"], "Growth Team");
}

#[test]
fn catalog_tree_places_uncategorised_paths_by_category() {
    let temp_dir = TempDir::new().unwrap();
    let mut cli = seeded_context(&temp_dir);

    let output = cli
        .execute(&Commands::Catalog {
            input: data_file("sample_catalog.json"),
            search: None,
            format: "json".to_string(),
        })
        .unwrap();

    let parsed = parse(&output);
    let paths: Vec<&str> = parsed["flatNodes"]
        .as_object()
        .unwrap()
        .values()
        .map(|n| n["path"].as_str().unwrap())
        .collect();
    assert!(paths.contains(&"Modeled/churn_score"));
    assert!(paths.contains(&"engagement/loyalty/program/tier"));
    assert!(paths.contains(&"userDetails/identity/firstName"));
}

#[test]
fn unknown_output_format_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut cli = seeded_context(&temp_dir);

    let err = cli
        .execute(&Commands::Levels {
            path: "a/b".to_string(),
            format: "xml".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[test]
fn missing_input_reports_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut cli = seeded_context(&temp_dir);

    let err = cli
        .execute(&Commands::Extract {
            input: temp_dir.path().join("absent.json"),
            include_containers: false,
            format: "text".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::Io { .. }));
}
