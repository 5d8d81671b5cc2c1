use attribute_explorer::error::ApiError;
use attribute_explorer::mapping::seed::seed_table;
use attribute_explorer::mapping::{MappingEvent, MappingService, MappingTable, PathLevels};
use tempfile::TempDir;

#[test]
fn edited_table_survives_a_toml_save() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("mappings.toml");

    let mut table = seed_table().unwrap();
    table
        .add_mapping(
            "device/id",
            PathLevels::new("engagement", "device", "identifier", "", ""),
            Some("Hardware identifier".to_string()),
            None,
        )
        .unwrap();
    table.save_to_path(&path).unwrap();

    let reloaded = MappingTable::load_from_path(&path).unwrap();
    assert_eq!(reloaded.get_all_mappings(), table.get_all_mappings());
    assert_eq!(
        reloaded.resolve("device/id"),
        "engagement/device/identifier"
    );
}

#[test]
fn yaml_file_with_stale_transformed_path_is_repaired() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mappings.yaml");
    std::fs::write(
        &path,
        r#"
- id: 1
  rawPath: person/name/firstname
  transformedPath: somewhere/else
  levels:
    level1: userDetails
    level2: identity
    level3: firstName
"#,
    )
    .unwrap();

    let table = MappingTable::load_from_path(&path).unwrap();
    assert_eq!(
        table.resolve("person/name/firstname"),
        "userDetails/identity/firstName"
    );
}

#[test]
fn invalid_files_are_rejected() {
    let temp_dir = TempDir::new().unwrap();

    let csv = temp_dir.path().join("mappings.csv");
    std::fs::write(&csv, "id,rawPath").unwrap();
    assert!(matches!(
        MappingTable::load_from_path(&csv),
        Err(ApiError::UnsupportedFormat(_))
    ));

    let duplicate = temp_dir.path().join("dup.json");
    std::fs::write(
        &duplicate,
        r#"[
            {"id": 1, "rawPath": "a", "levels": {"level1": "x"}},
            {"id": 1, "rawPath": "b", "levels": {"level1": "y"}}
        ]"#,
    )
    .unwrap();
    assert!(matches!(
        MappingTable::load_from_path(&duplicate),
        Err(ApiError::InvalidMappingTable(_))
    ));
}

#[test]
fn service_snapshots_are_isolated_from_later_edits() {
    let mut service = MappingService::seeded().unwrap();
    let events = service.events().subscribe_channel();
    let before = service.snapshot();

    let updated = service
        .update_mapping(
            21,
            PathLevels::new("engagement", "rewards", "tier", "", ""),
        )
        .unwrap();
    assert_eq!(updated.transformed_path, "engagement/rewards/tier");

    assert_eq!(before.resolve("loyalty/tier"), "engagement/loyalty/program/tier");
    assert_eq!(service.resolve("loyalty/tier"), "engagement/rewards/tier");

    let envelope = events.try_recv().unwrap();
    match envelope.event {
        MappingEvent::Updated { before, after } => {
            assert_eq!(before.id, 21);
            assert_eq!(after.transformed_path, "engagement/rewards/tier");
        }
        other => panic!("unexpected event: {:?}", other),
    }
    assert!(events.try_recv().is_err());
}
