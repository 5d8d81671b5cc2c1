use attribute_explorer::extract::PathExtractor;
use attribute_explorer::mapping::seed::seed_table;
use attribute_explorer::mapping::table::MatchKind;
use attribute_explorer::pipeline::{build_mapped_tree, map_leaf_paths, PipelineOptions};
use attribute_explorer::tree::{NodeType, TreeState};
use serde_json::json;

use crate::integration::support::sample_profile;

#[test]
fn sample_profile_leaves_follow_document_order() {
    let profile = sample_profile();
    let paths: Vec<String> = PathExtractor::new(&profile).map(|l| l.joined()).collect();

    assert_eq!(paths.len(), 23);
    assert_eq!(paths[0], "person/name/firstname");
    assert_eq!(paths[1], "person/name/middlename");
    assert_eq!(paths.last().map(String::as_str), Some("loyalty/joindate"));
    // Array elements share their parent's path
    assert_eq!(
        paths.iter().filter(|p| *p == "contact/phone/number").count(),
        2
    );
    assert!(!paths.iter().any(|p| p.starts_with("preferences") || p.starts_with("tags")));
}

#[test]
fn every_sample_leaf_is_mapped() {
    let table = seed_table().unwrap();
    let mapped = map_leaf_paths(&sample_profile(), &table, &PipelineOptions::default());

    assert!(mapped.iter().all(|m| m.matched != MatchKind::Unmapped));

    let work_city = mapped
        .iter()
        .find(|m| m.raw_path == "address/work/city")
        .unwrap();
    assert_eq!(work_city.transformed_path, "userDetails/location/work/city");
    assert_eq!(
        work_city.matched,
        MatchKind::Prefix {
            mapping_id: 17,
            prefix: "address".to_string()
        }
    );
    assert_eq!(work_city.levels.level2, "location");
    assert_eq!(work_city.levels.level4, "city");
}

#[test]
fn containers_surface_as_unmapped_leaves() {
    let table = seed_table().unwrap();
    let options = PipelineOptions {
        include_containers: true,
        raw_paths: false,
    };
    let mapped = map_leaf_paths(&sample_profile(), &table, &options);
    let unmapped: Vec<&str> = mapped
        .iter()
        .filter(|m| m.matched == MatchKind::Unmapped)
        .map(|m| m.transformed_path.as_str())
        .collect();
    assert_eq!(unmapped, vec!["preferences", "tags"]);
}

#[test]
fn mapped_tree_groups_by_transformed_levels() {
    let table = seed_table().unwrap();
    let built = build_mapped_tree(&sample_profile(), &table, &PipelineOptions::default());
    let state = TreeState::from_built(built);

    let roots: Vec<&str> = state.tree().iter().map(|n| n.path.as_str()).collect();
    assert_eq!(roots, vec!["engagement", "preferences", "userDetails"]);

    let location = state.get_node_by_path("userDetails/location").unwrap();
    let children: Vec<&str> = state
        .get_node_children(&location.id)
        .iter()
        .map(|n| n.name.as_str())
        .collect();
    assert_eq!(children, vec!["Home Address", "Work"]);

    let first = state
        .get_node_by_path("userDetails/identity/firstName")
        .unwrap();
    assert_eq!(first.node_type, NodeType::File);
    assert_eq!(first.value, Some(json!("Ada")));
    assert_eq!(
        first.metadata.description.as_deref(),
        Some("Given name of the profile owner")
    );

    // First of the duplicated array leaves wins
    let phone = state
        .get_node_by_path("userDetails/contact/phone/mobile/number")
        .unwrap();
    assert_eq!(phone.value, Some(json!("555-0100")));

    let work_city = state
        .get_node_by_path("userDetails/location/work/city")
        .unwrap();
    assert!(work_city.metadata.description.is_none());
    assert_eq!(
        work_city.metadata.xdm_path.as_deref(),
        Some("userDetails/location/work/city")
    );
}

#[test]
fn raw_path_tree_keeps_source_layout() {
    let table = seed_table().unwrap();
    let options = PipelineOptions {
        include_containers: false,
        raw_paths: true,
    };
    let state = TreeState::from_built(build_mapped_tree(&sample_profile(), &table, &options));
    assert!(state.get_node_by_path("person/name/firstname").is_some());
    assert!(state.get_node_by_path("userDetails").is_none());
}

#[test]
fn flat_map_and_nested_tree_agree() {
    let table = seed_table().unwrap();
    let built = build_mapped_tree(&sample_profile(), &table, &PipelineOptions::default());

    let nested: usize = built.tree.iter().map(|n| n.subtree_size()).sum();
    assert_eq!(nested, built.node_count());

    for node in built.flat_nodes.iter() {
        match &node.parent_id {
            Some(parent) => {
                let parent = built.flat_nodes.get(parent).unwrap();
                assert!(parent.children_ids.contains(&node.id));
                assert_eq!(parent.level + 1, node.level);
            }
            None => assert_eq!(node.level, 0),
        }
    }
}
