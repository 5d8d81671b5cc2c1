//! Raw object to display tree: extract leaf paths, map them, build the tree.

use crate::extract::PathExtractor;
use crate::mapping::table::{MatchKind, MappingTable};
use crate::mapping::{split_into_levels, PathLevels};
use crate::tree::{build_tree_from_paths, BuiltTree, NodeMetadata, PathEntry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Pipeline switches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Yield empty objects/arrays as leaves
    #[serde(default)]
    pub include_containers: bool,
    /// Skip the mapping step and build the tree over raw paths
    #[serde(default)]
    pub raw_paths: bool,
}

/// A leaf path with its mapped counterpart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedPath {
    pub raw_path: String,
    pub transformed_path: String,
    pub levels: PathLevels,
    pub matched: MatchKind,
    pub value: Value,
}

/// Extract and map every leaf of `raw`
pub fn map_leaf_paths(raw: &Value, table: &MappingTable, options: &PipelineOptions) -> Vec<MappedPath> {
    PathExtractor::new(raw)
        .include_containers(options.include_containers)
        .map(|leaf| {
            let raw_path = leaf.joined();
            let resolution = table.resolve_detailed(&raw_path);
            MappedPath {
                levels: split_into_levels(&resolution.transformed_path),
                raw_path,
                transformed_path: resolution.transformed_path,
                matched: resolution.matched,
                value: leaf.value.clone(),
            }
        })
        .collect()
}

/// Tree input rows for mapped paths, carrying mapping metadata on matched leaves
pub fn mapped_entries(mapped: &[MappedPath], table: &MappingTable, raw_paths: bool) -> Vec<PathEntry> {
    mapped
        .iter()
        .map(|m| {
            let path = if raw_paths {
                m.raw_path.clone()
            } else {
                m.transformed_path.clone()
            };
            let entry = PathEntry::new(path, Some(m.value.clone()));
            match mapping_metadata(m, table) {
                Some(metadata) => entry.with_metadata(metadata),
                None => entry,
            }
        })
        .collect()
}

/// Run the full pipeline over a raw object
pub fn build_mapped_tree(raw: &Value, table: &MappingTable, options: &PipelineOptions) -> BuiltTree {
    let mapped = map_leaf_paths(raw, table, options);
    let unmapped = mapped
        .iter()
        .filter(|m| m.matched == MatchKind::Unmapped)
        .count();
    debug!(
        leaves = mapped.len(),
        unmapped,
        raw_paths = options.raw_paths,
        "Mapped leaf paths"
    );
    build_tree_from_paths(mapped_entries(&mapped, table, options.raw_paths))
}

fn mapping_metadata(mapped: &MappedPath, table: &MappingTable) -> Option<NodeMetadata> {
    let mapping_id = match &mapped.matched {
        MatchKind::Exact { mapping_id } => *mapping_id,
        MatchKind::Prefix { mapping_id, .. } => *mapping_id,
        MatchKind::Unmapped => return None,
    };
    let mapping = table.get(mapping_id)?;
    let exact = matches!(mapped.matched, MatchKind::Exact { .. });
    Some(NodeMetadata {
        description: if exact { mapping.description.clone() } else { None },
        data_type: if exact { mapping.data_type.clone() } else { None },
        xdm_path: Some(mapped.transformed_path.clone()),
        ..Default::default()
    })
}
