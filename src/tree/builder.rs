//! Tree construction from flat path lists.
//!
//! Entries are sorted by path, then each `/`-separated prefix becomes one node:
//! intermediate prefixes are folders, the final segment is a file. Nodes are
//! assembled in an arena keyed by full prefix and materialized into an owned
//! tree plus an insertion-ordered flat map.

use super::node::{FlatNodeMap, FlatTreeNode, NodeMetadata, NodeType, PathEntry, TreeNode};
use crate::types::{NodeId, PATH_SEPARATOR};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Result of tree construction
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltTree {
    pub tree: Vec<TreeNode>,
    pub flat_nodes: FlatNodeMap,
}

impl BuiltTree {
    pub fn node_count(&self) -> usize {
        self.flat_nodes.len()
    }
}

struct ArenaNode {
    id: NodeId,
    segment: String,
    path: String,
    level: usize,
    node_type: NodeType,
    value: Option<Value>,
    metadata: NodeMetadata,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Build a tree and flat node map from `(path, value, metadata)` entries.
///
/// Repeated identical paths keep the first value; a leaf that later gains
/// children becomes a folder.
pub fn build_tree_from_paths(mut entries: Vec<PathEntry>) -> BuiltTree {
    entries.sort_by(|a, b| a.path.cmp(&b.path));

    let mut arena: Vec<ArenaNode> = Vec::new();
    let mut roots: Vec<usize> = Vec::new();
    let mut by_path: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let segments: Vec<&str> = entry
            .path
            .split(PATH_SEPARATOR)
            .filter(|s| !s.is_empty())
            .collect();
        if segments.is_empty() {
            debug!(path = %entry.path, "Skipping entry with empty path");
            continue;
        }

        let last = segments.len() - 1;
        let mut prefix = String::new();
        let mut parent: Option<usize> = None;
        let mut value = entry.value;
        let mut metadata = entry.metadata;

        for (depth, segment) in segments.iter().enumerate() {
            if depth > 0 {
                prefix.push(PATH_SEPARATOR);
            }
            prefix.push_str(segment);
            let is_final = depth == last;

            let index = match by_path.get(&prefix) {
                Some(&existing) => {
                    let node = &mut arena[existing];
                    if is_final {
                        if node.value.is_none() {
                            node.value = value.take();
                        }
                        if node.metadata.is_empty() {
                            if let Some(meta) = metadata.take() {
                                node.metadata = meta;
                            }
                        }
                    } else if node.node_type == NodeType::File {
                        node.node_type = NodeType::Folder;
                    }
                    existing
                }
                None => {
                    let index = arena.len();
                    arena.push(ArenaNode {
                        id: format!("node_{}", index + 1),
                        segment: segment.to_string(),
                        path: prefix.clone(),
                        level: depth,
                        node_type: if is_final {
                            NodeType::File
                        } else {
                            NodeType::Folder
                        },
                        value: if is_final { value.take() } else { None },
                        metadata: if is_final {
                            metadata.take().unwrap_or_default()
                        } else {
                            NodeMetadata::default()
                        },
                        parent,
                        children: Vec::new(),
                    });
                    match parent {
                        Some(p) => arena[p].children.push(index),
                        None => roots.push(index),
                    }
                    by_path.insert(prefix.clone(), index);
                    index
                }
            };
            parent = Some(index);
        }
    }

    let tree: Vec<TreeNode> = roots.iter().map(|&i| materialize(&arena, i)).collect();

    let mut flat_nodes = FlatNodeMap::new();
    for node in &arena {
        flat_nodes.insert(FlatTreeNode {
            id: node.id.clone(),
            name: format_name(&node.segment),
            node_type: node.node_type,
            value: node.value.clone(),
            parent_id: node.parent.map(|p| arena[p].id.clone()),
            path: node.path.clone(),
            level: node.level,
            is_expanded: false,
            is_selected: false,
            metadata: node.metadata.clone(),
            children_ids: node.children.iter().map(|&c| arena[c].id.clone()).collect(),
        });
    }

    debug!(
        nodes = flat_nodes.len(),
        roots = tree.len(),
        "Built tree from paths"
    );
    BuiltTree { tree, flat_nodes }
}

fn materialize(arena: &[ArenaNode], index: usize) -> TreeNode {
    let node = &arena[index];
    TreeNode {
        id: node.id.clone(),
        name: format_name(&node.segment),
        node_type: node.node_type,
        value: node.value.clone(),
        children: node
            .children
            .iter()
            .map(|&c| materialize(arena, c))
            .collect(),
        parent_id: node.parent.map(|p| arena[p].id.clone()),
        path: node.path.clone(),
        level: node.level,
        is_expanded: false,
        is_selected: false,
        metadata: node.metadata.clone(),
    }
}

/// Human-readable label for a raw key.
///
/// Inserts a space before each internal capital, treats underscores as word
/// breaks and capitalizes every word: `emailValidFlag` becomes
/// "Email Valid Flag".
pub fn format_name(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if ch == '_' {
            spaced.push(' ');
            continue;
        }
        if i > 0 && ch.is_uppercase() {
            spaced.push(' ');
        }
        spaced.push(ch);
    }
    spaced
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
