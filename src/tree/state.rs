//! TreeState: caller-owned tree with lookup, search and per-node flags.

use super::builder::{build_tree_from_paths, BuiltTree};
use super::node::{FlatNodeMap, FlatTreeNode, PathEntry, TreeNode};
use crate::events::EventBus;
use crate::types::NodeId;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

/// Tree change notification
#[derive(Debug, Clone, PartialEq)]
pub enum TreeEvent {
    /// The tree was rebuilt from a new path list
    Built { nodes: usize, roots: usize },
    SelectionChanged { id: NodeId, selected: bool },
    ExpansionChanged { id: NodeId, expanded: bool },
}

#[derive(Default)]
pub struct TreeState {
    built: BuiltTree,
    by_path: HashMap<String, NodeId>,
    events: EventBus<TreeEvent>,
}

impl TreeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from entries, replacing any previous tree
    pub fn from_entries(entries: Vec<PathEntry>) -> Self {
        let mut state = Self::new();
        state.load(entries);
        state
    }

    /// Wrap an already built tree
    pub fn from_built(built: BuiltTree) -> Self {
        let mut state = Self::new();
        state.install(built);
        state
    }

    /// Rebuild from entries. The previous tree and flat map are discarded.
    pub fn load(&mut self, entries: Vec<PathEntry>) {
        self.install(build_tree_from_paths(entries));
    }

    fn install(&mut self, built: BuiltTree) {
        self.built = built;
        self.by_path = self
            .built
            .flat_nodes
            .iter()
            .map(|n| (n.path.clone(), n.id.clone()))
            .collect();
        let nodes = self.built.node_count();
        let roots = self.built.tree.len();
        info!(nodes, roots, "Tree loaded");
        self.events.publish(TreeEvent::Built { nodes, roots });
    }

    pub fn events(&mut self) -> &mut EventBus<TreeEvent> {
        &mut self.events
    }

    pub fn tree(&self) -> &[TreeNode] {
        &self.built.tree
    }

    pub fn flat_nodes(&self) -> &FlatNodeMap {
        &self.built.flat_nodes
    }

    pub fn built(&self) -> &BuiltTree {
        &self.built
    }

    pub fn get_node_by_id(&self, id: &str) -> Option<&FlatTreeNode> {
        self.built.flat_nodes.get(id)
    }

    pub fn get_node_by_path(&self, path: &str) -> Option<&FlatTreeNode> {
        let id = self.by_path.get(path)?;
        self.built.flat_nodes.get(id)
    }

    /// Direct children of a node; empty for files and unknown ids
    pub fn get_node_children(&self, id: &str) -> Vec<&FlatTreeNode> {
        match self.built.flat_nodes.get(id) {
            Some(node) => node
                .children_ids
                .iter()
                .filter_map(|child| self.built.flat_nodes.get(child))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Case-insensitive substring search over names, values and metadata.
    ///
    /// Results follow flat-map insertion order. A blank query matches nothing.
    pub fn search_tree(&self, query: &str) -> Vec<&FlatTreeNode> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.built
            .flat_nodes
            .iter()
            .filter(|node| node_matches(node, &needle))
            .collect()
    }

    /// Toggle a node's selection; returns the new state
    pub fn select_node(&mut self, id: &str) -> Option<bool> {
        let selected = !self.built.flat_nodes.get(id)?.is_selected;
        self.set_selected(id, selected)
    }

    pub fn set_selected(&mut self, id: &str, selected: bool) -> Option<bool> {
        self.built.flat_nodes.get_mut(id)?.is_selected = selected;
        if let Some(node) = self.nested_mut(id) {
            node.is_selected = selected;
        }
        debug!(id, selected, "Node selection changed");
        self.events.publish(TreeEvent::SelectionChanged {
            id: id.to_string(),
            selected,
        });
        Some(selected)
    }

    pub fn expand_node(&mut self, id: &str) -> Option<bool> {
        self.set_expanded(id, true)
    }

    pub fn collapse_node(&mut self, id: &str) -> Option<bool> {
        self.set_expanded(id, false)
    }

    /// Ids of selected nodes in insertion order
    pub fn selected_ids(&self) -> Vec<&str> {
        self.built
            .flat_nodes
            .iter()
            .filter(|n| n.is_selected)
            .map(|n| n.id.as_str())
            .collect()
    }

    fn set_expanded(&mut self, id: &str, expanded: bool) -> Option<bool> {
        self.built.flat_nodes.get_mut(id)?.is_expanded = expanded;
        if let Some(node) = self.nested_mut(id) {
            node.is_expanded = expanded;
        }
        debug!(id, expanded, "Node expansion changed");
        self.events.publish(TreeEvent::ExpansionChanged {
            id: id.to_string(),
            expanded,
        });
        Some(expanded)
    }

    /// Locate the owned tree node by following the parent chain from the flat map
    fn nested_mut(&mut self, id: &str) -> Option<&mut TreeNode> {
        let mut chain: Vec<NodeId> = Vec::new();
        let mut current = Some(id.to_string());
        while let Some(node_id) = current {
            current = self.built.flat_nodes.get(&node_id)?.parent_id.clone();
            chain.push(node_id);
        }
        chain.reverse();

        let mut ids = chain.iter();
        let root_id = ids.next()?;
        let mut node = self.built.tree.iter_mut().find(|n| &n.id == root_id)?;
        for next_id in ids {
            node = node.children.iter_mut().find(|n| &n.id == next_id)?;
        }
        Some(node)
    }
}

fn node_matches(node: &FlatTreeNode, needle: &str) -> bool {
    if node.name.to_lowercase().contains(needle) {
        return true;
    }
    if let Some(value) = &node.value {
        if stringify_value(value).to_lowercase().contains(needle) {
            return true;
        }
    }
    node.metadata
        .search_fields()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Strings render bare; other values use their JSON text
pub(crate) fn stringify_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
