//! Tree node types

use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Folder nodes have children; file nodes correspond to leaf paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Folder,
    File,
}

/// Descriptive attribute metadata carried by a node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xdm_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

impl NodeMetadata {
    pub fn is_empty(&self) -> bool {
        self == &NodeMetadata::default()
    }

    /// Searchable text fields
    pub(crate) fn search_fields(&self) -> impl Iterator<Item = &str> {
        [
            &self.description,
            &self.data_owner,
            &self.data_source,
            &self.category,
            &self.xdm_path,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref())
    }
}

/// One input row for tree construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathEntry {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<NodeMetadata>,
}

impl PathEntry {
    pub fn new(path: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            path: path.into(),
            value,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: NodeMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Display tree node; owns its children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: NodeId,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    pub path: String,
    pub level: usize,
    #[serde(default)]
    pub is_expanded: bool,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(flatten)]
    pub metadata: NodeMetadata,
}

impl TreeNode {
    pub fn is_file(&self) -> bool {
        self.node_type == NodeType::File
    }

    /// Pre-order search for a descendant (or self) by id
    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Number of nodes in this subtree, including self
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::subtree_size).sum::<usize>()
    }

    /// Visit every node of the subtree in pre-order
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a TreeNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// A tree node without nested children, for id-indexed lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatTreeNode {
    pub id: NodeId,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    pub path: String,
    pub level: usize,
    #[serde(default)]
    pub is_expanded: bool,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(flatten)]
    pub metadata: NodeMetadata,
    pub children_ids: Vec<NodeId>,
}

impl FlatTreeNode {
    pub fn is_file(&self) -> bool {
        self.node_type == NodeType::File
    }
}

/// Insertion-ordered, id-indexed flat node map
#[derive(Debug, Clone, Default)]
pub struct FlatNodeMap {
    nodes: Vec<FlatTreeNode>,
    index: HashMap<NodeId, usize>,
}

impl FlatNodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, node: FlatTreeNode) {
        match self.index.get(&node.id) {
            Some(&i) => self.nodes[i] = node,
            None => {
                self.index.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&FlatTreeNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut FlatTreeNode> {
        match self.index.get(id) {
            Some(&i) => Some(&mut self.nodes[i]),
            None => None,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &FlatTreeNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Serialize for FlatNodeMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.nodes.len()))?;
        for node in &self.nodes {
            map.serialize_entry(&node.id, node)?;
        }
        map.end()
    }
}
