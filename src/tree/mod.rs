//! Display Tree
//!
//! Hierarchical folder/file view reconstructed from flat path lists, with an
//! id-indexed flat map for constant-time lookup.

pub mod builder;
pub mod node;
pub mod state;

pub use builder::{build_tree_from_paths, format_name, BuiltTree};
pub use node::{FlatNodeMap, FlatTreeNode, NodeMetadata, NodeType, PathEntry, TreeNode};
pub use state::{TreeEvent, TreeState};
