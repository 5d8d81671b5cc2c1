//! Core identifier types shared across the mapping table and the tree.

/// NodeId: Identifier of a tree node, unique within one built tree
pub type NodeId = String;

/// MappingId: Identifier of a path mapping, unique within a mapping table
pub type MappingId = u32;

/// Separator between the segments of raw and transformed paths
pub const PATH_SEPARATOR: char = '/';
