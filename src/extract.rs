//! Path Extraction
//!
//! Walks a nested JSON value and lazily yields every leaf path as an ordered
//! list of keys. Arrays never contribute a segment: each element is visited
//! under its parent's path, so sibling elements may yield identical paths.

use crate::types::PATH_SEPARATOR;
use serde::Serialize;
use serde_json::Value;

/// A leaf position reached by the extractor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafPath<'a> {
    pub segments: Vec<String>,
    pub value: &'a Value,
}

impl LeafPath<'_> {
    /// Path segments joined with `/`
    pub fn joined(&self) -> String {
        self.segments.join(&PATH_SEPARATOR.to_string())
    }
}

struct Pending<'a> {
    value: &'a Value,
    path: Vec<String>,
}

/// Depth-first, insertion-ordered leaf path iterator.
///
/// The iterator is single-pass; create a new extractor to walk again.
pub struct PathExtractor<'a> {
    stack: Vec<Pending<'a>>,
    leaf_only: bool,
}

impl<'a> PathExtractor<'a> {
    /// Extract from `value` starting at the empty path
    pub fn new(value: &'a Value) -> Self {
        Self::with_prefix(value, Vec::new())
    }

    /// Extract from `value` with every yielded path prefixed by `prefix`
    pub fn with_prefix(value: &'a Value, prefix: Vec<String>) -> Self {
        Self {
            stack: vec![Pending {
                value,
                path: prefix,
            }],
            leaf_only: true,
        }
    }

    /// Also yield the path of every empty object or array once
    pub fn include_containers(mut self, include: bool) -> Self {
        self.leaf_only = !include;
        self
    }
}

impl<'a> Iterator for PathExtractor<'a> {
    type Item = LeafPath<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(Pending { value, path }) = self.stack.pop() {
            match value {
                Value::Object(map) => {
                    if map.is_empty() {
                        if !self.leaf_only {
                            return Some(LeafPath {
                                segments: path,
                                value,
                            });
                        }
                        continue;
                    }
                    // Reverse push keeps pops in key order
                    for (key, child) in map.iter().rev() {
                        let mut child_path = path.clone();
                        child_path.push(key.clone());
                        self.stack.push(Pending {
                            value: child,
                            path: child_path,
                        });
                    }
                }
                Value::Array(items) => {
                    if items.is_empty() {
                        if !self.leaf_only {
                            return Some(LeafPath {
                                segments: path,
                                value,
                            });
                        }
                        continue;
                    }
                    for item in items.iter().rev() {
                        self.stack.push(Pending {
                            value: item,
                            path: path.clone(),
                        });
                    }
                }
                _ => {
                    return Some(LeafPath {
                        segments: path,
                        value,
                    })
                }
            }
        }
        None
    }
}

/// Collect every leaf path of `value` as `/`-joined strings
pub fn extract_joined_paths(value: &Value) -> Vec<String> {
    PathExtractor::new(value).map(|leaf| leaf.joined()).collect()
}
