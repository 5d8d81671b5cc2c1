//! Mapping table: raw path lookup, longest-prefix resolution and mutation.

use super::{Level, PathLevels, PathMapping};
use crate::error::ApiError;
use crate::types::{MappingId, PATH_SEPARATOR};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};

/// How a raw path was resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum MatchKind {
    /// The raw path is a key of the table
    Exact { mapping_id: MappingId },
    /// The longest key that prefixes the raw path was used
    Prefix {
        mapping_id: MappingId,
        prefix: String,
    },
    /// No key matched; the raw path is returned unchanged
    Unmapped,
}

/// Result of resolving a raw path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub raw_path: String,
    pub transformed_path: String,
    pub matched: MatchKind,
}

/// Mapping records indexed by raw path
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    mappings: Vec<PathMapping>,
    by_raw_path: HashMap<String, usize>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from records, enforcing unique ids and raw paths.
    ///
    /// Transformed paths that disagree with their levels are recomputed.
    pub fn from_mappings(mappings: Vec<PathMapping>) -> Result<Self, ApiError> {
        let mut ids = HashSet::new();
        let mut table = MappingTable::new();
        for mut mapping in mappings {
            if mapping.raw_path.trim().is_empty() {
                return Err(ApiError::InvalidMappingTable(format!(
                    "Mapping {} has an empty raw path",
                    mapping.id
                )));
            }
            if !ids.insert(mapping.id) {
                return Err(ApiError::InvalidMappingTable(format!(
                    "Duplicate mapping id: {}",
                    mapping.id
                )));
            }
            if table.by_raw_path.contains_key(&mapping.raw_path) {
                return Err(ApiError::InvalidMappingTable(format!(
                    "Duplicate raw path: {}",
                    mapping.raw_path
                )));
            }
            if !mapping.is_consistent() {
                if !mapping.transformed_path.is_empty() {
                    warn!(
                        mapping_id = mapping.id,
                        stored = %mapping.transformed_path,
                        "Transformed path disagrees with levels; recomputing"
                    );
                }
                mapping.transformed_path = mapping.levels.join();
            }
            table
                .by_raw_path
                .insert(mapping.raw_path.clone(), table.mappings.len());
            table.mappings.push(mapping);
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// All mappings in table order
    pub fn get_all_mappings(&self) -> &[PathMapping] {
        &self.mappings
    }

    pub fn get(&self, id: MappingId) -> Option<&PathMapping> {
        self.mappings.iter().find(|m| m.id == id)
    }

    pub fn get_by_raw_path(&self, raw_path: &str) -> Option<&PathMapping> {
        self.by_raw_path.get(raw_path).map(|&i| &self.mappings[i])
    }

    /// Resolve a raw path to its transformed path
    pub fn resolve(&self, raw_path: &str) -> String {
        self.resolve_detailed(raw_path).transformed_path
    }

    /// Resolve a raw path and report which rule matched.
    ///
    /// Exact key first, then the longest key followed by `/` in the raw path,
    /// else the raw path unchanged.
    pub fn resolve_detailed(&self, raw_path: &str) -> Resolution {
        if let Some(mapping) = self.get_by_raw_path(raw_path) {
            return Resolution {
                raw_path: raw_path.to_string(),
                transformed_path: mapping.transformed_path.clone(),
                matched: MatchKind::Exact {
                    mapping_id: mapping.id,
                },
            };
        }

        let best = self
            .mappings
            .iter()
            .filter(|m| is_segment_prefix(&m.raw_path, raw_path))
            .max_by_key(|m| m.raw_path.len());

        match best {
            Some(mapping) => {
                // Empty segments in the remainder (`a//b`, trailing `/`) are dropped
                let remainder: Vec<&str> = raw_path
                    [mapping.raw_path.len() + PATH_SEPARATOR.len_utf8()..]
                    .split(PATH_SEPARATOR)
                    .filter(|segment| !segment.is_empty())
                    .collect();
                let transformed_path = std::iter::once(mapping.transformed_path.as_str())
                    .chain(remainder)
                    .filter(|segment| !segment.is_empty())
                    .collect::<Vec<_>>()
                    .join(&PATH_SEPARATOR.to_string());
                Resolution {
                    raw_path: raw_path.to_string(),
                    transformed_path,
                    matched: MatchKind::Prefix {
                        mapping_id: mapping.id,
                        prefix: mapping.raw_path.clone(),
                    },
                }
            }
            None => Resolution {
                raw_path: raw_path.to_string(),
                transformed_path: raw_path.to_string(),
                matched: MatchKind::Unmapped,
            },
        }
    }

    /// Replace a mapping's levels. Returns `None` for an unknown id.
    pub fn update_mapping(&mut self, id: MappingId, levels: PathLevels) -> Option<PathMapping> {
        let mapping = self.mappings.iter_mut().find(|m| m.id == id)?;
        mapping.set_levels(levels);
        debug!(
            mapping_id = id,
            transformed_path = %mapping.transformed_path,
            "Mapping updated"
        );
        Some(mapping.clone())
    }

    /// Add a mapping for a new raw path.
    ///
    /// Returns `None` when the raw path is blank or already mapped.
    pub fn add_mapping(
        &mut self,
        raw_path: &str,
        levels: PathLevels,
        description: Option<String>,
        data_type: Option<String>,
    ) -> Option<PathMapping> {
        let raw_path = raw_path.trim();
        if raw_path.is_empty() || self.by_raw_path.contains_key(raw_path) {
            return None;
        }
        let mut mapping = PathMapping::new(self.next_id(), raw_path, levels);
        mapping.description = description;
        mapping.data_type = data_type;

        self.by_raw_path
            .insert(mapping.raw_path.clone(), self.mappings.len());
        self.mappings.push(mapping.clone());
        debug!(
            mapping_id = mapping.id,
            raw_path = %mapping.raw_path,
            transformed_path = %mapping.transformed_path,
            "Mapping added"
        );
        Some(mapping)
    }

    /// Remove a mapping by id
    pub fn remove_mapping(&mut self, id: MappingId) -> Option<PathMapping> {
        let index = self.mappings.iter().position(|m| m.id == id)?;
        let removed = self.mappings.remove(index);
        self.reindex();
        Some(removed)
    }

    /// Distinct non-empty values of one level across the table, sorted
    pub fn get_unique_values_for_level(&self, level: Level) -> Vec<String> {
        self.mappings
            .iter()
            .map(|m| m.levels.get(level))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn next_id(&self) -> MappingId {
        self.mappings.iter().map(|m| m.id).max().map_or(1, |max| max + 1)
    }

    fn reindex(&mut self) {
        self.by_raw_path = self
            .mappings
            .iter()
            .enumerate()
            .map(|(i, m)| (m.raw_path.clone(), i))
            .collect();
    }
}

fn is_segment_prefix(key: &str, raw_path: &str) -> bool {
    raw_path.len() > key.len()
        && raw_path.starts_with(key)
        && raw_path[key.len()..].starts_with(PATH_SEPARATOR)
}
