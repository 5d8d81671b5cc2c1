//! Built-in mapping table used when no mappings file is configured.

use super::{MappingTable, PathMapping};
use crate::error::ApiError;

const SEED_MAPPINGS: &str = include_str!("../../data/seed_mappings.json");

/// Parse the embedded seed mappings
pub fn seed_mappings() -> Result<Vec<PathMapping>, ApiError> {
    serde_json::from_str(SEED_MAPPINGS)
        .map_err(|e| ApiError::parse("<embedded seed_mappings.json>", e))
}

/// Mapping table built from the embedded seed
pub fn seed_table() -> Result<MappingTable, ApiError> {
    MappingTable::from_mappings(seed_mappings()?)
}
