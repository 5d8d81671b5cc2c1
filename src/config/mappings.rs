//! MappingsConfig and table resolution for a workspace.

use crate::error::ApiError;
use crate::mapping::seed::seed_table;
use crate::mapping::MappingTable;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Mapping table source configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingsConfig {
    /// Mapping file (.json, .yaml, .yml, .toml); relative paths are resolved
    /// against the workspace root. None means the built-in seed table.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl MappingsConfig {
    /// Resolve the configured mapping file to a filesystem location.
    pub fn resolve_path(&self, workspace_root: &Path) -> Option<PathBuf> {
        self.path.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                workspace_root.join(p)
            }
        })
    }

    /// Load the configured table, or the seed table when none is configured.
    pub fn load_table(&self, workspace_root: &Path) -> Result<MappingTable, ApiError> {
        match self.resolve_path(workspace_root) {
            Some(path) => MappingTable::load_from_path(&path),
            None => {
                debug!("No mappings file configured; using seed table");
                seed_table()
            }
        }
    }
}
