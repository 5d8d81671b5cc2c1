//! Reading and writing mapping tables as JSON, YAML or TOML.

use super::{MappingTable, PathMapping};
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Supported mapping file formats, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingFileFormat {
    Json,
    Yaml,
    Toml,
}

impl MappingFileFormat {
    pub fn from_path(path: &Path) -> Result<Self, ApiError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(MappingFileFormat::Json),
            Some("yaml") | Some("yml") => Ok(MappingFileFormat::Yaml),
            Some("toml") => Ok(MappingFileFormat::Toml),
            _ => Err(ApiError::UnsupportedFormat(format!(
                "{} (expected .json, .yaml, .yml or .toml)",
                path.display()
            ))),
        }
    }
}

/// TOML cannot hold a bare array at the top level
#[derive(Debug, Serialize, Deserialize)]
struct TomlMappingFile {
    #[serde(default)]
    mappings: Vec<PathMapping>,
}

impl MappingTable {
    /// Load and validate a mapping table from a file
    pub fn load_from_path(path: &Path) -> Result<Self, ApiError> {
        let format = MappingFileFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| ApiError::io(path, e))?;
        let mappings = parse_mappings(&content, format).map_err(|msg| ApiError::parse(path, msg))?;
        let table = MappingTable::from_mappings(mappings)?;
        info!(path = %path.display(), mappings = table.len(), "Loaded mapping table");
        Ok(table)
    }

    /// Write the table to a file in the format implied by its extension
    pub fn save_to_path(&self, path: &Path) -> Result<(), ApiError> {
        let format = MappingFileFormat::from_path(path)?;
        let content = render_mappings(self.get_all_mappings(), format)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ApiError::io(parent, e))?;
            }
        }
        std::fs::write(path, content).map_err(|e| ApiError::io(path, e))?;
        info!(path = %path.display(), mappings = self.len(), "Saved mapping table");
        Ok(())
    }
}

fn parse_mappings(content: &str, format: MappingFileFormat) -> Result<Vec<PathMapping>, String> {
    match format {
        MappingFileFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        MappingFileFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        MappingFileFormat::Toml => toml::from_str::<TomlMappingFile>(content)
            .map(|file| file.mappings)
            .map_err(|e| e.to_string()),
    }
}

fn render_mappings(mappings: &[PathMapping], format: MappingFileFormat) -> Result<String, ApiError> {
    match format {
        MappingFileFormat::Json => Ok(serde_json::to_string_pretty(mappings)?),
        MappingFileFormat::Yaml => serde_yaml::to_string(mappings)
            .map_err(|e| ApiError::InvalidInput(format!("YAML serialization failed: {}", e))),
        MappingFileFormat::Toml => toml::to_string_pretty(&TomlMappingFile {
            mappings: mappings.to_vec(),
        })
        .map_err(|e| ApiError::InvalidInput(format!("TOML serialization failed: {}", e))),
    }
}
