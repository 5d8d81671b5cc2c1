//! Attribute Catalog
//!
//! Descriptive records for user-data attributes: ownership, source, category,
//! XDM placement, sample values and the datasets that carry them. The catalog
//! feeds the display tree so nodes can be searched by their metadata.

use crate::error::ApiError;
use crate::mapping::MappingTable;
use crate::tree::{NodeMetadata, PathEntry};
use crate::types::PATH_SEPARATOR;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use tracing::info;

/// One attribute definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Location in the source data, resolved through the mapping table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_path: Option<String>,
    /// Explicit XDM placement; takes precedence over `raw_path`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xdm_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default)]
    pub sample_values: Vec<Value>,
    #[serde(default)]
    pub datasets: Vec<String>,
}

impl Attribute {
    /// Tree path for this attribute: explicit XDM path, else the mapped raw
    /// path, else `category/name`
    pub fn tree_path(&self, table: &MappingTable) -> String {
        if let Some(xdm) = self.xdm_path.as_deref().filter(|p| !p.is_empty()) {
            return xdm.to_string();
        }
        if let Some(raw) = self.raw_path.as_deref().filter(|p| !p.is_empty()) {
            return table.resolve(raw);
        }
        match self.category.as_deref() {
            Some(category) if !category.is_empty() => {
                format!("{}{}{}", category, PATH_SEPARATOR, self.name)
            }
            _ => self.name.clone(),
        }
    }

    fn metadata(&self, tree_path: &str) -> NodeMetadata {
        NodeMetadata {
            description: self.description.clone(),
            data_owner: self.data_owner.clone(),
            data_source: self.data_source.clone(),
            category: self.category.clone(),
            xdm_path: Some(tree_path.to_string()),
            data_type: self.data_type.clone(),
        }
    }
}

/// In-memory attribute collection
#[derive(Debug, Clone, Default)]
pub struct AttributeCatalog {
    attributes: Vec<Attribute>,
}

impl AttributeCatalog {
    /// Build a catalog, rejecting duplicate ids
    pub fn from_attributes(attributes: Vec<Attribute>) -> Result<Self, ApiError> {
        let mut seen = HashSet::new();
        for attribute in &attributes {
            if !seen.insert(attribute.id.as_str()) {
                return Err(ApiError::InvalidInput(format!(
                    "Duplicate attribute id: {}",
                    attribute.id
                )));
            }
        }
        Ok(Self { attributes })
    }

    /// Load a JSON array of attributes
    pub fn load_from_path(path: &Path) -> Result<Self, ApiError> {
        let content = std::fs::read_to_string(path).map_err(|e| ApiError::io(path, e))?;
        let attributes: Vec<Attribute> =
            serde_json::from_str(&content).map_err(|e| ApiError::parse(path, e))?;
        let catalog = Self::from_attributes(attributes)?;
        info!(path = %path.display(), attributes = catalog.len(), "Loaded attribute catalog");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn get(&self, id: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.id == id)
    }

    /// Case-insensitive match on name or description
    pub fn search(&self, query: &str) -> Vec<&Attribute> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.attributes
            .iter()
            .filter(|a| {
                a.name.to_lowercase().contains(&needle)
                    || a.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn by_category(&self, category: &str) -> Vec<&Attribute> {
        self.attributes
            .iter()
            .filter(|a| {
                a.category
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(category))
            })
            .collect()
    }

    /// Distinct categories, sorted
    pub fn categories(&self) -> Vec<String> {
        self.attributes
            .iter()
            .filter_map(|a| a.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Tree rows for every attribute; the first sample value becomes the leaf value
    pub fn tree_entries(&self, table: &MappingTable) -> Vec<PathEntry> {
        self.attributes
            .iter()
            .map(|attribute| {
                let path = attribute.tree_path(table);
                let metadata = attribute.metadata(&path);
                PathEntry::new(path, attribute.sample_values.first().cloned())
                    .with_metadata(metadata)
            })
            .collect()
    }
}
