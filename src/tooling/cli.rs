//! CLI Tooling
//!
//! Command-line interface over the mapping table, path extraction and the
//! display tree. Every command renders either a text report or JSON.

use crate::catalog::AttributeCatalog;
use crate::config::{AppConfig, ConfigLoader};
use crate::error::ApiError;
use crate::extract::PathExtractor;
use crate::logging::LoggingConfig;
use crate::mapping::{split_into_levels, Level, MappingService, PathLevels};
use crate::pipeline::{build_mapped_tree, PipelineOptions};
use crate::tooling::format::{
    format_leaf_paths_text, format_levels_text, format_mapping_change_text, format_mappings_text,
    format_resolutions_text, format_search_results_text, format_tree_text,
    format_unique_values_text,
};
use crate::tree::TreeState;
use crate::types::MappingId;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::info;

/// Attribute explorer CLI - path mapping and tree browsing for attribute metadata
#[derive(Parser)]
#[command(name = "attrx")]
#[command(about = "Map raw attribute paths to XDM paths and browse them as a tree")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold logging flags over the configured logging section
    pub fn logging_config(&self, base: LoggingConfig) -> LoggingConfig {
        let level = if self.verbose && self.log_level.is_none() {
            Some("debug")
        } else {
            self.log_level.as_deref()
        };
        base.with_overrides(
            level,
            self.log_format.as_deref(),
            self.log_output.as_deref(),
            self.log_file.as_deref(),
        )
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List every leaf path of a raw JSON document
    Extract {
        /// Raw JSON document
        #[arg(long)]
        input: PathBuf,
        /// Also list empty objects and arrays
        #[arg(long)]
        include_containers: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Resolve raw paths through the mapping table
    Resolve {
        /// Raw paths (slash separated)
        #[arg(required = true)]
        raw_paths: Vec<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Split a path into its five levels
    Levels {
        path: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Inspect and edit the mapping table
    Mappings {
        #[command(subcommand)]
        command: MappingCommands,
    },
    /// Build and show the tree for a raw JSON document
    Tree {
        /// Raw JSON document
        #[arg(long)]
        input: PathBuf,
        /// Use raw paths instead of mapped paths
        #[arg(long)]
        raw: bool,
        /// Also include empty objects and arrays as leaves
        #[arg(long)]
        include_containers: bool,
        /// Show only nodes matching this query
        #[arg(long)]
        search: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Build and show the tree for an attribute catalog
    Catalog {
        /// Attribute catalog (JSON array)
        #[arg(long)]
        input: PathBuf,
        /// Show only nodes matching this query
        #[arg(long)]
        search: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum MappingCommands {
    /// List all mappings
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Distinct values used at one level
    Values {
        /// Level (1-5 or level1-level5)
        #[arg(long)]
        level: Level,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Change the levels of an existing mapping
    Update {
        #[arg(long)]
        id: MappingId,
        #[command(flatten)]
        levels: LevelArgs,
        /// Write the table back to the configured mappings file
        #[arg(long)]
        save: bool,
    },
    /// Add a mapping for a new raw path
    Add {
        #[arg(long)]
        raw_path: String,
        /// Full transformed path; split into levels
        #[arg(long, conflicts_with_all = ["level1", "level2", "level3", "level4", "level5"])]
        transformed: Option<String>,
        #[command(flatten)]
        levels: LevelArgs,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        data_type: Option<String>,
        /// Write the table back to the configured mappings file
        #[arg(long)]
        save: bool,
    },
}

/// Per-level flags; unset levels keep their current value on update
#[derive(clap::Args, Debug, Clone, Default)]
pub struct LevelArgs {
    #[arg(long)]
    pub level1: Option<String>,
    #[arg(long)]
    pub level2: Option<String>,
    #[arg(long)]
    pub level3: Option<String>,
    #[arg(long)]
    pub level4: Option<String>,
    #[arg(long)]
    pub level5: Option<String>,
}

impl LevelArgs {
    /// Overlay the given flags on `base`
    pub fn apply_to(&self, mut base: PathLevels) -> PathLevels {
        let flags = [
            (Level::Level1, &self.level1),
            (Level::Level2, &self.level2),
            (Level::Level3, &self.level3),
            (Level::Level4, &self.level4),
            (Level::Level5, &self.level5),
        ];
        for (level, value) in flags {
            if let Some(value) = value {
                base.set(level, value.trim());
            }
        }
        base
    }

    pub fn is_empty(&self) -> bool {
        self.level1.is_none()
            && self.level2.is_none()
            && self.level3.is_none()
            && self.level4.is_none()
            && self.level5.is_none()
    }
}

/// Workspace-scoped command executor
pub struct CliContext {
    workspace_root: PathBuf,
    config: AppConfig,
    mappings: MappingService,
}

impl CliContext {
    /// Create a new CLI context: load configuration and the mapping table
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Self::with_config(workspace_root, config)
    }

    /// Create a context from an already loaded configuration
    pub fn with_config(workspace_root: PathBuf, config: AppConfig) -> Result<Self, ApiError> {
        let table = config.mappings.load_table(&workspace_root)?;
        info!(
            workspace = %workspace_root.display(),
            mappings = table.len(),
            "CLI context initialized"
        );
        Ok(Self {
            workspace_root,
            config,
            mappings: MappingService::new(table),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn mappings(&self) -> &MappingService {
        &self.mappings
    }

    /// Execute a command and return its rendered output
    pub fn execute(&mut self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Extract {
                input,
                include_containers,
                format,
            } => {
                let raw = read_json(input)?;
                let include = *include_containers || self.config.tree.include_containers;
                let leaves: Vec<_> = PathExtractor::new(&raw).include_containers(include).collect();
                info!(input = %input.display(), leaves = leaves.len(), "Extracted leaf paths");
                render(format, &leaves, || format_leaf_paths_text(&leaves))
            }
            Commands::Resolve { raw_paths, format } => {
                let table = self.mappings.snapshot();
                let resolutions: Vec<_> = raw_paths
                    .iter()
                    .map(|raw| table.resolve_detailed(raw.trim()))
                    .collect();
                render(format, &resolutions, || format_resolutions_text(&resolutions))
            }
            Commands::Levels { path, format } => {
                let levels = split_into_levels(path);
                render(format, &levels, || format_levels_text(path, &levels))
            }
            Commands::Mappings { command } => self.execute_mappings(command),
            Commands::Tree {
                input,
                raw,
                include_containers,
                search,
                format,
            } => {
                let raw_value = read_json(input)?;
                let options = PipelineOptions {
                    include_containers: *include_containers || self.config.tree.include_containers,
                    raw_paths: *raw || self.config.tree.raw_paths,
                };
                let table = self.mappings.snapshot();
                let state = TreeState::from_built(build_mapped_tree(&raw_value, &table, &options));
                render_tree(&state, search.as_deref(), format)
            }
            Commands::Catalog {
                input,
                search,
                format,
            } => {
                let catalog = AttributeCatalog::load_from_path(input)?;
                let table = self.mappings.snapshot();
                let state = TreeState::from_entries(catalog.tree_entries(&table));
                render_tree(&state, search.as_deref(), format)
            }
        }
    }

    fn execute_mappings(&mut self, command: &MappingCommands) -> Result<String, ApiError> {
        match command {
            MappingCommands::List { format } => {
                let mappings = self.mappings.get_all_mappings();
                render(format, &mappings, || format_mappings_text(mappings))
            }
            MappingCommands::Values { level, format } => {
                let values = self.mappings.get_unique_values_for_level(*level);
                render(
                    format,
                    &json!({ "level": level.to_string(), "values": values }),
                    || format_unique_values_text(*level, &values),
                )
            }
            MappingCommands::Update { id, levels, save } => {
                if levels.is_empty() {
                    return Err(ApiError::InvalidInput(
                        "Provide at least one --levelN flag".to_string(),
                    ));
                }
                let current = self
                    .mappings
                    .snapshot()
                    .get(*id)
                    .map(|m| m.levels.clone())
                    .ok_or_else(|| ApiError::MappingNotFound(format!("id {}", id)))?;
                let updated = self
                    .mappings
                    .update_mapping(*id, levels.apply_to(current))
                    .ok_or_else(|| ApiError::MappingNotFound(format!("id {}", id)))?;
                let saved_to = self.save_if_requested(*save)?;
                Ok(format_mapping_change_text(
                    "Updated",
                    &updated,
                    saved_to.as_deref(),
                ))
            }
            MappingCommands::Add {
                raw_path,
                transformed,
                levels,
                description,
                data_type,
                save,
            } => {
                let new_levels = match transformed {
                    Some(path) => split_into_levels(path.trim()),
                    None => levels.apply_to(PathLevels::default()),
                };
                let added = self
                    .mappings
                    .add_mapping(raw_path, new_levels, description.clone(), data_type.clone())
                    .ok_or_else(|| {
                        ApiError::InvalidInput(format!(
                            "Raw path is empty or already mapped: {}",
                            raw_path
                        ))
                    })?;
                let saved_to = self.save_if_requested(*save)?;
                Ok(format_mapping_change_text(
                    "Added",
                    &added,
                    saved_to.as_deref(),
                ))
            }
        }
    }

    fn save_if_requested(&self, save: bool) -> Result<Option<String>, ApiError> {
        if !save {
            return Ok(None);
        }
        let path = self
            .config
            .mappings
            .resolve_path(&self.workspace_root)
            .ok_or_else(|| {
                ApiError::ConfigError(
                    "No mappings file configured; set mappings.path to save".to_string(),
                )
            })?;
        self.mappings.snapshot().save_to_path(&path)?;
        Ok(Some(path.display().to_string()))
    }
}

fn render_tree(state: &TreeState, search: Option<&str>, format: &str) -> Result<String, ApiError> {
    match search {
        Some(query) => {
            let matches = state.search_tree(query);
            render(format, &matches, || format_search_results_text(query, &matches))
        }
        None => render(format, state.built(), || format_tree_text(state.tree())),
    }
}

fn render<T: Serialize + ?Sized>(
    format: &str,
    data: &T,
    text: impl FnOnce() -> String,
) -> Result<String, ApiError> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(data)?),
        "text" => Ok(text()),
        other => Err(ApiError::InvalidInput(format!(
            "Invalid format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}

fn read_json(path: &Path) -> Result<Value, ApiError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApiError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| ApiError::parse(path, e))
}
