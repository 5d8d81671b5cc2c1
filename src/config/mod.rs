//! Configuration
//!
//! Layered application configuration: built-in defaults, the global config
//! file, the workspace config file and `ATTRX__` environment variables.

mod facade;
mod mappings;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;
pub use mappings::MappingsConfig;

use crate::logging::LoggingConfig;
use crate::pipeline::PipelineOptions;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Mapping table source
    #[serde(default)]
    pub mappings: MappingsConfig,

    /// Tree construction switches
    #[serde(default)]
    pub tree: PipelineOptions,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}
