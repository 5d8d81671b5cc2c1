//! Tooling Layer
//!
//! CLI command definitions, the workspace-scoped executor and text formatting.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands, MappingCommands};
