//! Integration tests for path mapping, tree construction and the CLI surface

mod cli_contracts;
mod config_loading;
mod mapping_persistence;
mod profile_pipeline;
mod support;
