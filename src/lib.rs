//! Attribute Explorer: path mapping and tree construction
//!
//! Extracts leaf paths from raw attribute data, maps them onto the XDM schema
//! through a lookup table with longest-prefix fallback, and reconstructs a
//! navigable folder/file tree with an id-indexed flat map for lookup, search
//! and selection.

pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod extract;
pub mod logging;
pub mod mapping;
pub mod pipeline;
pub mod tooling;
pub mod tree;
pub mod types;
