//! Path Mapping
//!
//! Maps raw source paths onto the transformed (XDM) schema. Every mapping
//! stores its target as five fixed levels; the transformed path is always
//! derived from those levels and never edited directly.

pub mod files;
pub mod seed;
pub mod service;
pub mod table;

pub use service::{MappingEvent, MappingService};
pub use table::MappingTable;

use crate::types::{MappingId, PATH_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five fixed levels of a transformed path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Level1,
    Level2,
    Level3,
    Level4,
    Level5,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Level1,
        Level::Level2,
        Level::Level3,
        Level::Level4,
        Level::Level5,
    ];

    /// One-based level number
    pub fn number(self) -> u8 {
        match self {
            Level::Level1 => 1,
            Level::Level2 => 2,
            Level::Level3 => 3,
            Level::Level4 => 4,
            Level::Level5 => 5,
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Level::Level1),
            2 => Ok(Level::Level2),
            3 => Ok(Level::Level3),
            4 => Ok(Level::Level4),
            5 => Ok(Level::Level5),
            other => Err(format!("Invalid level: {} (must be 1-5)", other)),
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("level")
            .or_else(|| trimmed.strip_prefix("Level"))
            .unwrap_or(trimmed);
        let n: u8 = digits
            .parse()
            .map_err(|_| format!("Invalid level: {} (expected 1-5 or level1-level5)", s))?;
        Level::try_from(n)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level{}", self.number())
    }
}

/// The five levels of a transformed path. Absent levels are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathLevels {
    #[serde(default)]
    pub level1: String,
    #[serde(default)]
    pub level2: String,
    #[serde(default)]
    pub level3: String,
    #[serde(default)]
    pub level4: String,
    #[serde(default)]
    pub level5: String,
}

impl PathLevels {
    pub fn new(
        level1: impl Into<String>,
        level2: impl Into<String>,
        level3: impl Into<String>,
        level4: impl Into<String>,
        level5: impl Into<String>,
    ) -> Self {
        Self {
            level1: level1.into(),
            level2: level2.into(),
            level3: level3.into(),
            level4: level4.into(),
            level5: level5.into(),
        }
    }

    pub fn get(&self, level: Level) -> &str {
        match level {
            Level::Level1 => &self.level1,
            Level::Level2 => &self.level2,
            Level::Level3 => &self.level3,
            Level::Level4 => &self.level4,
            Level::Level5 => &self.level5,
        }
    }

    pub fn set(&mut self, level: Level, value: impl Into<String>) {
        let slot = match level {
            Level::Level1 => &mut self.level1,
            Level::Level2 => &mut self.level2,
            Level::Level3 => &mut self.level3,
            Level::Level4 => &mut self.level4,
            Level::Level5 => &mut self.level5,
        };
        *slot = value.into();
    }

    /// Levels in order, including empty ones
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        Level::ALL.into_iter().map(move |level| self.get(level))
    }

    /// The transformed path: non-empty levels joined with `/`
    pub fn join(&self) -> String {
        self.iter()
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join(&PATH_SEPARATOR.to_string())
    }
}

/// Split a path into the five fixed levels.
///
/// Segments 0-3 fill level1-level4; everything after the fourth segment is
/// rejoined into level5.
pub fn split_into_levels(path: &str) -> PathLevels {
    let mut parts = path.split(PATH_SEPARATOR);
    let mut levels = PathLevels::default();
    for level in [Level::Level1, Level::Level2, Level::Level3, Level::Level4] {
        if let Some(segment) = parts.next() {
            levels.set(level, segment);
        }
    }
    let rest: Vec<&str> = parts.collect();
    levels.level5 = rest.join(&PATH_SEPARATOR.to_string());
    levels
}

/// A raw-path to transformed-path mapping record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathMapping {
    pub id: MappingId,
    pub raw_path: String,
    #[serde(default)]
    pub transformed_path: String,
    pub levels: PathLevels,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

impl PathMapping {
    /// Build a mapping whose transformed path is derived from `levels`
    pub fn new(id: MappingId, raw_path: impl Into<String>, levels: PathLevels) -> Self {
        let transformed_path = levels.join();
        Self {
            id,
            raw_path: raw_path.into(),
            transformed_path,
            levels,
            description: None,
            data_type: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    /// Replace the levels and recompute the transformed path
    pub fn set_levels(&mut self, levels: PathLevels) {
        self.transformed_path = levels.join();
        self.levels = levels;
    }

    /// Whether the stored transformed path agrees with the levels
    pub fn is_consistent(&self) -> bool {
        self.transformed_path == self.levels.join()
    }
}
