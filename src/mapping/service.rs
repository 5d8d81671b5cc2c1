//! MappingService: caller-owned holder of the current mapping table.
//!
//! Readers take an `Arc<MappingTable>` snapshot. Mutations build a new table,
//! swap it in and publish a [`MappingEvent`]; snapshots already handed out are
//! never modified.

use super::{split_into_levels, Level, MappingTable, PathLevels, PathMapping};
use crate::error::ApiError;
use crate::events::EventBus;
use crate::types::MappingId;
use std::sync::Arc;

/// Mapping table change notification
#[derive(Debug, Clone, PartialEq)]
pub enum MappingEvent {
    Updated {
        before: PathMapping,
        after: PathMapping,
    },
    Added(PathMapping),
    Removed(PathMapping),
}

pub struct MappingService {
    current: Arc<MappingTable>,
    events: EventBus<MappingEvent>,
}

impl MappingService {
    pub fn new(table: MappingTable) -> Self {
        Self {
            current: Arc::new(table),
            events: EventBus::new(),
        }
    }

    /// Service over the embedded seed table
    pub fn seeded() -> Result<Self, ApiError> {
        Ok(Self::new(super::seed::seed_table()?))
    }

    /// The current immutable table
    pub fn snapshot(&self) -> Arc<MappingTable> {
        Arc::clone(&self.current)
    }

    pub fn events(&mut self) -> &mut EventBus<MappingEvent> {
        &mut self.events
    }

    pub fn resolve(&self, raw_path: &str) -> String {
        self.current.resolve(raw_path)
    }

    /// Resolve a raw path and split the result into levels
    pub fn resolve_levels(&self, raw_path: &str) -> PathLevels {
        split_into_levels(&self.current.resolve(raw_path))
    }

    pub fn get_all_mappings(&self) -> &[PathMapping] {
        self.current.get_all_mappings()
    }

    pub fn get_unique_values_for_level(&self, level: Level) -> Vec<String> {
        self.current.get_unique_values_for_level(level)
    }

    pub fn update_mapping(&mut self, id: MappingId, levels: PathLevels) -> Option<PathMapping> {
        let before = self.current.get(id)?.clone();
        let mut next = (*self.current).clone();
        let after = next.update_mapping(id, levels)?;
        self.current = Arc::new(next);
        self.events.publish(MappingEvent::Updated {
            before,
            after: after.clone(),
        });
        Some(after)
    }

    pub fn add_mapping(
        &mut self,
        raw_path: &str,
        levels: PathLevels,
        description: Option<String>,
        data_type: Option<String>,
    ) -> Option<PathMapping> {
        let mut next = (*self.current).clone();
        let added = next.add_mapping(raw_path, levels, description, data_type)?;
        self.current = Arc::new(next);
        self.events.publish(MappingEvent::Added(added.clone()));
        Some(added)
    }

    pub fn remove_mapping(&mut self, id: MappingId) -> Option<PathMapping> {
        let mut next = (*self.current).clone();
        let removed = next.remove_mapping(id)?;
        self.current = Arc::new(next);
        self.events.publish(MappingEvent::Removed(removed.clone()));
        Some(removed)
    }
}
