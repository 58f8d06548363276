//! Facility master table store
//!
//! The master table is the hand-maintained reference of facility metadata,
//! keyed by facility identifier. This module loads it through the
//! quote-aware [`TabularParser`](crate::app::services::tabular_parser::TabularParser),
//! keeps it in memory as an ordered identifier→record map and rewrites it
//! deterministically and atomically.
//!
//! ## Architecture
//!
//! - [`loader`] - Reading the table, skipping blank and duplicate ids
//! - [`writer`] - Deterministic, atomic rewrite of the table
//! - [`expand`] - Seeding master rows from snapshot facilities

pub mod expand;
pub mod loader;
pub mod writer;

#[cfg(test)]
pub mod tests;

use crate::app::models::MasterRecord;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

pub use expand::ExpandStats;
pub use loader::LoadStats;

/// In-memory facility master table
#[derive(Debug, Clone, Default)]
pub struct MasterStore {
    path: PathBuf,
    records: BTreeMap<String, MasterRecord>,
    /// Non-schema columns seen on load, carried to the next save
    extra_columns: BTreeSet<String>,
    load_stats: LoadStats,
}

impl MasterStore {
    /// Create an empty store that will be saved to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// File the store was loaded from and is saved to
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, facility_id: &str) -> Option<&MasterRecord> {
        self.records.get(facility_id)
    }

    pub fn get_mut(&mut self, facility_id: &str) -> Option<&mut MasterRecord> {
        self.records.get_mut(facility_id)
    }

    pub fn contains(&self, facility_id: &str) -> bool {
        self.records.contains_key(facility_id)
    }

    /// Insert or replace a record; blank identifiers are refused
    pub fn insert(&mut self, record: MasterRecord) -> bool {
        let id = record.facility_id.trim().to_string();
        if id.is_empty() {
            return false;
        }
        for column in record.extra.keys() {
            self.extra_columns.insert(column.clone());
        }
        self.records.insert(id, record);
        true
    }

    /// Identifiers in ascending order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Records in identifier order
    pub fn records(&self) -> impl Iterator<Item = &MasterRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Statistics from the last load
    pub fn load_stats(&self) -> &LoadStats {
        &self.load_stats
    }
}
