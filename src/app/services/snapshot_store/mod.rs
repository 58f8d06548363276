//! Monthly snapshot document store
//!
//! Each published month is one JSON document (`YYYY-MM-DD.json`) in the data
//! directory, optionally listed in a `months.json` index. Snapshots are
//! produced upstream and read-mostly here; the only write is the "apply
//! master" backfill, which rewrites a document atomically.
//!
//! ## Architecture
//!
//! - [`discovery`] - Month key discovery from the index and a file scan
//! - [`loader`] - Loading, validating and saving single documents

pub mod discovery;
pub mod loader;

#[cfg(test)]
pub mod tests;

use crate::config::DataPaths;
use std::path::{Path, PathBuf};

pub use discovery::MonthIndex;
pub use loader::validate_snapshot;

/// Access to the snapshot documents of one data directory
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    data_dir: PathBuf,
    months_index: PathBuf,
}

impl SnapshotStore {
    pub fn new(data_dir: impl Into<PathBuf>, months_index: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            months_index: months_index.into(),
        }
    }

    /// Store for the standard data layout
    pub fn from_paths(paths: &DataPaths) -> Self {
        Self::new(&paths.data_dir, &paths.months_index)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Document path for a month key
    pub fn snapshot_path(&self, month: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", month))
    }
}
