//! Loading, validating and saving snapshot documents

use super::SnapshotStore;
use super::discovery::is_valid_month_key;
use crate::app::adapters::filesystem::{read_text, write_json_atomic};
use crate::app::models::Snapshot;
use crate::{Error, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Check the month key and identifier uniqueness of a snapshot
pub fn validate_snapshot(snapshot: &Snapshot) -> Result<()> {
    if !is_valid_month_key(&snapshot.month) {
        return Err(Error::data_validation(format!(
            "invalid month key '{}', expected YYYY-MM-DD",
            snapshot.month
        )));
    }

    let mut seen = HashSet::new();
    for facility in &snapshot.facilities {
        if !seen.insert(facility.id.as_str()) {
            return Err(Error::data_validation(format!(
                "duplicate facility id '{}' in snapshot {}",
                facility.id, snapshot.month
            )));
        }
    }
    Ok(())
}

impl SnapshotStore {
    /// Load and validate the document for one month
    pub async fn load(&self, month: &str) -> Result<Snapshot> {
        let path = self.snapshot_path(month);
        let mut snapshot = Self::load_file(&path).await?;

        if snapshot.month.is_empty() {
            snapshot.month = month.to_string();
        } else if snapshot.month != month {
            warn!(
                "{} declares month '{}', using the file name",
                path.display(),
                snapshot.month
            );
            snapshot.month = month.to_string();
        }

        validate_snapshot(&snapshot)?;
        Ok(snapshot)
    }

    /// Parse a snapshot document, dropping facilities with a blank id
    pub async fn load_file(path: &Path) -> Result<Snapshot> {
        let text = read_text(path).await?;
        let mut snapshot: Snapshot = serde_json::from_str(&text)
            .map_err(|e| Error::json_parsing(path.display().to_string(), e))?;

        let before = snapshot.facilities.len();
        snapshot.facilities.retain(|f| !f.id.is_empty());
        if snapshot.facilities.len() < before {
            warn!(
                "Dropped {} facilities with a blank id from {}",
                before - snapshot.facilities.len(),
                path.display()
            );
        }

        debug!(
            "Loaded snapshot {} with {} facilities",
            path.display(),
            snapshot.facilities.len()
        );
        Ok(snapshot)
    }

    /// Load every month that has a document, oldest first
    pub async fn load_all(&self) -> Result<Vec<Snapshot>> {
        let index = self.discover_months().await?;
        let mut snapshots = Vec::new();
        for month in index.loadable() {
            snapshots.push(self.load(&month).await?);
        }
        info!(
            "Loaded {} snapshots from {}",
            snapshots.len(),
            self.data_dir().display()
        );
        Ok(snapshots)
    }

    /// Rewrite one month's document atomically
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        validate_snapshot(snapshot)?;
        let path = self.snapshot_path(&snapshot.month);
        write_json_atomic(&path, snapshot)?;
        info!("Saved snapshot {}", path.display());
        Ok(())
    }
}
