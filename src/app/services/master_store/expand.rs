//! Seeding master rows from snapshot facilities

use super::MasterStore;
use crate::app::models::{MasterRecord, Snapshot, is_blank};
use tracing::{debug, info};

/// Result of [`MasterStore::expand_from_snapshots`]
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ExpandStats {
    pub added: usize,
    pub filled: usize,
}

impl ExpandStats {
    pub fn changed(&self) -> bool {
        self.added > 0 || self.filled > 0
    }
}

impl MasterStore {
    /// Add a minimal row for every snapshot facility missing from the master
    ///
    /// Snapshots are visited oldest to newest. Existing rows only get a
    /// blank `name` or `ward` filled; non-blank master values are never
    /// overwritten. An empty `ward_filter` accepts every ward.
    pub fn expand_from_snapshots(&mut self, snapshots: &[Snapshot], ward_filter: &str) -> ExpandStats {
        let mut ordered: Vec<&Snapshot> = snapshots.iter().collect();
        ordered.sort_by(|a, b| a.month.cmp(&b.month));

        let ward_filter = ward_filter.trim();
        let mut stats = ExpandStats::default();

        for snapshot in ordered {
            for facility in &snapshot.facilities {
                let id = facility.id.trim();
                if id.is_empty() {
                    continue;
                }

                let ward = if is_blank(&facility.ward) {
                    snapshot.ward.trim()
                } else {
                    facility.ward.trim()
                };
                if !ward_filter.is_empty() && ward != ward_filter {
                    continue;
                }

                match self.records.get_mut(id) {
                    Some(record) => {
                        let mut touched = false;
                        if is_blank(&record.name) && !is_blank(&facility.name) {
                            record.name = facility.name.trim().to_string();
                            touched = true;
                        }
                        if is_blank(&record.ward) && !ward.is_empty() {
                            record.ward = ward.to_string();
                            touched = true;
                        }
                        if touched {
                            stats.filled += 1;
                        }
                    }
                    None => {
                        let mut record = MasterRecord::new(id);
                        record.name = facility.name.trim().to_string();
                        record.ward = ward.to_string();
                        debug!("Adding master row for new facility {}", id);
                        self.records.insert(id.to_string(), record);
                        stats.added += 1;
                    }
                }
            }
        }

        info!(
            "Expanded master: {} rows added, {} rows filled",
            stats.added, stats.filled
        );
        stats
    }
}
