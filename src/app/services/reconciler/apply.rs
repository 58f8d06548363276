//! Backfilling blank snapshot fields from the master

use super::merge::merge_facility;
use crate::app::models::{Snapshot, is_blank};
use crate::app::services::master_store::MasterStore;
use tracing::debug;

/// Counts from one apply-master pass over a snapshot
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ApplyStats {
    pub facilities_seen: usize,
    pub facilities_updated: usize,
    pub fields_filled: usize,
    pub missing_in_master: usize,
}

impl ApplyStats {
    pub fn changed(&self) -> bool {
        self.fields_filled > 0
    }
}

/// Fill `slot` with `value` when `slot` is blank and `value` is not
fn fill(slot: &mut String, value: &str, filled: &mut usize) {
    if is_blank(slot) && !is_blank(value) {
        *slot = value.to_string();
        *filled += 1;
    }
}

/// Backfill blank fields of every facility entry from its master record
///
/// Non-blank snapshot values are never changed, so running the pass twice
/// is a no-op the second time. An empty `ward_filter` accepts every ward.
pub fn apply_master_to_snapshot(
    snapshot: &mut Snapshot,
    master: &MasterStore,
    ward_filter: &str,
) -> ApplyStats {
    let ward_filter = ward_filter.trim();
    let snapshot_ward = snapshot.ward.clone();
    let mut stats = ApplyStats::default();

    for facility in snapshot.facilities.iter_mut() {
        let Some(record) = master.get(facility.id.trim()) else {
            stats.missing_in_master += 1;
            continue;
        };

        let merged = merge_facility(facility, Some(record), &snapshot_ward);
        if !ward_filter.is_empty() && merged.ward != ward_filter {
            continue;
        }
        stats.facilities_seen += 1;

        let mut filled = 0;
        fill(&mut facility.name, &merged.name, &mut filled);
        fill(&mut facility.name_kana, &merged.name_kana, &mut filled);
        fill(&mut facility.ward, &merged.ward, &mut filled);
        fill(&mut facility.address, &merged.address, &mut filled);
        fill(&mut facility.lat, &merged.lat, &mut filled);
        fill(&mut facility.lng, &merged.lng, &mut filled);
        fill(&mut facility.map_url, &merged.map_url, &mut filled);
        fill(&mut facility.facility_type, &merged.facility_type, &mut filled);
        fill(&mut facility.phone, &merged.phone, &mut filled);
        fill(&mut facility.website, &merged.website, &mut filled);
        fill(&mut facility.notes, &merged.notes, &mut filled);
        fill(&mut facility.nearest_station, &merged.nearest_station, &mut filled);
        fill(&mut facility.station_kana, &merged.station_kana, &mut filled);
        if facility.walk_minutes.is_none() && merged.walk_minutes.is_some() {
            facility.walk_minutes = merged.walk_minutes;
            filled += 1;
        }

        if filled > 0 {
            debug!("Filled {} fields of facility {}", filled, facility.id);
            stats.facilities_updated += 1;
            stats.fields_filled += filled;
        }
    }

    stats
}
