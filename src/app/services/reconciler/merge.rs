//! Field resolution and merged display records

use crate::app::models::{MasterRecord, MergedFacility, Snapshot, SnapshotFacility, parse_minutes};
use crate::app::services::master_store::MasterStore;
use crate::constants::LEGACY_MAP_URL_FIELD;
use serde_json::Value;

/// First non-blank candidate, trimmed; empty when all are blank
pub fn resolve_field(candidates: &[&str]) -> String {
    candidates
        .iter()
        .map(|c| c.trim())
        .find(|c| !c.is_empty())
        .unwrap_or("")
        .to_string()
}

/// Map URL a snapshot entry carries under the older field name
fn snapshot_legacy_map_url(facility: &SnapshotFacility) -> &str {
    match facility.extra.get(LEGACY_MAP_URL_FIELD) {
        Some(Value::String(url)) => url.as_str(),
        _ => "",
    }
}

/// Merge one snapshot entry with its master record
///
/// `master` is `None` for facilities without a master row; the merge then
/// behaves as if the master record were empty. `snapshot_ward` is the
/// document-level ward label, used when neither side names a ward.
pub fn merge_facility(
    facility: &SnapshotFacility,
    master: Option<&MasterRecord>,
    snapshot_ward: &str,
) -> MergedFacility {
    let empty = MasterRecord::default();
    let master = master.unwrap_or(&empty);

    let map_url = resolve_field(&[
        facility.map_url.as_str(),
        snapshot_legacy_map_url(facility),
        master.map_url.as_str(),
    ]);

    let walk_minutes = facility
        .walk_minutes
        .or_else(|| parse_minutes(&master.walk_minutes));

    MergedFacility {
        id: facility.id.trim().to_string(),
        name: resolve_field(&[facility.name.as_str(), master.name.as_str()]),
        name_kana: resolve_field(&[facility.name_kana.as_str(), master.name_kana.as_str()]),
        ward: resolve_field(&[facility.ward.as_str(), master.ward.as_str(), snapshot_ward]),
        address: resolve_field(&[facility.address.as_str(), master.address.as_str()]),
        lat: resolve_field(&[facility.lat.as_str(), master.lat.as_str()]),
        lng: resolve_field(&[facility.lng.as_str(), master.lng.as_str()]),
        legacy_map_url: map_url.clone(),
        map_url,
        facility_type: resolve_field(&[facility.facility_type.as_str(), master.facility_type.as_str()]),
        phone: resolve_field(&[facility.phone.as_str(), master.phone.as_str()]),
        website: resolve_field(&[facility.website.as_str(), master.website.as_str()]),
        notes: resolve_field(&[facility.notes.as_str(), master.notes.as_str()]),
        nearest_station: resolve_field(&[
            facility.nearest_station.as_str(),
            master.nearest_station.as_str(),
            master.legacy_station(),
        ]),
        station_kana: resolve_field(&[facility.station_kana.as_str(), master.station_kana.as_str()]),
        walk_minutes,
        totals: facility.totals.clone(),
        age_groups: facility.age_groups.clone(),
    }
}

/// Merged display records for a whole snapshot, in snapshot order
pub fn merge_snapshot(snapshot: &Snapshot, master: &MasterStore) -> Vec<MergedFacility> {
    snapshot
        .facilities
        .iter()
        .map(|facility| merge_facility(facility, master.get(facility.id.trim()), &snapshot.ward))
        .collect()
}
