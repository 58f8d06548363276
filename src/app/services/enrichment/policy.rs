//! Row selection, address sanity check and field application

use crate::app::models::{MasterRecord, ResolvedPlace, is_blank};
use crate::app::services::places::{needs_station_fix, normalize_station_name, station_kana};
use crate::config::OverwritePolicy;

/// True for rows that look incomplete or wrong
///
/// A row is suspect when its address is blank, its coordinates are missing
/// or unparseable, or its
/// nearest station is missing, implausible or lacks walk minutes.
pub fn is_suspect(record: &MasterRecord) -> bool {
    is_blank(&record.address)
        || record.lacks_coordinates()
        || needs_station_fix(record.best_station(), &record.walk_minutes)
}

/// Strict address check: the address must name the city and, when known, the ward
pub fn address_matches(address: Option<&str>, city: &str, ward: &str) -> bool {
    let Some(address) = address else {
        return false;
    };
    let city = city.trim();
    let ward = ward.trim();
    (city.is_empty() || address.contains(city)) && (ward.is_empty() || address.contains(ward))
}

/// Place types too generic to describe a facility
const GENERIC_PLACE_TYPES: &[&str] = &["point_of_interest", "establishment"];

/// Comma-joined specific place types, `None` when only generic ones remain
fn facility_type(types: &[String]) -> Option<String> {
    let specific: Vec<&str> = types
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty() && !GENERIC_PLACE_TYPES.contains(t))
        .collect();
    (!specific.is_empty()).then(|| specific.join(","))
}

/// Write `value` into `slot` when allowed and different; returns whether it changed
fn write_field(slot: &mut String, value: Option<&str>, overwrite: bool) -> bool {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return false;
    };
    if !overwrite && !is_blank(slot) {
        return false;
    }
    if slot.trim() == value {
        return false;
    }
    *slot = value.to_string();
    true
}

/// Apply a resolved place to a master record
///
/// Name, address, facility type and coordinates are only filled while blank
/// (coordinates also when unparseable). Phone, website, map URL, nearest
/// station and walk minutes each follow their own switch in `policy`. The
/// station reading is filled while blank and rewritten when the station
/// itself changes. Returns the names of the columns that changed.
pub fn apply_place(
    record: &mut MasterRecord,
    place: &ResolvedPlace,
    policy: &OverwritePolicy,
) -> Vec<&'static str> {
    let mut changed = Vec::new();

    if write_field(&mut record.name, place.name.as_deref(), false) {
        changed.push("name");
    }
    if write_field(&mut record.address, place.address.as_deref(), false) {
        changed.push("address");
    }

    if let (Some(lat), Some(lng)) = (place.lat, place.lng) {
        if record.lacks_coordinates() {
            let (lat, lng) = (lat.to_string(), lng.to_string());
            if record.lat != lat {
                record.lat = lat;
                changed.push("lat");
            }
            if record.lng != lng {
                record.lng = lng;
                changed.push("lng");
            }
        }
    }

    if write_field(&mut record.phone, place.phone.as_deref(), policy.phone) {
        changed.push("phone");
    }
    if write_field(&mut record.website, place.website.as_deref(), policy.website) {
        changed.push("website");
    }
    if write_field(&mut record.map_url, place.map_url.as_deref(), policy.map_url) {
        changed.push("map_url");
    }
    let types = facility_type(&place.types);
    if write_field(&mut record.facility_type, types.as_deref(), false) {
        changed.push("facility_type");
    }

    let station = place
        .nearest_station
        .as_deref()
        .map(normalize_station_name);
    if write_field(
        &mut record.nearest_station,
        station.as_deref(),
        policy.nearest_station,
    ) {
        changed.push("nearest_station");
    }

    if let Some(station) = station.as_deref() {
        let station_changed = changed.contains(&"nearest_station");
        if station_changed || record.nearest_station.trim() == station {
            let kana = station_kana(station);
            if write_field(&mut record.station_kana, Some(kana.as_str()), station_changed) {
                changed.push("station_kana");
            }
        }
    }

    let walk = place.walk_minutes.map(|m| m.to_string());
    if write_field(&mut record.walk_minutes, walk.as_deref(), policy.walk_minutes) {
        changed.push("walk_minutes");
    }

    changed
}
