//! Tests for row selection and field application

use crate::app::models::{MasterRecord, ResolvedPlace};
use crate::app::services::enrichment::{address_matches, apply_place, is_suspect};
use crate::app::services::places::tests::kohoku_place;
use crate::config::OverwritePolicy;

fn complete_record() -> MasterRecord {
    let mut record = MasterRecord::new("1");
    record.name = "さくら".to_string();
    record.ward = "港北区".to_string();
    record.address = "横浜市港北区菊名1-1".to_string();
    record.lat = "35.5".to_string();
    record.lng = "139.6".to_string();
    record.nearest_station = "菊名駅".to_string();
    record.walk_minutes = "5".to_string();
    record
}

#[test]
fn test_is_suspect() {
    let record = complete_record();
    assert!(!is_suspect(&record));

    let mut missing_lng = complete_record();
    missing_lng.lng.clear();
    assert!(is_suspect(&missing_lng));

    let mut bus_stop = complete_record();
    bus_stop.nearest_station = "菊名駅前バス停".to_string();
    assert!(is_suspect(&bus_stop));

    let mut legacy = complete_record();
    legacy.nearest_station.clear();
    legacy.set("station", "菊名駅");
    assert!(!is_suspect(&legacy));
}

#[test]
fn test_address_matches() {
    let address = Some("日本、〒222-0011 神奈川県横浜市港北区菊名1-1");
    assert!(address_matches(address, "横浜市", "港北区"));
    assert!(address_matches(address, "横浜市", ""));
    assert!(!address_matches(address, "横浜市", "鶴見区"));
    assert!(!address_matches(Some("東京都港区"), "横浜市", ""));
    assert!(!address_matches(None, "横浜市", "港北区"));
}

#[test]
fn test_apply_fill_only_keeps_existing_values() {
    let mut record = complete_record();
    record.phone = "045-000-0000".to_string();

    let changed = apply_place(&mut record, &kohoku_place(), &OverwritePolicy::fill_only());

    assert_eq!(changed, vec!["website", "map_url", "facility_type", "station_kana"]);
    assert_eq!(record.name, "さくら");
    assert_eq!(record.facility_type, "school");
    assert_eq!(record.station_kana, "菊名");
    assert_eq!(record.phone, "045-000-0000");
    assert_eq!(record.address, "横浜市港北区菊名1-1");
    assert_eq!(record.walk_minutes, "5");
    assert_eq!(record.website, "https://sakura.example");
}

#[test]
fn test_apply_overwrite_all_and_station_normalization() {
    let mut record = complete_record();
    record.phone = "045-000-0000".to_string();
    let place = ResolvedPlace {
        nearest_station: Some("大倉山(東急)".to_string()),
        ..kohoku_place()
    };

    let changed = apply_place(&mut record, &place, &OverwritePolicy::overwrite_all());

    assert!(changed.contains(&"phone"));
    assert!(changed.contains(&"nearest_station"));
    assert_eq!(record.nearest_station, "大倉山駅");
    assert_eq!(record.station_kana, "大倉山");
    assert_eq!(record.walk_minutes, "6");
    // coordinates were present, so they stay
    assert!(!changed.contains(&"lat"));
}

#[test]
fn test_apply_same_values_reports_no_change() {
    let mut record = MasterRecord::new("1");
    let place = kohoku_place();
    assert!(!apply_place(&mut record, &place, &OverwritePolicy::overwrite_all()).is_empty());
    assert!(apply_place(&mut record, &place, &OverwritePolicy::overwrite_all()).is_empty());
}

#[test]
fn test_apply_fills_blank_name_type_and_reading() {
    let mut record = MasterRecord::new("1");
    let place = ResolvedPlace {
        nearest_station: Some("センター北".to_string()),
        ..kohoku_place()
    };

    let changed = apply_place(&mut record, &place, &OverwritePolicy::fill_only());

    assert!(changed.contains(&"name"));
    assert_eq!(record.name, "さくら保育園");
    assert_eq!(record.facility_type, "school");
    assert_eq!(record.nearest_station, "センター北駅");
    assert_eq!(record.station_kana, "せんたー北");
}

#[test]
fn test_reading_left_alone_for_a_different_kept_station() {
    let mut record = complete_record();
    record.nearest_station = "大倉山駅".to_string();
    record.facility_type = "nursery".to_string();

    let changed = apply_place(&mut record, &kohoku_place(), &OverwritePolicy::fill_only());

    assert!(!changed.contains(&"station_kana"));
    assert!(record.station_kana.is_empty());
    assert_eq!(record.facility_type, "nursery");
}

#[test]
fn test_only_generic_types_leave_facility_type_blank() {
    let mut record = complete_record();
    let place = ResolvedPlace {
        types: vec!["point_of_interest".to_string(), "establishment".to_string()],
        ..kohoku_place()
    };

    let changed = apply_place(&mut record, &place, &OverwritePolicy::fill_only());

    assert!(!changed.contains(&"facility_type"));
    assert!(record.facility_type.is_empty());
}

#[test]
fn test_unparseable_coordinates_are_suspect_and_replaced() {
    let mut record = complete_record();
    record.lat = "n/a".to_string();
    assert!(is_suspect(&record));

    let changed = apply_place(&mut record, &kohoku_place(), &OverwritePolicy::fill_only());

    assert!(changed.contains(&"lat"));
    assert_eq!(record.coordinates(), Some((35.5, 139.6)));
}
