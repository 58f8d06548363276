//! Tests for merge precedence, aliasing and idempotence

use super::*;
use crate::app::models::{Counts, MasterRecord, Snapshot};
use crate::app::services::reconciler::{merge_facility, merge_snapshot, resolve_field};

#[test]
fn test_resolve_field_precedence() {
    assert_eq!(resolve_field(&["", "Kikuna Station"]), "Kikuna Station");
    assert_eq!(
        resolve_field(&["Keikyu Station", "Kikuna Station"]),
        "Keikyu Station"
    );
    assert_eq!(resolve_field(&["  ", "\u{3000}"]), "");
    assert_eq!(resolve_field(&[" a ", "b"]), "a");
}

#[test]
fn test_snapshot_wins_master_fills() {
    let mut entry = facility("1", "さくら");
    entry.nearest_station = "Keikyu Station".to_string();

    let mut master = MasterRecord::new("1");
    master.name = "旧名".to_string();
    master.nearest_station = "Kikuna Station".to_string();
    master.phone = "045-000-0000".to_string();
    master.walk_minutes = "7".to_string();

    let merged = merge_facility(&entry, Some(&master), "");
    assert_eq!(merged.name, "さくら");
    assert_eq!(merged.nearest_station, "Keikyu Station");
    assert_eq!(merged.phone, "045-000-0000");
    assert_eq!(merged.walk_minutes, Some(7));

    entry.nearest_station.clear();
    let merged = merge_facility(&entry, Some(&master), "");
    assert_eq!(merged.nearest_station, "Kikuna Station");
}

#[test]
fn test_station_falls_back_to_legacy_column() {
    let entry = facility("1", "さくら");
    let mut master = MasterRecord::new("1");
    master.set("station", "菊名駅");

    let merged = merge_facility(&entry, Some(&master), "");
    assert_eq!(merged.nearest_station, "菊名駅");

    let merged = merge_facility(&entry, None, "");
    assert_eq!(merged.nearest_station, "");
}

#[test]
fn test_map_url_sets_legacy_alias() {
    let entry = facility("1", "さくら");
    let mut master = MasterRecord::new("1");
    master.map_url = "https://maps.example/?q=1".to_string();

    let merged = merge_facility(&entry, Some(&master), "");
    assert_eq!(merged.map_url, "https://maps.example/?q=1");
    assert_eq!(merged.legacy_map_url, merged.map_url);

    let json = serde_json::to_value(&merged).unwrap();
    assert_eq!(json["google_map_url"], "https://maps.example/?q=1");
}

#[test]
fn test_snapshot_legacy_map_url_is_read() {
    let mut entry = facility("1", "さくら");
    entry
        .extra
        .insert("google_map_url".to_string(), "https://old.example/1".into());
    let mut master = MasterRecord::new("1");
    master.map_url = "https://maps.example/1".to_string();

    let merged = merge_facility(&entry, Some(&master), "");
    assert_eq!(merged.map_url, "https://old.example/1");
}

#[test]
fn test_no_empty_where_a_source_has_value() {
    let mut entry = facility("1", "");
    entry.address = "横浜市港北区菊名1-1".to_string();
    entry.ward.clear();
    let mut master = MasterRecord::new("1");
    master.name = "さくら".to_string();
    master.lat = "35.5".to_string();
    master.lng = "139.6".to_string();
    master.address = "別住所".to_string();

    let merged = merge_facility(&entry, Some(&master), "港北区");
    assert_eq!(merged.name, "さくら");
    assert_eq!(merged.address, "横浜市港北区菊名1-1");
    assert_eq!(merged.lat, "35.5");
    assert_eq!(merged.lng, "139.6");
    assert_eq!(merged.ward, "港北区");
}

#[test]
fn test_merge_snapshot_is_idempotent() {
    let mut snapshot = Snapshot::new("2026-02-01", "港北区");
    let mut first = facility("2", "ひまわり");
    first.totals = Counts::new(1, 2, 3);
    first.age_groups.insert("0歳".to_string(), Counts::new(0, 1, 1));
    snapshot.facilities.push(first);
    snapshot.facilities.push(facility("1", "さくら"));

    let mut record = MasterRecord::new("1");
    record.nearest_station = "菊名駅".to_string();
    let master = master_with(vec![record]);

    let once = serde_json::to_vec(&merge_snapshot(&snapshot, &master)).unwrap();
    let twice = serde_json::to_vec(&merge_snapshot(&snapshot, &master)).unwrap();
    assert_eq!(once, twice);

    let merged = merge_snapshot(&snapshot, &master);
    assert_eq!(merged[0].id, "2");
    assert_eq!(merged[0].totals.wait, Some(2));
    assert_eq!(merged[1].nearest_station, "菊名駅");
}
