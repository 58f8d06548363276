//! Tests for month discovery

use super::*;
use crate::Error;
use crate::app::services::snapshot_store::discovery::is_valid_month_key;

#[test]
fn test_month_key_validation() {
    assert!(is_valid_month_key("2026-02-01"));
    assert!(!is_valid_month_key("2026-02-30"));
    assert!(!is_valid_month_key("2026-2-1"));
    assert!(!is_valid_month_key("months"));
}

#[tokio::test]
async fn test_discover_union_of_index_and_scan() {
    let (_dir, store) = create_data_dir(&[
        ("months.json", r#"{"months": ["2026-01-01", "2026-03-01", "bogus"]}"#),
        ("2026-01-01.json", snapshot_json("2026-01-01", &["1"]).as_str()),
        ("2026-02-01.json", snapshot_json("2026-02-01", &["1"]).as_str()),
        ("master_facilities.csv", "facility_id\n"),
    ]);

    let index = store.discover_months().await.unwrap();

    assert_eq!(index.all(), vec!["2026-01-01", "2026-02-01", "2026-03-01"]);
    assert_eq!(index.loadable(), vec!["2026-01-01", "2026-02-01"]);
    assert_eq!(index.missing_files(), vec!["2026-03-01"]);
}

#[tokio::test]
async fn test_discover_accepts_plain_list_and_missing_index() {
    let (_dir, store) = create_data_dir(&[("months.json", r#"["2026-04-01"]"#)]);
    let index = store.discover_months().await.unwrap();
    assert_eq!(index.missing_files(), vec!["2026-04-01"]);

    let (_dir, store) = create_data_dir(&[]);
    let index = store.discover_months().await.unwrap();
    assert!(index.all().is_empty());
}

#[tokio::test]
async fn test_discover_malformed_index_is_json_error() {
    let (_dir, store) = create_data_dir(&[("months.json", "{ months: ")]);
    assert!(matches!(
        store.discover_months().await,
        Err(Error::JsonParsing { .. })
    ));
}
