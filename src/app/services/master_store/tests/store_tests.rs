//! Load/save tests for the master store

use super::*;
use crate::Error;
use crate::app::models::MasterRecord;
use crate::app::services::master_store::MasterStore;

#[tokio::test]
async fn test_load_skips_blank_and_duplicate_ids() {
    let (_dir, path) = create_master_file(
        "facility_id,name,ward\n\
         1001,さくら保育園,港北区\n\
         ,名無し,港北区\n\
         \u{3000},空白,港北区\n\
         1001,重複,港北区\n\
         1002,\"ひまわり, 東\",鶴見区\n",
    );

    let store = MasterStore::load(&path).await.unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store.get("1001").unwrap().name, "さくら保育園");
    assert_eq!(store.get("1002").unwrap().name, "ひまわり, 東");
    assert_eq!(store.load_stats().blank_ids_skipped, 2);
    assert_eq!(store.load_stats().duplicate_ids_skipped, 1);
}

#[tokio::test]
async fn test_load_missing_file_is_empty() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("master_facilities.csv");

    let store = MasterStore::load(&path).await.unwrap();
    assert!(store.is_empty());
    assert_eq!(store.path(), path.as_path());
}

#[tokio::test]
async fn test_load_without_id_column_fails() {
    let (_dir, path) = create_master_file("name,ward\nさくら,港北区\n");
    assert!(matches!(
        MasterStore::load(&path).await,
        Err(Error::DataValidation { .. })
    ));
}

#[tokio::test]
async fn test_load_unterminated_quote_fails() {
    let (_dir, path) = create_master_file("facility_id,name\n1,\"open\n");
    assert!(matches!(
        MasterStore::load(&path).await,
        Err(Error::CsvParsing { .. })
    ));
}

#[tokio::test]
async fn test_save_is_deterministic_and_roundtrips() {
    let (_dir, path) = create_master_file(
        "\u{feff}station,facility_id,name,notes\r\n\
         菊名駅,2,\"B, nursery\",\"line1\r\nline2\"\r\n\
         ,1,A,\r\n",
    );

    let store = MasterStore::load(&path).await.unwrap();
    store.save().unwrap();
    let first = std::fs::read(&path).unwrap();

    let reloaded = MasterStore::load(&path).await.unwrap();
    reloaded.save().unwrap();
    let second = std::fs::read(&path).unwrap();

    assert_eq!(first, second);
    assert_eq!(reloaded.get("2").unwrap().name, "B, nursery");
    assert_eq!(reloaded.get("2").unwrap().notes, "line1\nline2");
    assert_eq!(reloaded.get("2").unwrap().legacy_station(), "菊名駅");

    let text = String::from_utf8(first).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next().unwrap(), format!("{},station", FULL_HEADER));
    assert!(lines.next().unwrap().starts_with("1,A,"));
}

#[tokio::test]
async fn test_insert_and_save_creates_file() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("sub").join("master_facilities.csv");

    let mut store = MasterStore::new(&path);
    let mut record = MasterRecord::new("9");
    record.name = "つばめ".to_string();
    assert!(store.insert(record));
    assert!(!store.insert(MasterRecord::new("  ")));
    store.save().unwrap();

    let reloaded = MasterStore::load(&path).await.unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.ids().collect::<Vec<_>>(), vec!["9"]);
}
