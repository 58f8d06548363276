//! Tests for cache persistence and staleness

use super::*;
use crate::Error;
use crate::app::services::lookup_cache::LookupCache;
use tempfile::TempDir;

#[tokio::test]
async fn test_put_persists_immediately() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("geocode_cache.json");

    let mut cache = LookupCache::load(&path).await.unwrap();
    assert!(cache.is_empty());
    cache
        .put("k1", "さくら 横浜市港北区", "", place("横浜市港北区菊名1-1"))
        .unwrap();

    // A fresh load sees the entry without any explicit flush
    let reloaded = LookupCache::load(&path).await.unwrap();
    assert_eq!(reloaded.len(), 1);
    let entry = reloaded.get("k1").unwrap();
    assert_eq!(entry.query, "さくら 横浜市港北区");
    assert_eq!(entry.place.walk_minutes, Some(6));
}

#[tokio::test]
async fn test_load_malformed_cache_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("geocode_cache.json");
    std::fs::write(&path, "[1, 2").unwrap();

    assert!(matches!(
        LookupCache::load(&path).await,
        Err(Error::JsonParsing { .. })
    ));
}

#[tokio::test]
async fn test_lookup_staleness() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("geocode_cache.json");
    let mut cache = LookupCache::load(&path).await.unwrap();
    cache
        .put("k", "q", "", place("横浜市港北区菊名1-1"))
        .unwrap();

    // blank address: entry resolved it, still valid
    assert!(cache.lookup("k", "").is_some());
    // address now equals what the lookup resolved
    assert!(cache.lookup("k", "横浜市港北区菊名1-1 ").is_some());
    // address was changed by hand since
    assert!(cache.lookup("k", "横浜市鶴見区鶴見1-1").is_none());
    assert!(cache.get("k").is_some());
    assert!(cache.lookup("absent", "").is_none());
}

#[tokio::test]
async fn test_source_address_keeps_entry_valid() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("geocode_cache.json");
    let mut cache = LookupCache::load(&path).await.unwrap();
    cache
        .put("k", "q", "港北区菊名1-1", place("日本、〒222-0011 神奈川県横浜市港北区菊名1-1"))
        .unwrap();

    assert!(cache.lookup("k", "港北区菊名1-1").is_some());
}
