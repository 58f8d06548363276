//! Test utilities for enrichment testing

use crate::app::services::lookup_cache::LookupCache;
use crate::app::services::master_store::MasterStore;
use crate::config::EnrichmentConfig;
use std::path::PathBuf;
use tempfile::TempDir;

mod policy_tests;

/// Temporary data directory with a master table and an empty cache
pub struct Fixture {
    pub dir: TempDir,
    pub master_path: PathBuf,
    pub cache_path: PathBuf,
    pub misses_path: PathBuf,
}

impl Fixture {
    pub fn new(master_csv: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let master_path = dir.path().join("master_facilities.csv");
        let cache_path = dir.path().join("geocode_cache.json");
        let misses_path = dir.path().join("enrichment_misses.csv");
        std::fs::write(&master_path, master_csv).unwrap();
        Self {
            dir,
            master_path,
            cache_path,
            misses_path,
        }
    }

    pub async fn load(&self) -> (MasterStore, LookupCache) {
        let master = MasterStore::load(&self.master_path).await.unwrap();
        let cache = LookupCache::load(&self.cache_path).await.unwrap();
        (master, cache)
    }

    pub fn master_bytes(&self) -> Vec<u8> {
        std::fs::read(&self.master_path).unwrap()
    }
}

/// Fast, quiet configuration for tests
pub fn test_config() -> EnrichmentConfig {
    EnrichmentConfig::default()
        .with_request_delay_secs(0.0)
        .without_progress()
}

/// Five blank rows in 港北区
pub const FIVE_ROWS: &str = "facility_id,name,ward,address,phone,website\n\
1,さくら,港北区,,,\n\
2,ひまわり,港北区,,,\n\
3,たんぽぽ,港北区,,,\n\
4,すみれ,港北区,,,\n\
5,つくし,港北区,,,\n";
