//! Test utilities for master store testing

use std::path::PathBuf;
use tempfile::TempDir;

mod store_tests;

/// Write a master table into a fresh temporary directory
pub fn create_master_file(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("master_facilities.csv");
    std::fs::write(&path, content).unwrap();
    (temp_dir, path)
}

/// Header with the full fixed schema
pub const FULL_HEADER: &str = "facility_id,name,name_kana,ward,address,lat,lng,map_url,facility_type,phone,website,notes,nearest_station,station_kana,walk_minutes";
