//! Test utilities for snapshot store testing

use crate::app::services::snapshot_store::SnapshotStore;
use tempfile::TempDir;

mod discovery_tests;

/// Data directory with the given files written into it
pub fn create_data_dir(files: &[(&str, &str)]) -> (TempDir, SnapshotStore) {
    let temp_dir = TempDir::new().unwrap();
    for (name, content) in files {
        std::fs::write(temp_dir.path().join(name), content).unwrap();
    }
    let store = SnapshotStore::new(temp_dir.path(), temp_dir.path().join("months.json"));
    (temp_dir, store)
}

/// Minimal snapshot document for a month
pub fn snapshot_json(month: &str, ids: &[&str]) -> String {
    let facilities: Vec<String> = ids
        .iter()
        .map(|id| format!(r#"{{"id": "{}", "name": "園{}", "ward": "港北区"}}"#, id, id))
        .collect();
    format!(
        r#"{{"month": "{}", "ward": "港北区", "facilities": [{}]}}"#,
        month,
        facilities.join(",")
    )
}
