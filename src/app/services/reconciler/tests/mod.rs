//! Test utilities for reconciler testing

use crate::app::models::{MasterRecord, SnapshotFacility};
use crate::app::services::master_store::MasterStore;

mod merge_tests;

/// Snapshot entry with only an id and a name
pub fn facility(id: &str, name: &str) -> SnapshotFacility {
    SnapshotFacility::new(id, name, "港北区")
}

/// Master store holding the given records
pub fn master_with(records: Vec<MasterRecord>) -> MasterStore {
    let mut store = MasterStore::new("unused.csv");
    for record in records {
        store.insert(record);
    }
    store
}
