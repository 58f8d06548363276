//! Test utilities for audit testing

use crate::app::models::{MasterRecord, Snapshot, SnapshotFacility};
use crate::app::services::master_store::MasterStore;


pub fn snapshot(month: &str, facilities: &[(&str, &str)]) -> Snapshot {
    let mut snapshot = Snapshot::new(month, "");
    for (id, ward) in facilities {
        snapshot
            .facilities
            .push(SnapshotFacility::new(*id, format!("園{}", id), *ward));
    }
    snapshot
}

pub fn master(rows: &[(&str, &str)]) -> MasterStore {
    let mut store = MasterStore::new("unused.csv");
    for (id, ward) in rows {
        let mut record = MasterRecord::new(*id);
        record.ward = ward.to_string();
        store.insert(record);
    }
    store
}
