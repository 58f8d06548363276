//! Snapshot/master consistency audit
//!
//! Reporting only: nothing here writes a file. The audit lists facilities
//! that appear in the latest snapshot without a master row, master rows that
//! no recent snapshot mentions any more, and a short summary per month.

#[cfg(test)]
pub mod tests;

use crate::app::models::{Snapshot, is_blank};
use crate::app::services::master_store::MasterStore;
use crate::app::services::snapshot_store::MonthIndex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Facility count and ward distribution of one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month: String,
    pub facility_count: usize,
    pub ward_count: usize,
    /// Up to five wards with the most facilities, largest first
    pub top_wards: Vec<(String, usize)>,
}

/// Result of a consistency audit
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditReport {
    /// Month the new-facility check ran against (the latest one)
    pub audited_month: Option<String>,
    /// Months considered "recent" for the retired-facility check
    pub recent_months: Vec<String>,
    /// In the audited snapshot but not in the master
    pub new_facilities: Vec<String>,
    /// In the master but in none of the recent snapshots
    pub retired_facilities: Vec<String>,
    pub months: Vec<MonthSummary>,
    /// Months listed in the index without a document
    pub missing_month_files: Vec<String>,
}

impl AuditReport {
    /// Audit every loaded snapshot against the master
    ///
    /// `snapshots` may be in any order; the latest `recent_months` of them
    /// form the recent window. Master rows outside `ward_filter` (when set)
    /// are ignored by the retired check.
    pub fn build(
        snapshots: &[Snapshot],
        index: &MonthIndex,
        master: &MasterStore,
        recent_months: usize,
        ward_filter: &str,
    ) -> Self {
        let mut ordered: Vec<&Snapshot> = snapshots.iter().collect();
        ordered.sort_by(|a, b| a.month.cmp(&b.month));

        let recent: Vec<&Snapshot> = ordered
            .iter()
            .rev()
            .take(recent_months.max(1))
            .rev()
            .copied()
            .collect();

        let (audited_month, new_facilities) = match ordered.last() {
            Some(latest) => (
                Some(latest.month.clone()),
                find_new_facilities(latest, master),
            ),
            None => (None, Vec::new()),
        };

        Self {
            audited_month,
            recent_months: recent.iter().map(|s| s.month.clone()).collect(),
            new_facilities,
            retired_facilities: if recent.is_empty() {
                Vec::new()
            } else {
                find_retired_facilities(&recent, master, ward_filter)
            },
            months: ordered.iter().map(|s| summarize_month(s)).collect(),
            missing_month_files: index.missing_files(),
        }
    }

    /// True when there is nothing to follow up on
    pub fn is_consistent(&self) -> bool {
        self.new_facilities.is_empty()
            && self.retired_facilities.is_empty()
            && self.missing_month_files.is_empty()
    }
}

/// Snapshot facility ids without a master row, in snapshot order
pub fn find_new_facilities(snapshot: &Snapshot, master: &MasterStore) -> Vec<String> {
    snapshot
        .facilities
        .iter()
        .map(|f| f.id.trim())
        .filter(|id| !id.is_empty() && !master.contains(id))
        .map(str::to_string)
        .collect()
}

/// Master ids that none of the `recent` snapshots mention, in id order
pub fn find_retired_facilities(
    recent: &[&Snapshot],
    master: &MasterStore,
    ward_filter: &str,
) -> Vec<String> {
    let seen: BTreeSet<&str> = recent
        .iter()
        .flat_map(|s| s.facilities.iter().map(|f| f.id.trim()))
        .collect();
    let ward_filter = ward_filter.trim();

    master
        .records()
        .filter(|r| ward_filter.is_empty() || r.ward.trim() == ward_filter)
        .map(|r| r.facility_id.as_str())
        .filter(|id| !seen.contains(id))
        .map(str::to_string)
        .collect()
}

/// Facility count and top wards of one snapshot
pub fn summarize_month(snapshot: &Snapshot) -> MonthSummary {
    let mut wards: BTreeMap<&str, usize> = BTreeMap::new();
    for facility in &snapshot.facilities {
        let ward = if is_blank(&facility.ward) {
            snapshot.ward.trim()
        } else {
            facility.ward.trim()
        };
        if !ward.is_empty() {
            *wards.entry(ward).or_insert(0) += 1;
        }
    }

    let ward_count = wards.len();
    let mut top: Vec<(String, usize)> = wards
        .into_iter()
        .map(|(ward, count)| (ward.to_string(), count))
        .collect();
    // count descending, name ascending for ties
    top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top.truncate(5);

    MonthSummary {
        month: snapshot.month.clone(),
        facility_count: snapshot.facilities.len(),
        ward_count,
        top_wards: top,
    }
}
