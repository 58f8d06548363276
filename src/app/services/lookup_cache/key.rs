//! Lookup key and query derivation

use crate::app::models::{MasterRecord, is_blank};

/// Collapse every run of whitespace (ideographic space included) to one space
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cache key plus the query text sent on a miss
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupKey {
    pub key: String,
    pub query: String,
}

impl LookupKey {
    /// Derive the key for a master record
    ///
    /// The key uses the city, ward and normalized name only. The address is
    /// left out because enrichment itself fills it; including it would turn
    /// every second run into a miss. `ward_fallback` is used when the record
    /// has no ward of its own.
    pub fn for_record(record: &MasterRecord, city: &str, ward_fallback: &str) -> Option<Self> {
        let name = normalize_text(&record.name);
        if name.is_empty() {
            return None;
        }

        let ward = if is_blank(&record.ward) {
            normalize_text(ward_fallback)
        } else {
            normalize_text(&record.ward)
        };
        let city = normalize_text(city);

        let key = format!("{}|{}|{}", city, ward, name);
        let query = if is_blank(&record.address) {
            normalize_text(&format!("{} {}{}", name, city, ward))
        } else {
            format!("{} {}", name, normalize_text(&record.address))
        };

        Some(Self { key, query })
    }
}
