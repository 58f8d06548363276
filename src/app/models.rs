//! Data models for facility reconciliation
//!
//! This module contains the core data structures for representing master
//! facility records, monthly snapshot documents, merged display records and
//! resolved external lookups.

use crate::constants::{LEGACY_STATION_COLUMN, MASTER_ID_COLUMN};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// True when a field holds nothing but whitespace (full-width spaces included)
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Parse a walk-minutes cell such as "7", "7.0" or " 12 " into whole minutes
pub fn parse_minutes(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed.eq_ignore_ascii_case("null") {
        return None;
    }
    let parsed: f64 = trimmed.parse().ok()?;
    if parsed.is_finite() && parsed >= 0.0 {
        Some(parsed.round() as u32)
    } else {
        None
    }
}

// =============================================================================
// Master Record
// =============================================================================

/// One row of the hand-maintained facility master table
///
/// All values are kept as trimmed text exactly as they appear in the table.
/// Columns outside the fixed schema (including the legacy `station` column)
/// are carried in `extra` so a load/save cycle never drops data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterRecord {
    pub facility_id: String,
    pub name: String,
    pub name_kana: String,
    pub ward: String,
    pub address: String,
    pub lat: String,
    pub lng: String,
    pub map_url: String,
    pub facility_type: String,
    pub phone: String,
    pub website: String,
    pub notes: String,
    pub nearest_station: String,
    pub station_kana: String,
    pub walk_minutes: String,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl MasterRecord {
    /// Create an empty record for a facility identifier
    pub fn new(facility_id: impl Into<String>) -> Self {
        Self {
            facility_id: facility_id.into(),
            ..Default::default()
        }
    }

    /// Read a column by its header name
    pub fn get(&self, column: &str) -> Option<&str> {
        let value = match column {
            "facility_id" => &self.facility_id,
            "name" => &self.name,
            "name_kana" => &self.name_kana,
            "ward" => &self.ward,
            "address" => &self.address,
            "lat" => &self.lat,
            "lng" => &self.lng,
            "map_url" => &self.map_url,
            "facility_type" => &self.facility_type,
            "phone" => &self.phone,
            "website" => &self.website,
            "notes" => &self.notes,
            "nearest_station" => &self.nearest_station,
            "station_kana" => &self.station_kana,
            "walk_minutes" => &self.walk_minutes,
            other => return self.extra.get(other).map(String::as_str),
        };
        Some(value.as_str())
    }

    /// Write a column by its header name; unknown columns land in `extra`
    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        let value = value.into().trim().to_string();
        let slot = match column {
            "facility_id" => &mut self.facility_id,
            "name" => &mut self.name,
            "name_kana" => &mut self.name_kana,
            "ward" => &mut self.ward,
            "address" => &mut self.address,
            "lat" => &mut self.lat,
            "lng" => &mut self.lng,
            "map_url" => &mut self.map_url,
            "facility_type" => &mut self.facility_type,
            "phone" => &mut self.phone,
            "website" => &mut self.website,
            "notes" => &mut self.notes,
            "nearest_station" => &mut self.nearest_station,
            "station_kana" => &mut self.station_kana,
            "walk_minutes" => &mut self.walk_minutes,
            other => {
                self.extra.insert(other.to_string(), value);
                return;
            }
        };
        *slot = value;
    }

    /// Build a record from a parsed row, or `None` if the identifier is blank
    pub fn from_row(row: &BTreeMap<String, String>) -> Option<Self> {
        let facility_id = row.get(MASTER_ID_COLUMN).map(|s| s.trim()).unwrap_or("");
        if facility_id.is_empty() {
            return None;
        }

        let mut record = Self::new(facility_id);
        for (column, value) in row {
            if column == MASTER_ID_COLUMN {
                continue;
            }
            record.set(column, value.as_str());
        }
        Some(record)
    }

    /// Nearest station name from the legacy `station` column, if any
    pub fn legacy_station(&self) -> &str {
        self.extra
            .get(LEGACY_STATION_COLUMN)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Nearest station, preferring `nearest_station` over the legacy spelling
    pub fn best_station(&self) -> &str {
        if !is_blank(&self.nearest_station) {
            &self.nearest_station
        } else {
            self.legacy_station()
        }
    }

    /// Values for the given header in order, empty for absent columns
    pub fn to_row(&self, headers: &[String]) -> Vec<String> {
        headers
            .iter()
            .map(|column| self.get(column).unwrap_or("").to_string())
            .collect()
    }

    /// True when the coordinates are missing or unparseable
    pub fn lacks_coordinates(&self) -> bool {
        self.coordinates().is_none()
    }

    /// Parsed (lat, lng) pair
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat: f64 = self.lat.trim().parse().ok()?;
        let lng: f64 = self.lng.trim().parse().ok()?;
        Some((lat, lng))
    }
}

// =============================================================================
// Monthly Snapshot
// =============================================================================

/// Accept / wait / enrolled triple for a facility or one age bracket
///
/// Values are optional because upstream tables leave cells blank; negative
/// values are rejected at load time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Counts {
    #[serde(default, deserialize_with = "lenient_count")]
    pub accept: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub wait: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub enrolled: Option<u32>,
    /// Derived figures the upstream producer adds (capacity, ratios)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Counts {
    pub fn new(accept: u32, wait: u32, enrolled: u32) -> Self {
        Self {
            accept: Some(accept),
            wait: Some(wait),
            enrolled: Some(enrolled),
            extra: Map::new(),
        }
    }
}

/// One facility entry of a monthly snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotFacility {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name_kana: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ward: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lat: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lng: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub map_url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub website: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub nearest_station: String,
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub walk_minutes: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub facility_type: String,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub notes: String,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub station_kana: String,
    #[serde(default)]
    pub totals: Counts,
    #[serde(default, alias = "ages")]
    pub age_groups: BTreeMap<String, Counts>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SnapshotFacility {
    pub fn new(id: impl Into<String>, name: impl Into<String>, ward: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ward: ward.into(),
            ..Default::default()
        }
    }
}

/// One month of published capacity/waitlist data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "lenient_string")]
    pub month: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ward: String,
    #[serde(default)]
    pub facilities: Vec<SnapshotFacility>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Snapshot {
    pub fn new(month: impl Into<String>, ward: impl Into<String>) -> Self {
        Self {
            month: month.into(),
            ward: ward.into(),
            ..Default::default()
        }
    }

    /// Find a facility entry by identifier
    pub fn facility(&self, id: &str) -> Option<&SnapshotFacility> {
        self.facilities.iter().find(|f| f.id == id)
    }
}

// =============================================================================
// Merged Display Record
// =============================================================================

/// Display-ready facility record handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedFacility {
    pub id: String,
    pub name: String,
    pub name_kana: String,
    pub ward: String,
    pub address: String,
    pub lat: String,
    pub lng: String,
    pub map_url: String,
    /// Same value as `map_url`, for consumers that predate the rename
    #[serde(rename = "google_map_url")]
    pub legacy_map_url: String,
    pub facility_type: String,
    pub phone: String,
    pub website: String,
    pub notes: String,
    pub nearest_station: String,
    pub station_kana: String,
    pub walk_minutes: Option<u32>,
    pub totals: Counts,
    pub age_groups: BTreeMap<String, Counts>,
}

// =============================================================================
// External Lookup Results
// =============================================================================

/// Fields resolved by the external places lookup
///
/// Every field is optional: the lookup may resolve a place but not, say, a
/// website or a nearby station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlace {
    /// Display name of the place
    #[serde(default)]
    pub name: Option<String>,
    /// Place categories, most specific first
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub map_url: Option<String>,
    #[serde(default)]
    pub nearest_station: Option<String>,
    #[serde(default)]
    pub walk_minutes: Option<u32>,
}

/// One durable lookup cache entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Query text sent to the external service
    pub query: String,
    /// Address the facility had when this entry was resolved
    #[serde(default)]
    pub source_address: String,
    pub resolved_at: DateTime<Utc>,
    pub place: ResolvedPlace,
}

// =============================================================================
// Lenient scalar deserializers
// =============================================================================

/// Accept strings, numbers, booleans and null as trimmed text
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar value, found {}",
            other
        ))),
    }
}

/// Accept walk minutes as a number, numeric string, blank or null
fn lenient_minutes<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(parse_minutes(&s)),
        Value::Number(n) => Ok(n.as_f64().and_then(|f| parse_minutes(&f.to_string()))),
        _ => Ok(None),
    }
}

/// Accept a count as a non-negative number, numeric string, dash (zero), blank or null
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
                return Ok(None);
            }
            if matches!(trimmed, "-" | "－" | "‐" | "—" | "―") {
                return Ok(Some(0));
            }
            trimmed.parse::<f64>().ok()
        }
        other => {
            return Err(serde::de::Error::custom(format!(
                "expected a count, found {}",
                other
            )));
        }
    };

    match number {
        Some(n) if n.is_finite() && n >= 0.0 && n <= u32::MAX as f64 => Ok(Some(n.trunc() as u32)),
        Some(n) if n < 0.0 => Err(serde::de::Error::custom(format!(
            "count must not be negative, found {}",
            n
        ))),
        _ => Err(serde::de::Error::custom("count is not a valid number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_minutes("7"), Some(7));
        assert_eq!(parse_minutes(" 12.0 "), Some(12));
        assert_eq!(parse_minutes(""), None);
        assert_eq!(parse_minutes("-"), None);
        assert_eq!(parse_minutes("徒歩5分"), None);
        assert_eq!(parse_minutes("-3"), None);
    }

    #[test]
    fn test_is_blank_handles_ideographic_space() {
        assert!(is_blank("　 "));
        assert!(!is_blank(" 菊名駅 "));
    }

    #[test]
    fn test_master_record_from_row_skips_blank_id() {
        let mut row = BTreeMap::new();
        row.insert("facility_id".to_string(), "   ".to_string());
        row.insert("name".to_string(), "さくら保育園".to_string());
        assert!(MasterRecord::from_row(&row).is_none());
    }

    #[test]
    fn test_master_record_keeps_unknown_columns() {
        let mut row = BTreeMap::new();
        row.insert("facility_id".to_string(), "1001".to_string());
        row.insert("station".to_string(), "菊名駅".to_string());
        row.insert("phone".to_string(), " 045-000-0000 ".to_string());

        let record = MasterRecord::from_row(&row).unwrap();
        assert_eq!(record.phone, "045-000-0000");
        assert_eq!(record.legacy_station(), "菊名駅");
        assert_eq!(record.best_station(), "菊名駅");
        assert_eq!(record.get("station"), Some("菊名駅"));
    }

    #[test]
    fn test_best_station_prefers_current_column() {
        let mut record = MasterRecord::new("1");
        record.set("station", "菊名駅");
        record.set("nearest_station", "綱島駅");
        assert_eq!(record.best_station(), "綱島駅");
    }

    #[test]
    fn test_snapshot_facility_lenient_fields() {
        let json = r#"{
            "id": 1001,
            "name": " さくら保育園 ",
            "lat": 35.5,
            "lng": null,
            "walk_minutes": "8",
            "totals": {"accept": 3, "wait": "-", "enrolled": null, "capacity": 60},
            "ages": {"0": {"accept": 1, "wait": 2, "enrolled": 3}},
            "updated": "2026-02-01"
        }"#;

        let facility: SnapshotFacility = serde_json::from_str(json).unwrap();
        assert_eq!(facility.id, "1001");
        assert_eq!(facility.name, "さくら保育園");
        assert_eq!(facility.lat, "35.5");
        assert_eq!(facility.lng, "");
        assert_eq!(facility.walk_minutes, Some(8));
        assert_eq!(facility.totals.accept, Some(3));
        assert_eq!(facility.totals.wait, Some(0));
        assert_eq!(facility.totals.enrolled, None);
        assert_eq!(facility.totals.extra.get("capacity"), Some(&Value::from(60)));
        assert_eq!(facility.age_groups["0"].enrolled, Some(3));
        assert_eq!(facility.extra.get("updated"), Some(&Value::from("2026-02-01")));
    }

    #[test]
    fn test_negative_count_rejected() {
        let json = r#"{"id": "1", "totals": {"accept": -1}}"#;
        let result: std::result::Result<SnapshotFacility, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_merged_facility_serializes_legacy_alias() {
        let merged = MergedFacility {
            id: "1".to_string(),
            name: String::new(),
            name_kana: String::new(),
            ward: String::new(),
            address: String::new(),
            lat: String::new(),
            lng: String::new(),
            map_url: "https://maps.example/1".to_string(),
            legacy_map_url: "https://maps.example/1".to_string(),
            facility_type: String::new(),
            phone: String::new(),
            website: String::new(),
            notes: String::new(),
            nearest_station: String::new(),
            station_kana: String::new(),
            walk_minutes: None,
            totals: Counts::default(),
            age_groups: BTreeMap::new(),
        };

        let json = serde_json::to_value(&merged).unwrap();
        assert_eq!(json["google_map_url"], json["map_url"]);
    }
}
