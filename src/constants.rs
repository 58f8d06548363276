//! Application constants for the facility reconciler
//!
//! This module contains file names, master table schema, default values and
//! name lists used throughout the reconciliation and enrichment pipeline.

// =============================================================================
// Data Layout
// =============================================================================

/// Default data directory (relative to the working directory)
pub const DEFAULT_DATA_DIR: &str = "data";

/// Hand-maintained facility master table
pub const MASTER_FILE_NAME: &str = "master_facilities.csv";

/// Durable cache of resolved external lookups
pub const LOOKUP_CACHE_FILE_NAME: &str = "geocode_cache.json";

/// Index of published months
pub const MONTHS_INDEX_FILE_NAME: &str = "months.json";

/// Report of rows whose lookup failed or was rejected
pub const MISSES_FILE_NAME: &str = "enrichment_misses.csv";

/// Glob pattern for monthly snapshot documents (e.g. 2026-02-01.json)
pub const SNAPSHOT_FILE_PATTERN: &str = "[0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9].json";

// =============================================================================
// Master Table Schema
// =============================================================================

/// Fixed master columns in output order
pub const MASTER_COLUMNS: &[&str] = &[
    "facility_id",
    "name",
    "name_kana",
    "ward",
    "address",
    "lat",
    "lng",
    "map_url",
    "facility_type",
    "phone",
    "website",
    "notes",
    "nearest_station",
    "station_kana",
    "walk_minutes",
];

/// Identifier column of the master table
pub const MASTER_ID_COLUMN: &str = "facility_id";

/// Older spelling of the nearest station column still present in some tables
pub const LEGACY_STATION_COLUMN: &str = "station";

/// Older spelling of `map_url` expected by older display consumers
pub const LEGACY_MAP_URL_FIELD: &str = "google_map_url";

// =============================================================================
// Enrichment Defaults
// =============================================================================

/// Municipality every facility address must mention under strict checking
pub const DEFAULT_CITY: &str = "横浜市";

/// Maximum number of master rows updated in one enrichment run
pub const DEFAULT_MAX_UPDATES: usize = 200;

/// Delay between external requests in seconds
pub const DEFAULT_REQUEST_DELAY_SECS: f64 = 0.15;

/// Upper bound for a single external lookup in seconds
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 60;

/// Radius for the nearby transit station search in meters
pub const DEFAULT_NEARBY_RADIUS_M: u32 = 2500;

/// Persist the master every N updated rows during a pass
pub const DEFAULT_CHECKPOINT_EVERY: usize = 25;

/// Number of most recent months considered by the audit
pub const DEFAULT_RECENT_MONTHS: usize = 3;

/// Station suffix every normalized station name ends with
pub const STATION_SUFFIX: &str = "駅";

/// Words that mark a "station" candidate as something else (bus stop, park, school ...)
pub const NON_STATION_WORDS: &[&str] = &[
    "入口",
    "交番",
    "バス",
    "停留所",
    "公園",
    "小学校",
    "中学校",
    "高校",
    "病院",
    "郵便局",
    "市役所",
    "区役所",
    "図書館",
    "消防",
    "警察",
];

/// Google Maps Platform base URL
pub const GOOGLE_MAPS_API_BASE: &str = "https://maps.googleapis.com/maps/api";
