//! Configuration management and validation.
//!
//! Provides the configuration structures for the enrichment pass, the
//! per-field overwrite policy and the on-disk data layout. Values come from
//! defaults, an optional JSON config file and finally CLI/env overrides.

use crate::constants::{
    DEFAULT_CHECKPOINT_EVERY, DEFAULT_CITY, DEFAULT_DATA_DIR, DEFAULT_LOOKUP_TIMEOUT_SECS,
    DEFAULT_MAX_UPDATES, DEFAULT_NEARBY_RADIUS_M, DEFAULT_RECENT_MONTHS,
    DEFAULT_REQUEST_DELAY_SECS, LOOKUP_CACHE_FILE_NAME, MASTER_FILE_NAME, MISSES_FILE_NAME,
    MONTHS_INDEX_FILE_NAME,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Independent "always overwrite" switches for lookup-provided fields
///
/// A `false` flag means the field is only filled while it is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverwritePolicy {
    pub phone: bool,
    pub website: bool,
    pub map_url: bool,
    pub nearest_station: bool,
    pub walk_minutes: bool,
}

impl Default for OverwritePolicy {
    fn default() -> Self {
        Self {
            phone: false,
            website: false,
            map_url: false,
            nearest_station: true,
            walk_minutes: true,
        }
    }
}

impl OverwritePolicy {
    /// Fill-only for every field
    pub fn fill_only() -> Self {
        Self {
            phone: false,
            website: false,
            map_url: false,
            nearest_station: false,
            walk_minutes: false,
        }
    }

    /// Overwrite every field
    pub fn overwrite_all() -> Self {
        Self {
            phone: true,
            website: true,
            map_url: true,
            nearest_station: true,
            walk_minutes: true,
        }
    }
}

/// Enrichment pass configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Ward label to restrict the pass to; empty means all wards
    pub ward_filter: String,

    /// Municipality name required in resolved addresses under strict checking
    pub city: String,

    /// Maximum number of master rows updated in this run
    pub max_updates: usize,

    /// Only consider rows that look incomplete or wrong
    pub only_suspect: bool,

    /// Reject lookup results whose address lacks the city or ward name
    pub strict_address_check: bool,

    /// Delay before every external request, in seconds
    pub request_delay_secs: f64,

    /// Upper bound for one row's external lookup, in seconds
    pub lookup_timeout_secs: u64,

    /// Search radius for the nearby station step, in meters
    pub nearby_radius_m: u32,

    /// Persist the master every N updated rows (0 = only at the end)
    pub checkpoint_every: usize,

    /// Per-field overwrite switches
    pub overwrite: OverwritePolicy,

    /// Show a progress bar
    pub show_progress: bool,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            ward_filter: String::new(),
            city: DEFAULT_CITY.to_string(),
            max_updates: DEFAULT_MAX_UPDATES,
            only_suspect: false,
            strict_address_check: true,
            request_delay_secs: DEFAULT_REQUEST_DELAY_SECS,
            lookup_timeout_secs: DEFAULT_LOOKUP_TIMEOUT_SECS,
            nearby_radius_m: DEFAULT_NEARBY_RADIUS_M,
            checkpoint_every: DEFAULT_CHECKPOINT_EVERY,
            overwrite: OverwritePolicy::default(),
            show_progress: true,
        }
    }
}

impl EnrichmentConfig {
    /// Load a JSON config file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read config {}", path.display()), e))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| Error::json_parsing(path.display().to_string(), e))?;
        debug!("Loaded enrichment config from {}", path.display());
        Ok(config)
    }

    /// Restrict to one ward
    pub fn with_ward_filter(mut self, ward: impl Into<String>) -> Self {
        self.ward_filter = ward.into().trim().to_string();
        self
    }

    /// Set the expected municipality
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into().trim().to_string();
        self
    }

    /// Set the per-run update budget
    pub fn with_max_updates(mut self, max_updates: usize) -> Self {
        self.max_updates = max_updates;
        self
    }

    /// Only consider suspect rows
    pub fn with_only_suspect(mut self, only_suspect: bool) -> Self {
        self.only_suspect = only_suspect;
        self
    }

    /// Toggle the strict address check
    pub fn with_strict_address_check(mut self, strict: bool) -> Self {
        self.strict_address_check = strict;
        self
    }

    /// Set the inter-request delay in seconds
    pub fn with_request_delay_secs(mut self, secs: f64) -> Self {
        self.request_delay_secs = secs;
        self
    }

    /// Set the per-row lookup timeout in seconds
    pub fn with_lookup_timeout_secs(mut self, secs: u64) -> Self {
        self.lookup_timeout_secs = secs;
        self
    }

    /// Set the nearby station search radius
    pub fn with_nearby_radius_m(mut self, radius: u32) -> Self {
        self.nearby_radius_m = radius;
        self
    }

    /// Set the checkpoint interval
    pub fn with_checkpoint_every(mut self, rows: usize) -> Self {
        self.checkpoint_every = rows;
        self
    }

    /// Replace the overwrite policy
    pub fn with_overwrite(mut self, overwrite: OverwritePolicy) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Disable the progress bar
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Delay before each external request
    pub fn request_delay(&self) -> Duration {
        Duration::from_secs_f64(self.request_delay_secs.max(0.0))
    }

    /// Bound for a single row's lookup
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    /// Check option ranges
    pub fn validate(&self) -> Result<()> {
        if !self.request_delay_secs.is_finite() || self.request_delay_secs < 0.0 {
            return Err(Error::configuration(format!(
                "request delay must be a non-negative number of seconds, got {}",
                self.request_delay_secs
            )));
        }
        if self.lookup_timeout_secs == 0 {
            return Err(Error::configuration("lookup timeout must be at least 1 second"));
        }
        if self.nearby_radius_m == 0 || self.nearby_radius_m > 50_000 {
            return Err(Error::configuration(format!(
                "nearby radius must be between 1 and 50000 meters, got {}",
                self.nearby_radius_m
            )));
        }
        if self.strict_address_check && self.city.is_empty() {
            return Err(Error::configuration(
                "strict address check needs a city name",
            ));
        }
        Ok(())
    }
}

/// Locations of every file the pipeline reads or writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPaths {
    pub data_dir: PathBuf,
    pub master: PathBuf,
    pub lookup_cache: PathBuf,
    pub months_index: PathBuf,
    pub misses: PathBuf,
    /// Number of trailing months the audit treats as "recent"
    pub recent_months: usize,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl DataPaths {
    /// Standard layout rooted at `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            master: data_dir.join(MASTER_FILE_NAME),
            lookup_cache: data_dir.join(LOOKUP_CACHE_FILE_NAME),
            months_index: data_dir.join(MONTHS_INDEX_FILE_NAME),
            misses: data_dir.join(MISSES_FILE_NAME),
            recent_months: DEFAULT_RECENT_MONTHS,
            data_dir,
        }
    }

    /// Use a master table outside the data directory
    pub fn with_master(mut self, master: impl Into<PathBuf>) -> Self {
        self.master = master.into();
        self
    }

    /// Use a lookup cache outside the data directory
    pub fn with_lookup_cache(mut self, cache: impl Into<PathBuf>) -> Self {
        self.lookup_cache = cache.into();
        self
    }

    /// Change the audit's recent window
    pub fn with_recent_months(mut self, months: usize) -> Self {
        self.recent_months = months;
        self
    }

    /// Snapshot document for a month key
    pub fn snapshot(&self, month: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", month))
    }

    /// The data directory must exist
    pub fn validate(&self) -> Result<()> {
        if !self.data_dir.is_dir() {
            return Err(Error::configuration(format!(
                "data directory does not exist: {}",
                self.data_dir.display()
            )));
        }
        if self.recent_months == 0 {
            return Err(Error::configuration("recent months must be at least 1"));
        }
        Ok(())
    }
}
