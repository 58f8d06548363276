//! Command-line argument definitions for the facility reconciler
//!
//! Every enrichment option can also be given through an environment variable
//! so scheduled jobs can configure a run without a wrapper script.

use crate::config::{EnrichmentConfig, OverwritePolicy};
use crate::constants::DEFAULT_RECENT_MONTHS;
use crate::{Error, Result};
use chrono::NaiveDate;
use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the facility reconciler
///
/// Reconciles monthly childcare-facility snapshots against the facility
/// master table and fills gaps in the master from an external places lookup.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "facility-reconciler",
    version,
    about = "Reconcile monthly childcare-facility snapshots with the facility master",
    long_about = "Batch tool for a municipality's childcare-facility open data. Keeps the \
                  hand-maintained facility master in step with the monthly capacity and \
                  waitlist snapshots, fills missing addresses, coordinates and transit \
                  information from Google Places under a per-run budget, and reports \
                  facilities that appeared or disappeared."
)]
pub struct Args {
    /// Data directory holding the master, the cache and the month snapshots
    ///
    /// Defaults to ./data when it exists, otherwise the per-user data directory.
    #[arg(
        short = 'd',
        long = "data-dir",
        value_name = "PATH",
        env = "FACILITY_DATA_DIR",
        global = true,
        help = "Data directory (master, lookup cache, snapshots)"
    )]
    pub data_dir: Option<PathBuf>,

    /// Optional JSON configuration file for the enrichment pass
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Path to an enrichment configuration file (JSON)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Fill gaps in the master from the external places lookup
    Enrich(EnrichArgs),
    /// Backfill blank snapshot fields from the master in every month file
    Apply(ApplyArgs),
    /// Emit merged display records for one month as JSON
    Merge(MergeArgs),
    /// Report new, retired and per-month facility counts
    Audit(AuditArgs),
    /// Add master rows for facilities that only appear in snapshots
    Expand(ExpandArgs),
}

/// Arguments for the enrich command
#[derive(Debug, Clone, Parser)]
pub struct EnrichArgs {
    /// Restrict the pass to one ward (e.g. 港北区); empty means all wards
    #[arg(long = "ward", value_name = "WARD", env = "WARD_FILTER")]
    pub ward: Option<String>,

    /// Municipality every accepted address must mention
    #[arg(long = "city", value_name = "CITY", env = "CITY_FILTER")]
    pub city: Option<String>,

    /// Maximum number of master rows updated in this run
    #[arg(long = "max-updates", value_name = "COUNT", env = "MAX_UPDATES")]
    pub max_updates: Option<usize>,

    /// Only consider rows with a blank address, coordinates or a bad station
    #[arg(
        long = "only-suspect",
        value_name = "BOOL",
        env = "ONLY_BAD_ROWS",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub only_suspect: Option<bool>,

    /// Reject results whose address lacks the city or the ward
    #[arg(
        long = "strict-address-check",
        value_name = "BOOL",
        env = "STRICT_ADDRESS_CHECK",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub strict_address_check: Option<bool>,

    /// Delay before each external request in seconds
    #[arg(long = "sleep", value_name = "SECONDS", env = "GOOGLE_API_SLEEP_SEC")]
    pub request_delay_secs: Option<f64>,

    /// Upper bound for one row's lookup in seconds
    #[arg(long = "timeout", value_name = "SECONDS", env = "LOOKUP_TIMEOUT_SEC")]
    pub lookup_timeout_secs: Option<u64>,

    /// Nearby transit station search radius in meters
    #[arg(long = "radius", value_name = "METERS", env = "NEARBY_RADIUS_M")]
    pub nearby_radius_m: Option<u32>,

    /// Persist the master every N updated rows (0 = only at the end)
    #[arg(long = "checkpoint-every", value_name = "ROWS")]
    pub checkpoint_every: Option<usize>,

    #[arg(
        long = "overwrite-phone",
        value_name = "BOOL",
        env = "OVERWRITE_PHONE",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub overwrite_phone: Option<bool>,

    #[arg(
        long = "overwrite-website",
        value_name = "BOOL",
        env = "OVERWRITE_WEBSITE",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub overwrite_website: Option<bool>,

    #[arg(
        long = "overwrite-map-url",
        value_name = "BOOL",
        env = "OVERWRITE_MAP_URL",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub overwrite_map_url: Option<bool>,

    #[arg(
        long = "overwrite-nearest-station",
        value_name = "BOOL",
        env = "OVERWRITE_NEAREST_STATION",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub overwrite_nearest_station: Option<bool>,

    #[arg(
        long = "overwrite-walk-minutes",
        value_name = "BOOL",
        env = "OVERWRITE_WALK_MINUTES",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub overwrite_walk_minutes: Option<bool>,

    /// Google Maps Platform API key
    #[arg(
        long = "api-key",
        value_name = "KEY",
        env = "GOOGLE_MAPS_API_KEY",
        hide_env_values = true
    )]
    pub api_key: Option<String>,

    /// Write the misses report to this file instead of the data directory
    #[arg(long = "misses-report", value_name = "FILE")]
    pub misses_report: Option<PathBuf>,
}

/// Arguments for the apply command
#[derive(Debug, Clone, Parser)]
pub struct ApplyArgs {
    /// Restrict the backfill to one ward
    #[arg(long = "ward", value_name = "WARD", env = "WARD_FILTER")]
    pub ward: Option<String>,

    /// Report what would change without rewriting any month file
    #[arg(long = "dry-run", help = "Show changed months without rewriting them")]
    pub dry_run: bool,
}

/// Arguments for the merge command
#[derive(Debug, Clone, Parser)]
pub struct MergeArgs {
    /// Month key of the snapshot to merge (YYYY-MM-DD); latest month when omitted
    #[arg(short = 'm', long = "month", value_name = "YYYY-MM-DD")]
    pub month: Option<String>,

    /// Output file; stdout when omitted
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the audit command
#[derive(Debug, Clone, Parser)]
pub struct AuditArgs {
    /// Output format for the report
    #[arg(long = "format", value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Number of most recent months a facility must be absent from to count as retired
    #[arg(long = "recent-months", value_name = "COUNT", default_value_t = DEFAULT_RECENT_MONTHS)]
    pub recent_months: usize,

    /// Restrict the retired-facility check to one ward
    #[arg(long = "ward", value_name = "WARD", env = "WARD_FILTER")]
    pub ward: Option<String>,
}

/// Arguments for the expand command
#[derive(Debug, Clone, Parser)]
pub struct ExpandArgs {
    /// Only add facilities of this ward
    #[arg(long = "ward", value_name = "WARD", env = "WARD_FILTER")]
    pub ward: Option<String>,

    /// Report additions without rewriting the master
    #[arg(long = "dry-run", help = "Show additions without rewriting the master")]
    pub dry_run: bool,
}

/// Output format options for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    /// Log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress bars are hidden in quiet mode
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl EnrichArgs {
    /// Layer the CLI/env values over `base` (defaults or a config file)
    pub fn apply_to(&self, base: EnrichmentConfig) -> EnrichmentConfig {
        let mut config = base;

        if let Some(ward) = &self.ward {
            config = config.with_ward_filter(ward.as_str());
        }
        if let Some(city) = &self.city {
            config = config.with_city(city.trim());
        }
        if let Some(max_updates) = self.max_updates {
            config = config.with_max_updates(max_updates);
        }
        if let Some(only_suspect) = self.only_suspect {
            config = config.with_only_suspect(only_suspect);
        }
        if let Some(strict) = self.strict_address_check {
            config = config.with_strict_address_check(strict);
        }
        if let Some(secs) = self.request_delay_secs {
            config = config.with_request_delay_secs(secs);
        }
        if let Some(secs) = self.lookup_timeout_secs {
            config = config.with_lookup_timeout_secs(secs);
        }
        if let Some(radius) = self.nearby_radius_m {
            config = config.with_nearby_radius_m(radius);
        }
        if let Some(rows) = self.checkpoint_every {
            config = config.with_checkpoint_every(rows);
        }

        let overwrite = self.overwrite_policy(config.overwrite);
        config.with_overwrite(overwrite)
    }

    fn overwrite_policy(&self, base: OverwritePolicy) -> OverwritePolicy {
        OverwritePolicy {
            phone: self.overwrite_phone.unwrap_or(base.phone),
            website: self.overwrite_website.unwrap_or(base.website),
            map_url: self.overwrite_map_url.unwrap_or(base.map_url),
            nearest_station: self
                .overwrite_nearest_station
                .unwrap_or(base.nearest_station),
            walk_minutes: self.overwrite_walk_minutes.unwrap_or(base.walk_minutes),
        }
    }

    /// API key, required only once a lookup is actually needed
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                Error::configuration(
                    "GOOGLE_MAPS_API_KEY is not set (use --api-key, the environment or a .env file)",
                )
            })
    }
}

impl MergeArgs {
    /// Reject malformed month keys before touching the filesystem
    pub fn validate(&self) -> Result<()> {
        if let Some(month) = &self.month {
            if NaiveDate::parse_from_str(month, "%Y-%m-%d").is_err() {
                return Err(Error::configuration(format!(
                    "Invalid month '{}', expected YYYY-MM-DD",
                    month
                )));
            }
        }
        Ok(())
    }
}

impl AuditArgs {
    pub fn validate(&self) -> Result<()> {
        if self.recent_months == 0 {
            return Err(Error::configuration("--recent-months must be at least 1"));
        }
        Ok(())
    }
}

/// Trimmed ward filter; empty when absent
pub fn ward_filter(ward: &Option<String>) -> String {
    ward.as_deref().map(str::trim).unwrap_or("").to_string()
}
