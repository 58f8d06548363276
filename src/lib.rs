//! Facility Reconciler Library
//!
//! A Rust library for reconciling a municipality's monthly childcare-facility
//! capacity and waitlist snapshots against a hand-maintained facility master
//! table, and for filling gaps in that master via an external places lookup.
//!
//! This library provides tools for:
//! - Parsing delimited tabular text with full quote handling
//! - Loading and atomically rewriting the facility master table
//! - Loading, validating and backfilling monthly snapshot documents
//! - Merging snapshot and master data into display-ready records
//! - Enriching master records under a per-run budget with a durable lookup cache
//! - Auditing snapshot/master consistency

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod audit;
        pub mod enrichment;
        pub mod lookup_cache;
        pub mod master_store;
        pub mod places;
        pub mod reconciler;
        pub mod snapshot_store;
        pub mod tabular_parser;
    }
    pub mod adapters {
        pub mod filesystem;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
    pub mod discovery;
}

// Re-export commonly used types
pub use app::models::{Counts, MasterRecord, MergedFacility, Snapshot, SnapshotFacility};
pub use config::{DataPaths, EnrichmentConfig, OverwritePolicy};

/// Result type alias for the facility reconciler
pub type Result<T> = std::result::Result<T, Error>;

/// File-level error types for reconciliation operations
///
/// Row-level lookup failures are deliberately not represented here; see
/// [`app::services::places::LookupError`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited tabular input
    #[error("CSV parsing error in file '{file}' at line {line}: {message}")]
    CsvParsing {
        file: String,
        line: usize,
        message: String,
    },

    /// Malformed JSON document (snapshot, cache or config file)
    #[error("JSON parsing error in file '{file}': {source}")]
    JsonParsing {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// Master store, snapshot or cache could not be written
    #[error("Persistence error for '{path}': {message}")]
    Persistence {
        path: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with location
    pub fn csv_parsing(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::CsvParsing {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a JSON parsing error
    pub fn json_parsing(file: impl Into<String>, source: serde_json::Error) -> Self {
        Self::JsonParsing {
            file: file.into(),
            source,
        }
    }

    /// Create a persistence error
    pub fn persistence(
        path: impl Into<String>,
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Persistence {
            path: path.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// True for errors that mean a file on disk is unusable or unwritable
    pub fn is_file_level(&self) -> bool {
        matches!(
            self,
            Self::CsvParsing { .. } | Self::JsonParsing { .. } | Self::Persistence { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::Persistence {
            path: "unknown".to_string(),
            message: "CSV write failed".to_string(),
            source: Some(Box::new(error)),
        }
    }
}
