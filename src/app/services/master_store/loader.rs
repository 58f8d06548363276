//! Master table loading

use super::MasterStore;
use crate::app::adapters::filesystem::read_optional_text;
use crate::app::models::MasterRecord;
use crate::app::services::tabular_parser::TabularParser;
use crate::constants::{MASTER_COLUMNS, MASTER_ID_COLUMN};
use crate::{Error, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Counters collected while loading the master table
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct LoadStats {
    pub rows_read: usize,
    pub records_loaded: usize,
    pub blank_ids_skipped: usize,
    pub duplicate_ids_skipped: usize,
}

impl MasterStore {
    /// Load the master table at `path`
    ///
    /// A missing file yields an empty store bound to `path` so the first
    /// save creates it. Rows whose identifier is blank after trimming are
    /// discarded; when an identifier repeats, the first row wins.
    ///
    /// # Errors
    /// * `Error::CsvParsing` for malformed input (unterminated quote)
    /// * `Error::DataValidation` when rows exist but there is no id column
    /// * `Error::Io` when the file exists but cannot be read
    pub async fn load(path: &Path) -> Result<Self> {
        let mut store = Self::new(path);

        let Some(text) = read_optional_text(path).await? else {
            info!(
                "Master table {} does not exist, starting empty",
                path.display()
            );
            return Ok(store);
        };

        let table = TabularParser::new().parse_str(&path.display().to_string(), &text)?;

        if !table.rows.is_empty() && !table.has_column(MASTER_ID_COLUMN) {
            return Err(Error::data_validation(format!(
                "master table {} has no '{}' column",
                path.display(),
                MASTER_ID_COLUMN
            )));
        }

        for header in &table.headers {
            if !MASTER_COLUMNS.contains(&header.as_str()) {
                debug!("Preserving extra master column '{}'", header);
                store.extra_columns.insert(header.clone());
            }
        }

        for row in &table.rows {
            store.load_stats.rows_read += 1;

            let Some(record) = MasterRecord::from_row(row) else {
                store.load_stats.blank_ids_skipped += 1;
                continue;
            };

            if store.records.contains_key(&record.facility_id) {
                warn!(
                    "Duplicate facility_id '{}' in {}, keeping the first row",
                    record.facility_id,
                    path.display()
                );
                store.load_stats.duplicate_ids_skipped += 1;
                continue;
            }

            store.records.insert(record.facility_id.clone(), record);
            store.load_stats.records_loaded += 1;
        }

        info!(
            "Loaded {} master records from {} ({} blank ids, {} duplicates skipped)",
            store.load_stats.records_loaded,
            path.display(),
            store.load_stats.blank_ids_skipped,
            store.load_stats.duplicate_ids_skipped
        );

        Ok(store)
    }
}
