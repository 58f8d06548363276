//! Month key discovery

use super::SnapshotStore;
use crate::app::adapters::filesystem::read_optional_text;
use crate::constants::SNAPSHOT_FILE_PATTERN;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Month keys known from the index file and from the directory scan
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct MonthIndex {
    /// Months listed in `months.json`
    pub listed: BTreeSet<String>,
    /// Months with a document on disk
    pub present: BTreeSet<String>,
}

impl MonthIndex {
    /// Sorted, deduplicated union of listed and present months
    pub fn all(&self) -> Vec<String> {
        self.listed.union(&self.present).cloned().collect()
    }

    /// Listed months whose document is missing
    pub fn missing_files(&self) -> Vec<String> {
        self.listed.difference(&self.present).cloned().collect()
    }

    /// Months that can be loaded, oldest first
    pub fn loadable(&self) -> Vec<String> {
        self.present.iter().cloned().collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MonthsDocument {
    Object { months: Vec<String> },
    List(Vec<String>),
}

/// True for a `YYYY-MM-DD` key naming a real calendar date
pub fn is_valid_month_key(key: &str) -> bool {
    key.len() == 10 && NaiveDate::parse_from_str(key, "%Y-%m-%d").is_ok()
}

impl SnapshotStore {
    /// Read `months.json` and scan the data directory for snapshot files
    pub async fn discover_months(&self) -> Result<MonthIndex> {
        let mut index = MonthIndex::default();

        if let Some(text) = read_optional_text(&self.months_index).await? {
            let document: MonthsDocument = serde_json::from_str(&text)
                .map_err(|e| Error::json_parsing(self.months_index.display().to_string(), e))?;
            let months = match document {
                MonthsDocument::Object { months } | MonthsDocument::List(months) => months,
            };
            for month in months {
                let month = month.trim().to_string();
                if is_valid_month_key(&month) {
                    index.listed.insert(month);
                } else {
                    warn!(
                        "Ignoring invalid month key '{}' in {}",
                        month,
                        self.months_index.display()
                    );
                }
            }
        }

        let pattern = format!(
            "{}/{}",
            glob::Pattern::escape(&self.data_dir.display().to_string()),
            SNAPSHOT_FILE_PATTERN
        );
        let entries = glob::glob(&pattern)
            .map_err(|e| Error::configuration(format!("Invalid snapshot pattern: {}", e)))?;

        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!("Skipping unreadable directory entry: {}", e);
                    continue;
                }
            };
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if is_valid_month_key(stem) {
                    index.present.insert(stem.to_string());
                }
            }
        }

        debug!(
            "Discovered {} listed and {} present months in {}",
            index.listed.len(),
            index.present.len(),
            self.data_dir.display()
        );

        Ok(index)
    }
}
