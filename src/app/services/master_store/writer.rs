//! Deterministic, atomic master table rewrite

use super::MasterStore;
use crate::app::adapters::filesystem::write_atomic;
use crate::constants::MASTER_COLUMNS;
use crate::{Error, Result};
use tracing::info;

impl MasterStore {
    /// Header used on save: fixed columns, then extra columns sorted
    pub fn headers(&self) -> Vec<String> {
        let mut headers: Vec<String> = MASTER_COLUMNS.iter().map(|c| c.to_string()).collect();
        headers.extend(
            self.extra_columns
                .iter()
                .filter(|c| !MASTER_COLUMNS.contains(&c.as_str()))
                .cloned(),
        );
        headers
    }

    /// Serialize the table to CSV bytes
    ///
    /// One row per identifier in ascending identifier order, so saving the
    /// same records twice yields identical bytes.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let headers = self.headers();
        let path = self.path.display().to_string();
        let to_persistence = |e: csv::Error| {
            Error::persistence(path.clone(), "CSV serialization failed", Some(Box::new(e)))
        };

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(&headers).map_err(to_persistence)?;
        for record in self.records.values() {
            writer
                .write_record(record.to_row(&headers))
                .map_err(to_persistence)?;
        }

        writer.into_inner().map_err(|e| {
            Error::persistence(
                self.path.display().to_string(),
                "CSV buffer flush failed",
                Some(Box::new(e.into_error())),
            )
        })
    }

    /// Rewrite the master table atomically (temp file + rename)
    pub fn save(&self) -> Result<()> {
        let bytes = self.to_csv_bytes()?;
        write_atomic(&self.path, &bytes)?;
        info!(
            "Saved {} master records to {}",
            self.records.len(),
            self.path.display()
        );
        Ok(())
    }
}
