//! Misses report

use crate::app::adapters::filesystem::write_atomic;
use crate::{Error, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// One row whose lookup failed or was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissRecord {
    pub facility_id: String,
    pub name: String,
    pub ward: String,
    pub query: String,
    pub reason: String,
}

/// Rewrite the misses report (header only when there were no misses)
pub fn write_misses_report(path: &Path, misses: &[MissRecord]) -> Result<()> {
    let to_persistence = |e: csv::Error| {
        Error::persistence(
            path.display().to_string(),
            "misses report serialization failed",
            Some(Box::new(e)),
        )
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(["facility_id", "name", "ward", "query", "reason"])
        .map_err(to_persistence)?;
    for miss in misses {
        writer.serialize(miss).map_err(to_persistence)?;
    }

    let bytes = writer.into_inner().map_err(|e| {
        Error::persistence(
            path.display().to_string(),
            "misses report flush failed",
            Some(Box::new(e.into_error())),
        )
    })?;

    write_atomic(path, &bytes)?;
    info!("Wrote {} misses to {}", misses.len(), path.display());
    Ok(())
}
