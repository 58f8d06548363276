//! Data directory discovery
//!
//! Resolution order: an explicit `--data-dir`, then `./data`, then the
//! per-user data directory (e.g. `~/.local/share/facility-reconciler`).

use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_DATA_DIR, MASTER_FILE_NAME, MONTHS_INDEX_FILE_NAME};

/// Application directory name under the user data directory
const APP_DIR_NAME: &str = "facility-reconciler";

/// Find the data directory to operate on
pub fn find_data_directory(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if !path.is_dir() {
            anyhow::bail!("Data directory not found at {}", path.display());
        }
        return Ok(path.to_path_buf());
    }

    let local = PathBuf::from(DEFAULT_DATA_DIR);
    if local.is_dir() {
        return Ok(local);
    }

    let user_dir = dirs::data_dir()
        .context("Could not determine user data directory")?
        .join(APP_DIR_NAME);
    if user_dir.is_dir() {
        return Ok(user_dir);
    }

    anyhow::bail!(
        "No data directory found. Looked for ./{} and {}; pass --data-dir to choose one.",
        DEFAULT_DATA_DIR,
        user_dir.display()
    )
}

/// One-line description of what a data directory holds, for verbose startup output
pub fn describe_data_directory(path: &Path) -> String {
    let marker = |name: &str| {
        if path.join(name).is_file() {
            name.green().to_string()
        } else {
            format!("{} (missing)", name).yellow().to_string()
        }
    };
    format!(
        "{}: {}, {}",
        path.display().to_string().bright_white(),
        marker(MASTER_FILE_NAME),
        marker(MONTHS_INDEX_FILE_NAME)
    )
}
