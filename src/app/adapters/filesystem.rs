//! Filesystem helpers shared by the stores
//!
//! Every document this crate rewrites (master table, snapshots, lookup cache,
//! misses report) goes through [`write_atomic`]: the bytes are written to a
//! temporary file in the destination directory and renamed over the target,
//! so a crash mid-write leaves the previous version intact.

use crate::{Error, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Replace `path` with `bytes` via temp file and rename
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    std::fs::create_dir_all(parent).map_err(|e| {
        Error::persistence(
            path.display().to_string(),
            format!("cannot create directory {}", parent.display()),
            Some(Box::new(e)),
        )
    })?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| {
        Error::persistence(
            path.display().to_string(),
            "cannot create temporary file",
            Some(Box::new(e)),
        )
    })?;

    temp.write_all(bytes)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| {
            Error::persistence(
                path.display().to_string(),
                "cannot write temporary file",
                Some(Box::new(e)),
            )
        })?;

    temp.persist(path).map_err(|e| {
        Error::persistence(
            path.display().to_string(),
            "cannot replace file",
            Some(Box::new(e.error)),
        )
    })?;

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Serialize `value` as pretty JSON (UTF-8, non-ASCII kept) and write atomically
pub fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(value).map_err(|e| {
        Error::persistence(
            path.display().to_string(),
            "cannot serialize JSON",
            Some(Box::new(e)),
        )
    })?;
    bytes.push(b'\n');
    write_atomic(path, &bytes)
}

/// Read a UTF-8 text file, `None` when it does not exist
pub async fn read_optional_text(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(format!("Failed to read {}", path.display()), e)),
    }
}

/// Read a UTF-8 text file that must exist
pub async fn read_text(path: &Path) -> Result<String> {
    read_optional_text(path)
        .await?
        .ok_or_else(|| Error::file_not_found(path.display().to_string()))
}
