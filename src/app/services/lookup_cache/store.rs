//! Cache loading and write-through persistence

use super::key::normalize_text;
use crate::app::adapters::filesystem::{read_optional_text, write_json_atomic};
use crate::app::models::{CacheEntry, ResolvedPlace};
use crate::{Error, Result};
use chrono::Utc;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Durable key→place cache backed by a JSON file
#[derive(Debug, Clone, Default)]
pub struct LookupCache {
    path: PathBuf,
    entries: BTreeMap<String, CacheEntry>,
}

impl LookupCache {
    /// Load the cache file; a missing file yields an empty cache
    pub async fn load(path: &Path) -> Result<Self> {
        let entries = match read_optional_text(path).await? {
            Some(text) if !text.trim().is_empty() => serde_json::from_str(&text)
                .map_err(|e| Error::json_parsing(path.display().to_string(), e))?,
            _ => BTreeMap::new(),
        };

        info!(
            "Loaded {} lookup cache entries from {}",
            entries.len(),
            path.display()
        );

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw entry for a key, stale or not
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Entry for a key unless the facility's address changed since it was resolved
    pub fn lookup(&self, key: &str, current_address: &str) -> Option<&CacheEntry> {
        let entry = self.get(key)?;
        if Self::is_stale(entry, current_address) {
            debug!("Cache entry for '{}' is stale (address changed)", key);
            return None;
        }
        Some(entry)
    }

    /// True when `current_address` is non-blank and matches neither the
    /// address the entry was resolved from nor the address it resolved to
    pub fn is_stale(entry: &CacheEntry, current_address: &str) -> bool {
        let current = normalize_text(current_address);
        if current.is_empty() {
            return false;
        }
        let source = normalize_text(&entry.source_address);
        let resolved = entry
            .place
            .address
            .as_deref()
            .map(normalize_text)
            .unwrap_or_default();
        current != source && current != resolved
    }

    /// Record a resolved place and persist the whole cache immediately
    pub fn put(
        &mut self,
        key: impl Into<String>,
        query: impl Into<String>,
        source_address: &str,
        place: ResolvedPlace,
    ) -> Result<()> {
        let key = key.into();
        let entry = CacheEntry {
            query: query.into(),
            source_address: source_address.trim().to_string(),
            resolved_at: Utc::now(),
            place,
        };
        self.entries.insert(key.clone(), entry);
        write_json_atomic(&self.path, &self.entries)?;
        debug!("Cached lookup for '{}'", key);
        Ok(())
    }
}
