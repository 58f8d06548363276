//! The enrichment loop

use super::misses::{MissRecord, write_misses_report};
use super::policy::{address_matches, apply_place, is_suspect};
use super::stats::{EnrichmentOutcome, EnrichmentStats, StopReason};
use crate::app::models::{MasterRecord, ResolvedPlace};
use crate::app::services::lookup_cache::{LookupCache, LookupKey};
use crate::app::services::master_store::MasterStore;
use crate::app::services::places::{LookupError, PlaceQuery, PlacesLookup};
use crate::config::EnrichmentConfig;
use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Where a row's place came from
enum Resolution {
    Cached(ResolvedPlace),
    Fetched(ResolvedPlace),
}

/// Enrichment pass bound to a lookup implementation and a configuration
pub struct EnrichmentPass<'a, L: PlacesLookup> {
    lookup: &'a L,
    config: EnrichmentConfig,
    misses_report: Option<PathBuf>,
}

impl<'a, L: PlacesLookup> EnrichmentPass<'a, L> {
    pub fn new(lookup: &'a L, config: EnrichmentConfig) -> Self {
        Self {
            lookup,
            config,
            misses_report: None,
        }
    }

    /// Write the misses report to `path` at the end of the pass
    pub fn with_misses_report(mut self, path: impl Into<PathBuf>) -> Self {
        self.misses_report = Some(path.into());
        self
    }

    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    /// Ids of rows passing the ward and suspect filters, in master order
    pub fn select_candidates(&self, master: &MasterStore) -> Vec<String> {
        let ward_filter = self.config.ward_filter.trim();
        master
            .records()
            .filter(|r| ward_filter.is_empty() || r.ward.trim() == ward_filter)
            .filter(|r| !self.config.only_suspect || is_suspect(r))
            .map(|r| r.facility_id.clone())
            .collect()
    }

    /// Run the pass over `master`, consulting and filling `cache`
    ///
    /// Row-level lookup failures are counted and reported, never returned.
    /// Reaching the update budget ends the pass early with
    /// [`StopReason::BudgetExhausted`]. The master is saved at every
    /// checkpoint and once at the end when anything changed.
    ///
    /// # Errors
    /// * `Error::Persistence` when the cache, master or misses report
    ///   cannot be written. The master is still saved when possible.
    pub async fn run(
        &self,
        master: &mut MasterStore,
        cache: &mut LookupCache,
    ) -> Result<EnrichmentOutcome> {
        self.config.validate()?;

        let candidates = self.select_candidates(master);
        let mut stats = EnrichmentStats::new();
        stats.candidates = candidates.len();
        let mut misses = Vec::new();
        let mut stop_reason = StopReason::Completed;

        info!(
            "Enrichment pass: {} candidate rows (ward: {}, only suspect: {}, budget: {})",
            candidates.len(),
            if self.config.ward_filter.is_empty() {
                "all"
            } else {
                self.config.ward_filter.as_str()
            },
            self.config.only_suspect,
            self.config.max_updates
        );

        let progress = self.progress_bar(candidates.len());

        for (index, id) in candidates.iter().enumerate() {
            if stats.rows_updated >= self.config.max_updates {
                let remaining = candidates.len() - index;
                info!(
                    "Update budget of {} reached, {} rows left for the next run",
                    self.config.max_updates, remaining
                );
                stop_reason = StopReason::BudgetExhausted { remaining };
                break;
            }

            let Some(record) = master.get(id).cloned() else {
                continue;
            };
            stats.examined += 1;
            if let Some(pb) = &progress {
                pb.set_message(record.name.clone());
            }

            let outcome = self.process_row(&record, cache, &mut stats).await;
            let changed = match outcome {
                Ok(Some((query, Err(lookup_error)))) => {
                    warn!("{} ({}): {}", record.facility_id, record.name, lookup_error);
                    misses.push(MissRecord {
                        facility_id: record.facility_id.clone(),
                        name: record.name.clone(),
                        ward: record.ward.clone(),
                        query,
                        reason: lookup_error.reason_code().to_string(),
                    });
                    Vec::new()
                }
                Ok(Some((_, Ok(place)))) => match master.get_mut(id) {
                    Some(target) => apply_place(target, &place, &self.config.overwrite),
                    None => Vec::new(),
                },
                Ok(None) => Vec::new(),
                Err(e) => {
                    self.save_after_failure(master, &e);
                    return Err(e);
                }
            };

            if !changed.is_empty() {
                debug!("{}: updated {}", record.facility_id, changed.join(", "));
                stats.rows_updated += 1;
                stats.fields_written += changed.len();

                if self.config.checkpoint_every > 0
                    && stats.rows_updated % self.config.checkpoint_every == 0
                {
                    master.save()?;
                    stats.checkpoints += 1;
                    debug!("Checkpoint after {} updated rows", stats.rows_updated);
                }
            }

            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = &progress {
            pb.finish_with_message(format!("{} rows updated", stats.rows_updated));
        }

        if stats.rows_updated > 0 {
            master.save()?;
        }

        if let Some(path) = &self.misses_report {
            write_misses_report(path, &misses)?;
        }

        info!(
            "Enrichment finished: {} updated, {} cache hits, {} external calls, {} misses",
            stats.rows_updated,
            stats.cache_hits,
            stats.external_calls,
            stats.misses()
        );

        Ok(EnrichmentOutcome {
            stats,
            stop_reason,
            misses,
        })
    }

    /// Resolve one row: cache first, then the external lookup
    ///
    /// Returns `Ok(None)` for rows that cannot be queried, the query text
    /// with either an accepted place or a row-level error otherwise, and
    /// `Err` only for run-level (cache persistence) failures.
    async fn process_row(
        &self,
        record: &MasterRecord,
        cache: &mut LookupCache,
        stats: &mut EnrichmentStats,
    ) -> Result<Option<(String, std::result::Result<ResolvedPlace, LookupError>)>> {
        let Some(key) = LookupKey::for_record(record, &self.config.city, &self.config.ward_filter)
        else {
            debug!("{}: no name to query", record.facility_id);
            return Ok(None);
        };

        let resolution = match cache.lookup(&key.key, &record.address) {
            Some(entry) => {
                stats.cache_hits += 1;
                Resolution::Cached(entry.place.clone())
            }
            None => match self.fetch(record, &key, stats).await {
                Ok(place) => Resolution::Fetched(place),
                Err(e) => {
                    stats.lookup_failures += 1;
                    return Ok(Some((key.query, Err(e))));
                }
            },
        };

        let place = match resolution {
            Resolution::Cached(place) => place,
            Resolution::Fetched(place) => {
                cache.put(&key.key, &key.query, &record.address, place.clone())?;
                place
            }
        };

        if self.config.strict_address_check {
            let ward = if record.ward.trim().is_empty() {
                self.config.ward_filter.as_str()
            } else {
                record.ward.as_str()
            };
            if !address_matches(place.address.as_deref(), &self.config.city, ward) {
                stats.rejected += 1;
                let reason = format!(
                    "address '{}' does not name {}{}",
                    place.address.as_deref().unwrap_or(""),
                    self.config.city,
                    ward
                );
                return Ok(Some((key.query, Err(LookupError::Rejected { reason }))));
            }
        }

        Ok(Some((key.query, Ok(place))))
    }

    /// One delayed, time-bounded external call
    async fn fetch(
        &self,
        record: &MasterRecord,
        key: &LookupKey,
        stats: &mut EnrichmentStats,
    ) -> std::result::Result<ResolvedPlace, LookupError> {
        let delay = self.config.request_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let query = PlaceQuery::new(&key.query)
            .with_fallback(format!("{} {}", record.name.trim(), self.config.city))
            .with_origin(record.coordinates());

        stats.external_calls += 1;
        debug!("{}: external lookup '{}'", record.facility_id, key.query);

        match tokio::time::timeout(self.config.lookup_timeout(), self.lookup.lookup(&query)).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Timeout {
                secs: self.config.lookup_timeout_secs,
            }),
        }
    }

    fn progress_bar(&self, len: usize) -> Option<ProgressBar> {
        if !self.config.show_progress || len == 0 {
            return None;
        }
        let pb = ProgressBar::new(len as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    }

    /// Keep in-memory updates when a run-level failure ends the pass
    fn save_after_failure(&self, master: &MasterStore, cause: &Error) {
        error!("Enrichment aborted: {}", cause);
        if let Err(save_error) = master.save() {
            error!("Master could not be saved either: {}", save_error);
        }
    }
}
