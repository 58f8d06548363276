//! Enrichment counters and run outcome

use super::misses::MissRecord;
use serde::Serialize;

/// Counters collected during one enrichment pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrichmentStats {
    /// Rows selected by the ward and suspect filters
    pub candidates: usize,
    /// Rows actually looked at before the pass ended
    pub examined: usize,
    /// Rows whose master record changed
    pub rows_updated: usize,
    /// Individual field values written
    pub fields_written: usize,
    pub cache_hits: usize,
    pub external_calls: usize,
    /// Lookups that failed (timeout, not found, quota, transport)
    pub lookup_failures: usize,
    /// Results discarded by the strict address check
    pub rejected: usize,
    /// Intermediate master saves
    pub checkpoints: usize,
}

impl EnrichmentStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows with a lookup failure or rejection
    pub fn misses(&self) -> usize {
        self.lookup_failures + self.rejected
    }
}

/// Why the pass stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StopReason {
    /// Every candidate row was examined
    Completed,
    /// The update budget was reached; `remaining` candidates were not examined
    BudgetExhausted { remaining: usize },
}

/// Result of a finished enrichment pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichmentOutcome {
    pub stats: EnrichmentStats,
    pub stop_reason: StopReason,
    pub misses: Vec<MissRecord>,
}

impl EnrichmentOutcome {
    pub fn budget_exhausted(&self) -> bool {
        matches!(self.stop_reason, StopReason::BudgetExhausted { .. })
    }

    /// Candidates left for the next run
    pub fn remaining(&self) -> usize {
        match self.stop_reason {
            StopReason::Completed => 0,
            StopReason::BudgetExhausted { remaining } => remaining,
        }
    }
}
