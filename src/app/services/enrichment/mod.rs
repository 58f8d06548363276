//! Enrichment pass over the facility master
//!
//! Fills gaps in master records from the external places lookup under a
//! per-run update budget. Every candidate row goes cache-first; only a miss
//! triggers an external call, which is delayed, bounded by a timeout and
//! written to the lookup cache before anything else happens with it.
//! Results that fail the strict address check are discarded whole, and each
//! lookup-provided field follows its own overwrite switch.
//!
//! ## Architecture
//!
//! - [`pass`] - Candidate selection and the per-row loop
//! - [`policy`] - Suspect-row predicate, strict address check, field application
//! - [`stats`] - Counters and the run outcome
//! - [`misses`] - Report of rows whose lookup failed or was rejected

pub mod misses;
pub mod pass;
pub mod policy;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use misses::{MissRecord, write_misses_report};
pub use pass::EnrichmentPass;
pub use policy::{address_matches, apply_place, is_suspect};
pub use stats::{EnrichmentOutcome, EnrichmentStats, StopReason};
