//! Reconciler / merge engine
//!
//! Computes the display-ready record of a facility from its snapshot entry
//! and its master record. For every shared field the snapshot wins when it
//! is non-blank, the master fills in otherwise, and the result is empty only
//! when both sides are. The merge is pure; the "apply master" pass reuses the
//! same resolution to backfill blank snapshot fields on disk.
//!
//! ## Architecture
//!
//! - [`merge`] - Field resolution and merged display records
//! - [`apply`] - Backfilling blank snapshot fields from the master

pub mod apply;
pub mod merge;

#[cfg(test)]
pub mod tests;

pub use apply::{ApplyStats, apply_master_to_snapshot};
pub use merge::{merge_facility, merge_snapshot, resolve_field};
