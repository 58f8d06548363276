//! Durable cache of resolved external lookups
//!
//! The cache is a JSON object on disk mapping a lookup key to the place the
//! external service resolved for it. It is consulted before every external
//! call and written through on every `put`, so a crash never loses a result
//! that was already paid for. Entries never expire; an entry only stops
//! matching when the facility's address has changed since it was resolved.
//!
//! ## Architecture
//!
//! - [`key`] - Deterministic key and query derivation from a master record
//! - [`store`] - Loading, reading and write-through persistence

pub mod key;
pub mod store;

#[cfg(test)]
pub mod tests;

pub use key::{LookupKey, normalize_text};
pub use store::LookupCache;
