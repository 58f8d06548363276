//! Quote-aware parser for delimited tabular text
//!
//! This module turns raw delimited text with a header row into an ordered
//! sequence of row objects. It is the single parsing path for every tabular
//! input in the crate; there is no naive split-on-delimiter mode.
//!
//! ## Architecture
//!
//! - [`parser`] - `csv` reader setup, quote check and header/row assembly
//! - [`stats`] - Parsing statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use facility_reconciler::app::services::tabular_parser::TabularParser;
//!
//! # fn example() -> facility_reconciler::Result<()> {
//! let table = TabularParser::new().parse_str("inline", "id,name\n1,\"Sakura, East\"\n")?;
//! assert_eq!(table.rows.len(), 1);
//! assert_eq!(table.rows[0]["name"], "Sakura, East");
//! # Ok(())
//! # }
//! ```

pub mod parser;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use parser::{Row, TabularParser};
pub use stats::{ParseStats, Table};
