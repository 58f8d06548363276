//! Parsing statistics and result structures for tabular input
//!
//! This module provides the parsed table type and the counters collected
//! while assembling rows from raw records.

use super::parser::Row;

/// Parsed table with its header and row objects
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Trimmed, de-duplicated header names in file order
    pub headers: Vec<String>,

    /// Row objects in file order, entirely blank rows removed
    pub rows: Vec<Row>,

    /// Basic parsing statistics
    pub stats: ParseStats,
}

impl Table {
    /// True when the header contains the given column
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }
}

/// Simple parsing statistics
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ParseStats {
    /// Number of physical records after the header (blank ones included)
    pub total_records: usize,

    /// Number of row objects produced
    pub rows_parsed: usize,

    /// Records dropped because every field was blank
    pub blank_rows_skipped: usize,

    /// Records with fewer fields than the header (padded with blanks)
    pub short_rows: usize,

    /// Records with more fields than the header (surplus dropped)
    pub long_rows: usize,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Records whose shape did not match the header
    pub fn ragged_rows(&self) -> usize {
        self.short_rows + self.long_rows
    }
}
