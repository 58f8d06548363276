//! Core tabular parser implementation
//!
//! Records are read with the `csv` crate in flexible mode so that ragged rows
//! reach the row assembly step instead of failing the file. A quoted field
//! may contain the delimiter, line breaks and doubled quotes. Header and row
//! assembly then maps each record onto the header names.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, warn};

use super::stats::{ParseStats, Table};
use crate::{Error, Result};

/// One parsed row: header name to trimmed value
pub type Row = BTreeMap<String, String>;

const QUOTE: u8 = b'"';

/// Parser for delimited text with a header row
#[derive(Debug, Clone)]
pub struct TabularParser {
    delimiter: u8,
}

impl Default for TabularParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TabularParser {
    /// Comma-delimited, double-quoted
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Use a different field delimiter (e.g. tab)
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read and parse a file
    pub fn parse_file(&self, path: &Path) -> Result<Table> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;
        self.parse_str(&path.display().to_string(), &text)
    }

    /// Parse text; `source` names the input in error messages
    ///
    /// Empty lines are skipped by the reader itself; lines whose fields are
    /// all whitespace count as blank rows in the stats.
    pub fn parse_str(&self, source: &str, text: &str) -> Result<Table> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

        self.check_quotes(source, &normalized)?;

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .delimiter(self.delimiter)
            .quote(QUOTE)
            .from_reader(normalized.as_bytes());

        let mut records = csv_reader.records();

        // First non-blank record is the header
        let header_record = loop {
            match records.next() {
                Some(record) => {
                    let record = record.map_err(|e| csv_error(source, &e))?;
                    if !is_blank(&record) {
                        break record;
                    }
                }
                None => {
                    debug!("No header row in {}", source);
                    return Ok(Table::default());
                }
            }
        };
        let headers = sanitize_headers(&header_record);

        let mut stats = ParseStats::new();
        let mut rows = Vec::new();

        for record in records {
            let record = record.map_err(|e| csv_error(source, &e))?;
            stats.total_records += 1;

            if is_blank(&record) {
                stats.blank_rows_skipped += 1;
                continue;
            }

            if record.len() < headers.len() {
                stats.short_rows += 1;
            } else if record.len() > headers.len() {
                stats.long_rows += 1;
                warn!(
                    "{} line {}: {} fields for {} columns, surplus dropped",
                    source,
                    record_line(&record),
                    record.len(),
                    headers.len()
                );
            }

            let row: Row = headers
                .iter()
                .enumerate()
                .map(|(i, header)| (header.clone(), record.get(i).unwrap_or("").to_string()))
                .collect();

            rows.push(row);
            stats.rows_parsed += 1;
        }

        debug!(
            "Parsed {} rows from {} ({} blank skipped)",
            stats.rows_parsed, source, stats.blank_rows_skipped
        );

        Ok(Table {
            headers,
            rows,
            stats,
        })
    }

    /// Reject a quoted field still open at end of input
    ///
    /// The reader would otherwise close it silently and swallow the rest of
    /// the file into one value. A quote only opens a field at field start;
    /// anywhere else it is literal text, as in the reader.
    fn check_quotes(&self, source: &str, text: &str) -> Result<()> {
        #[derive(Clone, Copy)]
        enum State {
            FieldStart,
            Unquoted,
            Quoted,
            QuoteInQuoted,
        }

        let mut state = State::FieldStart;
        let mut line = 1;
        let mut quote_line = 0;

        for byte in text.bytes() {
            if byte == b'\n' {
                line += 1;
            }
            state = match state {
                State::FieldStart if byte == QUOTE => {
                    quote_line = line;
                    State::Quoted
                }
                State::Quoted if byte == QUOTE => State::QuoteInQuoted,
                State::Quoted => State::Quoted,
                State::QuoteInQuoted if byte == QUOTE => State::Quoted,
                _ if byte == self.delimiter || byte == b'\n' => State::FieldStart,
                _ => State::Unquoted,
            };
        }

        if matches!(state, State::Quoted) {
            return Err(Error::csv_parsing(
                source,
                quote_line,
                "unterminated quoted field at end of input",
            ));
        }
        Ok(())
    }
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.iter().all(|f| f.is_empty())
}

fn record_line(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn csv_error(source: &str, e: &csv::Error) -> Error {
    let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
    Error::csv_parsing(source, line, e.to_string())
}

/// Name blank headers by position and suffix duplicates
fn sanitize_headers(raw: &csv::StringRecord) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.iter()
        .enumerate()
        .map(|(i, header)| {
            let mut name = header.to_string();
            if name.is_empty() {
                name = format!("col{}", i);
            }
            let count = seen.entry(name.clone()).or_insert(0);
            let unique = if *count == 0 {
                name.clone()
            } else {
                format!("{}_{}", name, count)
            };
            *count += 1;
            unique
        })
        .collect()
}
