//! Test utilities for tabular parser testing

use std::io::Write;
use tempfile::NamedTempFile;


/// Helper to create a temporary file with given content (written verbatim)
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file
}
