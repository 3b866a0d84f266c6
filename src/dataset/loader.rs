//! CSV loading into header-addressable tables.

use crate::analysis::labels::normalize_key;
use crate::error::DataError;
use std::path::Path;
use tracing::debug;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A parsed CSV file: the header row plus every data row.
///
/// Rows are padded to the header width, so `row[i]` is always valid for a
/// header index `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                if row.len() < width {
                    row.resize(width, String::new());
                }
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first header whose normalized key equals one of
    /// `candidates`. Candidates are tried in priority order.
    pub fn find_column(&self, candidates: &[&str]) -> Option<usize> {
        let keys: Vec<String> = self.headers.iter().map(|h| normalize_key(h)).collect();
        candidates
            .iter()
            .find_map(|candidate| keys.iter().position(|key| key == candidate))
    }
}

/// Read and parse a CSV file.
pub fn load_table(path: &Path) -> Result<CsvTable, DataError> {
    let bytes = std::fs::read(path).map_err(|e| DataError::parse(path, e))?;
    let table = parse_bytes(&bytes).map_err(|e| DataError::parse(path, e))?;
    debug!(
        "Loaded {} ({} columns, {} rows)",
        path.display(),
        table.headers.len(),
        table.len()
    );
    Ok(table)
}

/// Parse CSV content, using the first row as headers.
pub fn parse_bytes(bytes: &[u8]) -> Result<CsvTable, csv::Error> {
    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(String::from).collect());
    }

    Ok(CsvTable::new(headers, rows))
}
