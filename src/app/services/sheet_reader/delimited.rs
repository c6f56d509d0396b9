//! CSV export loading
//!
//! Daily reports exported as CSV carry every value as text; typing happens
//! downstream in the value parsers.

use super::{Cell, RawSheet};
use crate::{Error, Result};
use std::path::Path;
use tracing::debug;

/// Load a CSV export as a single sheet named after the file stem
pub fn load_csv(path: &Path) -> Result<RawSheet> {
    let file = path.display().to_string();
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::io(format!("failed to read CSV file {}", file), e))?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("csv")
        .to_string();

    load_csv_str(&content, name, &file)
}

/// Parse CSV text that is already in memory
pub fn load_csv_str(content: &str, name: String, file: &str) -> Result<RawSheet> {
    // Strip UTF-8 BOM if present
    let text = content.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for result in reader.records() {
        let record =
            result.map_err(|e| Error::csv_parsing(file, "malformed CSV record", Some(e)))?;

        if headers.is_none() {
            if record.iter().all(|f| f.trim().is_empty()) {
                continue;
            }
            headers = Some(record.iter().map(|f| f.to_string()).collect());
            continue;
        }

        rows.push(
            record
                .iter()
                .map(|f| {
                    if f.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(f.to_string())
                    }
                })
                .collect(),
        );
    }

    let headers =
        headers.ok_or_else(|| Error::csv_parsing(file, "CSV file has no header row", None))?;

    debug!(
        "Loaded CSV '{}': {} columns, {} data rows",
        name,
        headers.len(),
        rows.len()
    );

    Ok(RawSheet {
        name,
        headers,
        rows,
    })
}
