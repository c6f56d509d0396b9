//! Excel-family workbook loading via calamine

use super::{Cell, RawSheet};
use crate::{Error, Result};
use calamine::{Data, Reader, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;
use tracing::{debug, warn};

/// Load every worksheet of an xlsx/xlsm/xls/ods file.
///
/// The first non-empty row of each worksheet is taken as the header row;
/// worksheets without one are skipped.
pub fn load_workbook(path: &Path) -> Result<Vec<RawSheet>> {
    let file = path.display().to_string();
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| Error::workbook(&file, format!("failed to open workbook: {}", e)))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::new();

    for name in &sheet_names {
        let range = match workbook.worksheet_range(name) {
            Ok(range) => range,
            Err(e) => {
                warn!("Skipping worksheet '{}': {}", name, e);
                continue;
            }
        };

        let mut rows = range.rows().map(convert_row);

        // First non-empty row is the header
        let headers = loop {
            match rows.next() {
                Some(row) if row.iter().any(|cell| !cell.is_blank()) => {
                    break row.iter().map(Cell::as_label).collect::<Vec<_>>();
                }
                Some(_) => continue,
                None => break Vec::new(),
            }
        };

        if headers.is_empty() {
            warn!("Worksheet '{}' has no header row, skipping", name);
            continue;
        }

        let data_rows: Vec<Vec<Cell>> = rows.collect();
        debug!(
            "Loaded worksheet '{}': {} columns, {} data rows",
            name,
            headers.len(),
            data_rows.len()
        );

        sheets.push(RawSheet {
            name: name.clone(),
            headers,
            rows: data_rows,
        });
    }

    if sheets.is_empty() {
        return Err(Error::workbook(&file, "no worksheets with data found"));
    }

    Ok(sheets)
}

fn convert_row(row: &[Data]) -> Vec<Cell> {
    row.iter().map(convert_cell).collect()
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        // Serial value flows through the same date parser as a numeric cell
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) => parse_iso_date(s)
            .map(Cell::Date)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("{:?}", e)),
    }
}

fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}
