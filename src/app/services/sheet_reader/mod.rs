//! Sheet loading for daily report exports
//!
//! Loads xlsx/xls/ods workbooks and CSV exports into a uniform [`RawSheet`]
//! representation while preserving cell types, so the downstream value parsers
//! see numbers, text, and native dates exactly as the export carried them.
//!
//! ## Architecture
//!
//! - [`workbook`] - calamine-backed loading of Excel-family files
//! - [`delimited`] - CSV loading with BOM tolerance
//!
//! Dispatch happens by file extension; every worksheet of a workbook becomes
//! one `RawSheet`, a CSV file becomes exactly one.

pub mod delimited;
pub mod workbook;

use crate::constants::is_workbook_extension;
use crate::{Error, Result};
use chrono::NaiveDate;
use std::path::Path;

/// One cell value with its source representation preserved
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Bool(bool),
}

impl Cell {
    /// True for empty cells and blank text
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the cell as a header label
    pub fn as_label(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Cell::Date(d) => d.to_string(),
            Cell::Bool(b) => b.to_string(),
        }
    }
}

/// A loaded tabular sheet: header labels plus typed data rows
#[derive(Debug, Clone)]
pub struct RawSheet {
    /// Worksheet name, or the file stem for CSV exports
    pub name: String,
    /// Labels of the header row
    pub headers: Vec<String>,
    /// Data rows below the header
    pub rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Load every sheet contained in a spreadsheet export file
pub fn load_file(path: &Path) -> Result<Vec<RawSheet>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    if is_workbook_extension(extension) {
        workbook::load_workbook(path)
    } else if extension.eq_ignore_ascii_case("csv") {
        Ok(vec![delimited::load_csv(path)?])
    } else {
        Err(Error::unsupported_format(path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cell_blank_detection() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::Text("   ".to_string()).is_blank());
        assert!(!Cell::Text("итого".to_string()).is_blank());
        assert!(!Cell::Number(0.0).is_blank());
    }

    #[test]
    fn test_cell_label_rendering() {
        assert_eq!(Cell::Text("Дата".to_string()).as_label(), "Дата");
        assert_eq!(Cell::Number(7.0).as_label(), "7");
        assert_eq!(Cell::Number(7.5).as_label(), "7.5");
        assert_eq!(Cell::Empty.as_label(), "");
    }

    #[test]
    fn test_load_file_rejects_unknown_extension() {
        let result = load_file(Path::new("report.pdf"));
        assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_load_file_dispatches_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daily.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Дата,Приход").unwrap();
        writeln!(file, "05.01.2024,100").unwrap();

        let sheets = load_file(&path).unwrap();
        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].name, "daily");
        assert_eq!(sheets[0].headers, vec!["Дата", "Приход"]);
        assert_eq!(sheets[0].row_count(), 1);
    }
}
