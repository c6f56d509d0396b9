//! Application constants for the ad-report processor
//!
//! This module contains configuration constants, default rate values,
//! and label markers used throughout the ingestion pipeline.

// =============================================================================
// Spreadsheet File Handling
// =============================================================================

/// File extensions recognized as spreadsheet exports
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods", "csv"];

/// Extensions that are read through the workbook reader rather than the CSV reader
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];

// =============================================================================
// Date Parsing
// =============================================================================

/// Spreadsheet serial date epoch (day 0), as (year, month, day).
///
/// 1899-12-30 rather than 1899-12-31: the offset absorbs the historical
/// lotus leap-year defect so that serial 61 lands on 1900-03-01.
pub const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Lowest serial value accepted as a date
pub const SERIAL_MIN: f64 = 1.0;

/// Highest serial value accepted as a date (late 26th century)
pub const SERIAL_MAX: f64 = 250_000.0;

/// Text date formats tried after the serial representation, in order
pub const TEXT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%d-%m-%Y"];

// =============================================================================
// Row Markers
// =============================================================================

/// First-cell labels that mark an embedded totals row, normalized form.
///
/// Hand-maintained exports routinely append a totals row that is
/// indistinguishable from data except by this marker.
pub const TOTALS_ROW_MARKERS: &[&str] = &["итог", "итого", "всего", "total", "totals"];

// =============================================================================
// Default Commission and Payroll Rates
// =============================================================================

/// Agency commission rate for the facebook ad channel
pub const DEFAULT_FACEBOOK_RATE: f64 = 0.09;

/// Agency commission rate for the google ad channel
pub const DEFAULT_GOOGLE_RATE: f64 = 0.08;

/// Agency commission rate for the tiktok ad channel
pub const DEFAULT_TIKTOK_RATE: f64 = 0.08;

/// Commission retained by the settlement (p2p) channel
pub const DEFAULT_SETTLEMENT_COMMISSION_RATE: f64 = 0.15;

/// Buyer payroll rate, applied to total spend
pub const DEFAULT_BUYER_RATE: f64 = 0.12;

/// Handler payroll rate applied to the settled repeat-deposit sum
pub const DEFAULT_REPEAT_HANDLER_RATE: f64 = 0.04;

/// First-deposit payroll tiers as (minimum count, per-deposit rate).
///
/// A row's tier is the last entry whose minimum does not exceed the
/// first-deposit count, so boundaries are inclusive on the next tier.
pub const DEFAULT_FIRST_DEPOSIT_TIERS: &[(u32, f64)] = &[(0, 3.0), (5, 4.0), (10, 5.0)];

/// First-deposit count at which the daily handler bonus applies
pub const DEFAULT_BONUS_THRESHOLD: u32 = 5;

/// Daily handler bonus amount in settled currency
pub const DEFAULT_BONUS_AMOUNT: f64 = 15.0;

/// Multiplier applied to the first-deposit handler pay
pub const DEFAULT_PAYROLL_MULTIPLIER: f64 = 1.2;

/// Fixed daily pay for the supervisor role
pub const DEFAULT_SUPERVISOR_DAILY_RATE: f64 = 10.0;

// =============================================================================
// Processing Defaults
// =============================================================================

/// Upper bound on concurrent file ingestion
pub const MAX_CONCURRENT_FILES: usize = 8;

// =============================================================================
// Helper Functions
// =============================================================================

/// Check whether a normalized first-cell label marks a totals row
pub fn is_totals_marker(normalized: &str) -> bool {
    TOTALS_ROW_MARKERS
        .iter()
        .any(|marker| normalized.starts_with(marker))
}

/// Check whether a file extension belongs to a supported spreadsheet export
pub fn is_spreadsheet_extension(extension: &str) -> bool {
    let lower = extension.to_ascii_lowercase();
    SPREADSHEET_EXTENSIONS.contains(&lower.as_str())
}

/// Check whether a file extension should be read through the workbook reader
pub fn is_workbook_extension(extension: &str) -> bool {
    let lower = extension.to_ascii_lowercase();
    WORKBOOK_EXTENSIONS.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_markers() {
        assert!(is_totals_marker("итого"));
        assert!(is_totals_marker("итого:"));
        assert!(is_totals_marker("total"));
        assert!(is_totals_marker("totals"));
        assert!(!is_totals_marker("2024-01-05"));
        assert!(!is_totals_marker(""));
    }

    #[test]
    fn test_spreadsheet_extensions() {
        assert!(is_spreadsheet_extension("xlsx"));
        assert!(is_spreadsheet_extension("XLSX"));
        assert!(is_spreadsheet_extension("csv"));
        assert!(!is_spreadsheet_extension("pdf"));

        assert!(is_workbook_extension("xlsx"));
        assert!(!is_workbook_extension("csv"));
    }

    #[test]
    fn test_tier_table_is_sorted() {
        let mins: Vec<u32> = DEFAULT_FIRST_DEPOSIT_TIERS.iter().map(|t| t.0).collect();
        let mut sorted = mins.clone();
        sorted.sort_unstable();
        assert_eq!(mins, sorted);
        assert_eq!(mins[0], 0);
    }
}
