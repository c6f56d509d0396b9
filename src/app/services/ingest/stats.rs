//! Ingestion statistics and per-row failure reporting

use crate::app::services::row_normalizer::NormalizeStats;
use chrono::NaiveDate;

/// One failed (date, country) upsert
#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    pub date: NaiveDate,
    pub country_id: String,
    pub message: String,
}

/// Counters for one ingestion run, merged across sheets and files
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestStats {
    /// Files successfully loaded
    pub files_processed: usize,
    /// Raw data rows encountered
    pub rows_seen: usize,
    /// Rows skipped for a blank first cell
    pub blank_rows: usize,
    /// Embedded totals rows skipped
    pub totals_rows: usize,
    /// Rows dropped because no date parsed
    pub undated_rows: usize,
    /// Rows dropped because every monetary and count field was zero
    pub empty_rows: usize,
    /// Rows dropped as calendar-day duplicates
    pub duplicate_days: usize,
    /// Canonical rows produced
    pub normalized: usize,
    /// Records upserted into storage
    pub upserted: usize,
    /// Per-row upsert failures
    pub failures: Vec<RowFailure>,
    /// File-level load errors
    pub file_errors: Vec<String>,
}

impl IngestStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold normalization counters into this run
    pub fn absorb(&mut self, normalize: &NormalizeStats) {
        self.rows_seen += normalize.rows_seen;
        self.blank_rows += normalize.blank_rows;
        self.totals_rows += normalize.totals_rows;
        self.undated_rows += normalize.undated_rows;
        self.empty_rows += normalize.empty_rows;
        self.duplicate_days += normalize.duplicate_days;
        self.normalized += normalize.produced;
    }

    /// Record one failed upsert; the batch keeps going
    pub fn record_failure(
        &mut self,
        date: NaiveDate,
        country_id: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.failures.push(RowFailure {
            date,
            country_id: country_id.into(),
            message: message.into(),
        });
    }

    /// Record one file that could not be loaded
    pub fn record_file_error(&mut self, message: impl Into<String>) {
        self.file_errors.push(message.into());
    }

    /// Number of failed upserts
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Merge another run's counters into this one
    pub fn merge(&mut self, other: IngestStats) {
        self.files_processed += other.files_processed;
        self.rows_seen += other.rows_seen;
        self.blank_rows += other.blank_rows;
        self.totals_rows += other.totals_rows;
        self.undated_rows += other.undated_rows;
        self.empty_rows += other.empty_rows;
        self.duplicate_days += other.duplicate_days;
        self.normalized += other.normalized;
        self.upserted += other.upserted;
        self.failures.extend(other.failures);
        self.file_errors.extend(other.file_errors);
    }

    /// Share of seen rows that reached storage, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.rows_seen == 0 {
            100.0
        } else {
            (self.upserted as f64 / self.rows_seen as f64) * 100.0
        }
    }

    /// One-line run summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Ingestion summary: {} rows -> {} upserted ({:.1}%) | \
             blank: {} | totals: {} | undated: {} | empty: {} | duplicates: {} | \
             failed upserts: {} | file errors: {}",
            self.rows_seen,
            self.upserted,
            self.success_rate(),
            self.blank_rows,
            self.totals_rows,
            self.undated_rows,
            self.empty_rows,
            self.duplicate_days,
            self.failed(),
            self.file_errors.len()
        )
    }
}
