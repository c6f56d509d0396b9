//! Ad-Report Processor Library
//!
//! A Rust library for ingesting heterogeneous daily spreadsheet exports
//! (advertising spend, revenue, and deposit activity per country) and deriving
//! a fixed set of financial metrics per (date, country) record.
//!
//! This library provides tools for:
//! - Loading xlsx/csv exports into typed sheets regardless of layout
//! - Resolving arbitrary column labels (Russian or English) to canonical fields
//! - Normalizing rows with per-field combination policies and day deduplication
//! - Deriving commissions, payroll, profit, and ROI through a pure metrics engine
//! - Reconciling source-supplied figures with derived ones and upserting them
//!   into a storage collaborator keyed by (date, country)

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod header_resolver;
        pub mod ingest;
        pub mod metrics_engine;
        pub mod reconciliation;
        pub mod row_normalizer;
        pub mod sheet_reader;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{CanonicalRow, DerivedField, DerivedRecord, FieldId, SheetContext};
pub use config::{RatesBook, RatesConfig};

/// Result type alias for the ad-report processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for report ingestion and derivation
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Workbook (xlsx/xls/ods) reading error
    #[error("workbook error in file '{file}': {message}")]
    Workbook { file: String, message: String },

    /// File extension not recognized as a spreadsheet export
    #[error("unsupported export format: {path}")]
    UnsupportedFormat { path: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Storage collaborator failure for a single (date, country) upsert
    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a workbook reading error
    pub fn workbook(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Workbook {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported-format error
    pub fn unsupported_format(path: impl Into<String>) -> Self {
        Self::UnsupportedFormat { path: path.into() }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Configuration {
            message: format!("JSON configuration error: {}", error),
        }
    }
}
