//! Command-line argument definitions for the ad-report processor
//!
//! The CLI is a thin adapter: it loads spreadsheet exports, runs the
//! ingestion pipeline, and reports counts. All derivation behavior lives in
//! the library services.

use crate::constants::MAX_CONCURRENT_FILES;
use crate::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the ad-report processor
#[derive(Debug, Clone, Parser)]
#[command(
    name = "adreport-processor",
    version,
    about = "Ingest daily ad-finance report exports and derive per-country metrics",
    long_about = "Ingests heterogeneous daily spreadsheet exports (xlsx/csv, mixed \
                  Russian/English column labels) describing advertising spend, revenue, \
                  and deposit activity, derives commissions, payroll, profit, and ROI \
                  per (date, country) record, and reports ingestion counts."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Ingest report exports and derive metrics (main command)
    Process(ProcessArgs),
    /// Print the effective rate configuration for a country
    Rates(RatesArgs),
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Export files or directories to ingest
    ///
    /// Directories are searched recursively for xlsx/xlsm/xls/ods/csv files.
    #[arg(value_name = "PATH", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Country identifier the ingested sheets belong to
    #[arg(short = 'c', long = "country", value_name = "ID")]
    pub country: String,

    /// JSON rates configuration file (global defaults + per-country overrides)
    #[arg(long = "rates", value_name = "PATH")]
    pub rates_file: Option<PathBuf>,

    /// Local currency code recorded on the batch
    #[arg(long = "currency", value_name = "CODE")]
    pub currency: Option<String>,

    /// Fallback own-revenue exchange rate, used when a sheet carries no
    /// paired local/settled figures to infer it from
    #[arg(long = "fx-rate", value_name = "RATE")]
    pub fx_rate: Option<f64>,

    /// Maximum files ingested concurrently
    #[arg(short = 'w', long = "workers", value_name = "N")]
    pub workers: Option<usize>,

    /// Write the upserted records to a JSON file
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ProcessArgs {
    /// Log level derived from the quiet/verbose flags
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Worker count, defaulting to the core count capped by the file limit
    pub fn effective_workers(&self) -> usize {
        self.workers
            .unwrap_or_else(|| num_cpus::get().min(MAX_CONCURRENT_FILES))
    }

    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Validate argument combinations before running
    pub fn validate(&self) -> Result<()> {
        if self.country.trim().is_empty() {
            return Err(Error::configuration("--country must not be empty"));
        }
        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err(Error::configuration("--workers must be at least 1"));
            }
        }
        if let Some(rate) = self.fx_rate {
            if rate <= 0.0 {
                return Err(Error::configuration("--fx-rate must be positive"));
            }
        }
        Ok(())
    }
}

/// Arguments for the rates command
#[derive(Debug, Clone, Parser)]
pub struct RatesArgs {
    /// Country identifier to resolve
    #[arg(short = 'c', long = "country", value_name = "ID")]
    pub country: String,

    /// JSON rates configuration file
    #[arg(long = "rates", value_name = "PATH")]
    pub rates_file: Option<PathBuf>,
}
