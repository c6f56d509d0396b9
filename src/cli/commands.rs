//! Command implementations for the ad-report processor CLI
//!
//! The process command wires the pipeline to an in-memory store, ingests the
//! requested exports, and reports counts; the rates command prints the
//! effective per-country configuration.

use crate::app::models::SheetContext;
use crate::app::services::ingest::{IngestPipeline, IngestStats};
use crate::app::services::reconciliation::MemoryStore;
use crate::cli::args::{Args, Commands, ProcessArgs, RatesArgs};
use crate::config::RatesBook;
use crate::constants::is_spreadsheet_extension;
use crate::{Error, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Dispatch to the requested subcommand
pub async fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Process(process_args)) => run_process(process_args).await,
        Some(Commands::Rates(rates_args)) => run_rates(rates_args),
        None => Err(Error::configuration("no command specified")),
    }
}

/// Complete ingestion workflow: configuration, discovery, pipeline, report
pub async fn run_process(args: ProcessArgs) -> Result<()> {
    let start_time = Instant::now();

    setup_logging(args.log_level());
    info!("Starting ad-report processor");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let book = load_rates_book(args.rates_file.as_deref())?;
    let rates = book.for_country(&args.country);
    rates.validate()?;

    let files = discover_export_files(&args.inputs)?;
    info!(
        "Ingesting {} files for country {}",
        files.len(),
        args.country
    );

    let mut ctx = SheetContext::new(&args.country);
    if let Some(currency) = &args.currency {
        ctx = ctx.with_currency(currency);
    }
    if let Some(rate) = args.fx_rate {
        ctx = ctx.with_exchange_rate_override(rate);
    }

    let store = Arc::new(MemoryStore::new());
    let pipeline = IngestPipeline::new(rates, store.clone());

    let progress = if args.show_progress() {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("Ingesting {} files", files.len()));
        bar.enable_steady_tick(Duration::from_millis(120));
        Some(bar)
    } else {
        None
    };

    let stats = pipeline
        .ingest_files(files, &ctx, args.effective_workers())
        .await;

    if let Some(bar) = progress {
        bar.finish_with_message(format!(
            "Done: {} records upserted in {:.1}s",
            stats.upserted,
            start_time.elapsed().as_secs_f64()
        ));
    }

    if let Some(output) = &args.output {
        write_records_json(&store, output)?;
        info!("Wrote upserted records to {}", output.display());
    }

    print_report(&args, &stats);

    if stats.files_processed == 0 && !stats.file_errors.is_empty() {
        return Err(Error::configuration("no input file could be loaded"));
    }
    Ok(())
}

/// Print the effective rate configuration for a country as JSON
pub fn run_rates(args: RatesArgs) -> Result<()> {
    let book = load_rates_book(args.rates_file.as_deref())?;
    let rates = book.for_country(&args.country);
    rates.validate()?;
    let json = serde_json::to_string_pretty(&rates)?;
    println!("{}", json);
    Ok(())
}

/// Set up structured logging to stderr
fn setup_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("adreport_processor={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", level);
}

fn load_rates_book(path: Option<&std::path::Path>) -> Result<RatesBook> {
    match path {
        Some(path) => RatesBook::from_json_file(path),
        None => Ok(RatesBook::default()),
    }
}

/// Expand input paths into a sorted list of spreadsheet export files
fn discover_export_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
                let path = entry.path();
                if path.is_file() && has_spreadsheet_extension(path) {
                    files.push(path.to_path_buf());
                }
            }
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            return Err(Error::configuration(format!(
                "input path does not exist: {}",
                input.display()
            )));
        }
    }

    files.sort();
    files.dedup();

    if files.is_empty() {
        return Err(Error::configuration(
            "no spreadsheet export files found in the given inputs",
        ));
    }
    Ok(files)
}

fn has_spreadsheet_extension(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(is_spreadsheet_extension)
}

/// Dump the stored records as pretty-printed JSON
fn write_records_json(store: &MemoryStore, output: &std::path::Path) -> Result<()> {
    let records = store.records();
    let json = serde_json::to_string_pretty(&records)?;
    std::fs::write(output, json)
        .map_err(|e| Error::io(format!("failed to write {}", output.display()), e))
}

/// Final ingestion report on stdout
fn print_report(args: &ProcessArgs, stats: &IngestStats) {
    if args.quiet {
        println!("{} upserted, {} failed", stats.upserted, stats.failed());
        return;
    }

    println!();
    println!("{}", "Ingestion complete".bold());
    println!("  Files processed:   {}", stats.files_processed);
    println!("  Rows seen:         {}", stats.rows_seen);
    println!(
        "  Skipped:           {} blank, {} totals, {} undated, {} empty, {} duplicate days",
        stats.blank_rows,
        stats.totals_rows,
        stats.undated_rows,
        stats.empty_rows,
        stats.duplicate_days
    );
    println!("  Records upserted:  {}", stats.upserted.to_string().green());

    if stats.failed() > 0 {
        println!(
            "  Failed upserts:    {}",
            stats.failed().to_string().red()
        );
        for failure in &stats.failures {
            println!(
                "    {} {} / {}: {}",
                "!".red(),
                failure.date,
                failure.country_id,
                failure.message
            );
        }
    }
    for error in &stats.file_errors {
        println!("  {} {}", "file error:".red(), error);
    }
}
