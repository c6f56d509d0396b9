use adreport_processor::cli::{args::Args, commands};
use clap::Parser;
use std::process;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(commands::run(args));

    match result {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Ad-Report Processor - Daily Report Ingestion & Metrics");
    println!("======================================================");
    println!();
    println!("Ingest heterogeneous daily spreadsheet exports (xlsx/csv) describing");
    println!("advertising spend, revenue, and deposit activity, and derive per-country");
    println!("financial metrics: commissions, payroll, profit, ROI.");
    println!();
    println!("USAGE:");
    println!("    adreport-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process     Ingest report exports and derive metrics (main command)");
    println!("    rates       Print the effective rate configuration for a country");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Ingest a directory of daily exports for one country:");
    println!("    adreport-processor process reports/ --country PE");
    println!();
    println!("    # Use a rates file and write the derived records out:");
    println!("    adreport-processor process reports/ --country IN \\");
    println!("                               --rates rates.json --output records.json");
    println!();
    println!("    # Show the effective rates for a country:");
    println!("    adreport-processor rates --country PE --rates rates.json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    adreport-processor <COMMAND> --help");
}
