mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::statements::{CashFlowArgs, IncomeArgs};
use commands::valuation::{DcfArgs, SensitivityArgs};

/// Financial statement and DCF valuation calculations
#[derive(Parser)]
#[command(
    name = "finmodel",
    version,
    about = "Financial statement and DCF valuation calculations",
    long_about = "A CLI for deriving income and cash flow statements from operating \
                  assumptions and valuing cash flow forecasts with decimal precision. \
                  Supports Gordon-growth DCF valuation and one-way sensitivity sweeps."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive an income statement from operating assumptions
    Income(IncomeArgs),
    /// Derive income and cash flow statements from assumptions
    CashFlow(CashFlowArgs),
    /// Run a Discounted Cash Flow valuation over a forecast
    Dcf(DcfArgs),
    /// Sweep one DCF parameter and collect the valuation at each step
    Sensitivity(SensitivityArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Income(args) => commands::statements::run_income(args),
        Commands::CashFlow(args) => commands::statements::run_cash_flow(args),
        Commands::Dcf(args) => commands::valuation::run_dcf(args),
        Commands::Sensitivity(args) => commands::valuation::run_sensitivity(args),
        Commands::Version => {
            println!("finmodel {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
