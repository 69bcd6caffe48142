mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::history::HistoryArgs;
use commands::loan::{ExportArgs, ScheduleArgs};
use commands::savings::{CompoundArgs, SipArgs};

/// EMI, amortization schedule and savings calculations
#[derive(Parser)]
#[command(
    name = "emi",
    version,
    about = "EMI, amortization schedule and savings calculations",
    long_about = "A CLI for loan and savings calculations with decimal precision. \
                  Computes EMIs and full repayment schedules (including moratorium \
                  and balloon loans), exports schedules as CSV or TSV, projects SIP \
                  and compound-interest growth, and keeps a history of saved loans."
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
    /// Compute the EMI, totals and repayment schedule of a loan
    Schedule(ScheduleArgs),
    /// Export a loan's repayment schedule as CSV or TSV text
    Export(ExportArgs),
    /// Future value of a monthly SIP
    Sip(SipArgs),
    /// Lump-sum compound interest
    Compound(CompoundArgs),
    /// Manage saved calculations
    History(HistoryArgs),
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

fn fail(e: Box<dyn std::error::Error>) -> ! {
    eprintln!("{}: {}", "error".red().bold(), e);
    process::exit(1);
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Export(args) => match commands::loan::run_export(args) {
            Ok(text) => {
                print!("{}", text);
                return;
            }
            Err(e) => fail(e),
        },
        Commands::Sip(args) => commands::savings::run_sip(args),
        Commands::Compound(args) => commands::savings::run_compound(args),
        Commands::History(args) => commands::history::run_history(args),
        Commands::Version => {
            println!("emi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => fail(e),
    }
}
