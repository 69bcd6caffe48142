use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use loan_calc_core::amortization::export::{schedule_to_csv, schedule_to_tsv};
use loan_calc_core::amortization::form::LoanFormLimits;
use loan_calc_core::amortization::{
    amortize_loan, LoanInput, LoanParameters, LoanVariant, MoratoriumInterest,
};
use loan_calc_core::history::{CalculationStore, JsonFileStore, SavedCalculation};

use crate::input;

/// Interest treatment during a moratorium
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MoratoriumMode {
    /// Accrue simple interest and add it to principal
    Capitalize,
    /// Pay interest every moratorium period
    Pay,
}

impl From<MoratoriumMode> for MoratoriumInterest {
    fn from(mode: MoratoriumMode) -> Self {
        match mode {
            MoratoriumMode::Capitalize => MoratoriumInterest::Capitalize,
            MoratoriumMode::Pay => MoratoriumInterest::PayDuring,
        }
    }
}

/// Loan description shared by `schedule` and `export`
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (8.5 = 8.5% p.a.)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in years (converted using --periods-per-year)
    #[arg(long, conflicts_with = "periods")]
    pub years: Option<u32>,

    /// Tenure as a number of payment periods
    #[arg(long)]
    pub periods: Option<u32>,

    /// Payments per year
    #[arg(long, default_value_t = 12)]
    pub periods_per_year: u32,

    /// Moratorium length in periods before repayment starts
    #[arg(long, conflicts_with = "balloon")]
    pub moratorium: Option<u32>,

    /// Interest treatment during the moratorium
    #[arg(long, value_enum, default_value = "capitalize")]
    pub moratorium_interest: MoratoriumMode,

    /// Balloon amount due with the final installment
    #[arg(long)]
    pub balloon: Option<Decimal>,

    /// Label stored with a saved calculation
    #[arg(long)]
    pub label: Option<String>,

    /// Reject values outside the calculator's slider ranges
    #[arg(long)]
    pub enforce_limits: bool,
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Save the calculation to this JSON history file
    #[arg(long)]
    pub save: Option<String>,
}

/// Schedule export format
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// Comma-separated, for download
    Csv,
    /// Tab-separated, for pasting into a spreadsheet
    Tsv,
}

/// Arguments for schedule export
#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Export format
    #[arg(long, value_enum, default_value = "csv")]
    pub format: ExportFormat,
}

fn build_loan_input(args: &LoanArgs) -> Result<LoanInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_input(path);
    }

    if args.principal.is_none() {
        if let Some(loan_input) = input::stdin::read_stdin::<LoanInput>()? {
            return Ok(loan_input);
        }
    }

    let principal = args
        .principal
        .ok_or("--principal is required (or provide --input)")?;
    let rate = args.rate.ok_or("--rate is required (or provide --input)")?;
    let periods = match (args.periods, args.years) {
        (Some(periods), _) => periods,
        (None, Some(years)) => years
            .checked_mul(args.periods_per_year)
            .ok_or("--years is out of range")?,
        (None, None) => return Err("--years or --periods is required (or provide --input)".into()),
    };

    if args.enforce_limits {
        LoanFormLimits::default().check_periods(principal, rate, periods, args.periods_per_year)?;
    }

    let variant = match (args.moratorium, args.balloon) {
        (Some(periods), _) => LoanVariant::Moratorium {
            periods,
            interest: args.moratorium_interest.into(),
        },
        (None, Some(amount)) => LoanVariant::Balloon { amount },
        (None, None) => LoanVariant::Standard,
    };

    Ok(LoanInput {
        loan: LoanParameters::new(principal, rate, periods, args.periods_per_year)?,
        variant,
        label: args.label.clone(),
    })
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input = build_loan_input(&args.loan)?;
    let result = amortize_loan(&loan_input)?;

    if let Some(ref path) = args.save {
        let mut store = JsonFileStore::open(path)?;
        let id = store.save(SavedCalculation::new(&loan_input, &result.result))?;
        log::info!("saved calculation {} to {}", id, store.path().display());
    }

    Ok(serde_json::to_value(result)?)
}

pub fn run_export(args: ExportArgs) -> Result<String, Box<dyn std::error::Error>> {
    let loan_input = build_loan_input(&args.loan)?;
    let result = amortize_loan(&loan_input)?;
    let text = match args.format {
        ExportFormat::Csv => schedule_to_csv(&result.result.schedule)?,
        ExportFormat::Tsv => schedule_to_tsv(&result.result.schedule)?,
    };
    Ok(text)
}
