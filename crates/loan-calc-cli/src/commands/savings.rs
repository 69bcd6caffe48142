use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use loan_calc_core::savings::compound::{self, CompoundInput, CompoundingFrequency};
use loan_calc_core::savings::sip::{self, SipInput};

use crate::input;

/// Arguments for SIP future value
#[derive(Args)]
pub struct SipArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount invested every month
    #[arg(long)]
    pub monthly: Option<Decimal>,

    /// Expected annual return in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Investment horizon in years
    #[arg(long)]
    pub years: Option<u32>,
}

/// Compounding frequency flag values
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Annually,
    SemiAnnually,
    Quarterly,
    Monthly,
    Daily,
}

impl From<FrequencyArg> for CompoundingFrequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Annually => CompoundingFrequency::Annually,
            FrequencyArg::SemiAnnually => CompoundingFrequency::SemiAnnually,
            FrequencyArg::Quarterly => CompoundingFrequency::Quarterly,
            FrequencyArg::Monthly => CompoundingFrequency::Monthly,
            FrequencyArg::Daily => CompoundingFrequency::Daily,
        }
    }
}

/// Arguments for lump-sum compound interest
#[derive(Args)]
pub struct CompoundArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount invested today
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Compounding frequency
    #[arg(long, value_enum, default_value = "annually")]
    pub frequency: FrequencyArg,
}

pub fn run_sip(args: SipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sip_input: SipInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if args.monthly.is_none() {
        input::stdin::read_stdin()?
            .ok_or("--monthly, --rate and --years are required (or provide --input)")?
    } else {
        SipInput {
            monthly_investment: args.monthly.ok_or("--monthly is required")?,
            expected_return_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
        }
    };

    let result = sip::sip_future_value(&sip_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compound(args: CompoundArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let compound_input: CompoundInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if args.principal.is_none() {
        input::stdin::read_stdin()?
            .ok_or("--principal, --rate and --years are required (or provide --input)")?
    } else {
        CompoundInput {
            principal: args.principal.ok_or("--principal is required")?,
            annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
            frequency: args.frequency.into(),
        }
    };

    let result = compound::compound_interest(&compound_input)?;
    Ok(serde_json::to_value(result)?)
}
