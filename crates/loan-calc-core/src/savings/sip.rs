use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{SavingsYear, MAX_YEARS};
use crate::error::LoanCalcError;
use crate::time_value;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::LoanCalcResult;

const MONTHS_PER_YEAR: u32 = 12;

/// Input for a monthly systematic investment plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipInput {
    pub monthly_investment: Money,
    /// Expected annual return as a percentage (12 = 12% p.a.).
    pub expected_return_pct: Percent,
    pub years: u32,
}

/// Output of [`sip_future_value`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipOutput {
    pub invested_amount: Money,
    pub estimated_returns: Money,
    pub future_value: Money,
    pub year_by_year: Vec<SavingsYear>,
}

/// Future value of a monthly SIP, contributions at the start of each month:
/// FV = M x ((1+i)^n - 1) / i x (1+i).
pub fn sip_future_value(input: &SipInput) -> LoanCalcResult<ComputationOutput<SipOutput>> {
    let start = Instant::now();
    validate_sip_input(input)?;

    let rate = time_value::periodic_rate(input.expected_return_pct, MONTHS_PER_YEAR)?;

    let mut year_by_year = Vec::with_capacity(input.years as usize);
    for year in 1..=input.years {
        let months = year * MONTHS_PER_YEAR;
        let invested = input
            .monthly_investment
            .checked_mul(Decimal::from(months))
            .ok_or_else(|| LoanCalcError::overflow("SIP amount invested"))?;
        let value = time_value::annuity_future_value(input.monthly_investment, rate, months, true)?;
        year_by_year.push(SavingsYear {
            year,
            invested,
            value,
            gain: value - invested,
        });
    }

    let (invested_amount, future_value) = year_by_year
        .last()
        .map(|y| (y.invested, y.value))
        .unwrap_or((Decimal::ZERO, Decimal::ZERO));

    log::debug!(
        "SIP {} x {} months at {}%: future value {}",
        input.monthly_investment,
        input.years * MONTHS_PER_YEAR,
        input.expected_return_pct,
        future_value
    );

    let output = SipOutput {
        invested_amount,
        estimated_returns: future_value - invested_amount,
        future_value,
        year_by_year,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "SIP future value — monthly annuity-due",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

fn validate_sip_input(input: &SipInput) -> LoanCalcResult<()> {
    if input.monthly_investment <= Decimal::ZERO {
        return Err(LoanCalcError::invalid(
            "monthly_investment",
            "Monthly investment must be positive",
        ));
    }
    if input.expected_return_pct < Decimal::ZERO {
        return Err(LoanCalcError::invalid(
            "expected_return_pct",
            "Expected return cannot be negative",
        ));
    }
    if input.years == 0 || input.years > MAX_YEARS {
        return Err(LoanCalcError::invalid(
            "years",
            format!("Investment horizon must be between 1 and {MAX_YEARS} years"),
        ));
    }
    Ok(())
}
