//! Typed boundary for raw calculator form fields.
//!
//! Form values arrive as text from inputs and sliders. Anything blank,
//! non-numeric, or outside the slider range is rejected with the offending
//! field named; nothing is coerced to zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::params::LoanParameters;
use crate::error::LoanCalcError;
use crate::types::{Money, Percent};
use crate::LoanCalcResult;

/// Slider ranges of the EMI calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanFormLimits {
    pub principal_min: Money,
    pub principal_max: Money,
    pub rate_min: Percent,
    pub rate_max: Percent,
    pub tenure_years_min: u32,
    pub tenure_years_max: u32,
}

impl Default for LoanFormLimits {
    fn default() -> Self {
        LoanFormLimits {
            principal_min: dec!(50_000),
            principal_max: dec!(10_000_000),
            rate_min: dec!(5),
            rate_max: dec!(25),
            tenure_years_min: 1,
            tenure_years_max: 30,
        }
    }
}

impl LoanFormLimits {
    /// Parse the three EMI form fields into monthly loan parameters.
    pub fn parse(
        &self,
        principal: &str,
        annual_rate_pct: &str,
        tenure_years: &str,
    ) -> LoanCalcResult<LoanParameters> {
        let principal = parse_decimal("principal", principal)?;
        let rate = parse_decimal("annual_rate_pct", annual_rate_pct)?;
        let years = parse_whole("tenure_years", tenure_years)?;
        self.check(principal, rate, years)?;
        LoanParameters::monthly(principal, rate, years)
    }

    /// Range-check already-typed values against the slider limits.
    pub fn check(&self, principal: Money, annual_rate_pct: Percent, years: u32) -> LoanCalcResult<()> {
        in_range("principal", principal, self.principal_min, self.principal_max)?;
        in_range("annual_rate_pct", annual_rate_pct, self.rate_min, self.rate_max)?;
        in_range(
            "tenure_years",
            Decimal::from(years),
            Decimal::from(self.tenure_years_min),
            Decimal::from(self.tenure_years_max),
        )
    }

    /// Like [`check`](Self::check), but for a term given as a period count.
    /// The tenure is compared in fractional years so no periods are dropped.
    pub fn check_periods(
        &self,
        principal: Money,
        annual_rate_pct: Percent,
        periods: u32,
        periods_per_year: u32,
    ) -> LoanCalcResult<()> {
        if periods_per_year == 0 {
            return Err(LoanCalcError::invalid(
                "periods_per_year",
                "Periods per year must be at least 1",
            ));
        }
        in_range("principal", principal, self.principal_min, self.principal_max)?;
        in_range("annual_rate_pct", annual_rate_pct, self.rate_min, self.rate_max)?;
        in_range(
            "tenure_years",
            Decimal::from(periods) / Decimal::from(periods_per_year),
            Decimal::from(self.tenure_years_min),
            Decimal::from(self.tenure_years_max),
        )
    }
}

/// Parse a numeric form field. Digit-group commas, spaces and a leading
/// rupee sign are accepted; anything else is an error.
pub fn parse_decimal(field: &str, raw: &str) -> LoanCalcResult<Decimal> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('₹')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(LoanCalcError::invalid(field, "A value is required"));
    }

    Decimal::from_str(&cleaned)
        .map_err(|_| LoanCalcError::invalid(field, format!("'{}' is not a number", raw.trim())))
}

/// Parse a whole-number form field such as a tenure in years.
pub fn parse_whole(field: &str, raw: &str) -> LoanCalcResult<u32> {
    let value = parse_decimal(field, raw)?;
    if value.fract() != Decimal::ZERO || value < Decimal::ZERO {
        return Err(LoanCalcError::invalid(
            field,
            format!("'{}' is not a whole number", raw.trim()),
        ));
    }
    value
        .to_u32()
        .ok_or_else(|| LoanCalcError::invalid(field, "Value is out of range"))
}

fn in_range(field: &str, value: Decimal, min: Decimal, max: Decimal) -> LoanCalcResult<()> {
    if value < min || value > max {
        return Err(LoanCalcError::invalid(
            field,
            format!("{value} is outside the allowed range {min}–{max}"),
        ));
    }
    Ok(())
}
