use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LoanCalcError;
use crate::types::{Money, Percent};
use crate::LoanCalcResult;

/// Longest schedule the engine will build: 100 years of monthly payments.
pub const MAX_PERIODS: u32 = 1_200;

/// Monthly payments unless a form says otherwise.
pub const DEFAULT_PERIODS_PER_YEAR: u32 = 12;

fn default_periods_per_year() -> u32 {
    DEFAULT_PERIODS_PER_YEAR
}

/// Core inputs to one amortization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Amount borrowed. Zero yields an empty schedule.
    pub principal: Money,
    /// Nominal annual rate as a percentage (8.5 = 8.5% p.a.).
    pub annual_rate_pct: Percent,
    /// Number of payment periods (years x periods_per_year).
    pub periods: u32,
    /// Payment and compounding frequency.
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: u32,
}

impl LoanParameters {
    pub fn new(
        principal: Money,
        annual_rate_pct: Percent,
        periods: u32,
        periods_per_year: u32,
    ) -> LoanCalcResult<Self> {
        let params = LoanParameters {
            principal,
            annual_rate_pct,
            periods,
            periods_per_year,
        };
        params.validate()?;
        Ok(params)
    }

    /// Monthly loan over whole years, the shape every EMI form produces.
    pub fn monthly(principal: Money, annual_rate_pct: Percent, years: u32) -> LoanCalcResult<Self> {
        let periods = years.checked_mul(DEFAULT_PERIODS_PER_YEAR).ok_or_else(|| {
            LoanCalcError::invalid("years", format!("Tenure of {years} years is out of range"))
        })?;
        Self::new(principal, annual_rate_pct, periods, DEFAULT_PERIODS_PER_YEAR)
    }

    /// Reject inputs that would otherwise surface as a division by zero or a
    /// nonsensical schedule. Deserialized parameters skip `new`, so every
    /// engine entry point calls this again.
    pub fn validate(&self) -> LoanCalcResult<()> {
        if self.principal < Decimal::ZERO {
            return Err(LoanCalcError::invalid(
                "principal",
                "Principal cannot be negative",
            ));
        }
        if self.annual_rate_pct < Decimal::ZERO {
            return Err(LoanCalcError::invalid(
                "annual_rate_pct",
                "Annual rate cannot be negative",
            ));
        }
        if self.periods == 0 {
            return Err(LoanCalcError::invalid(
                "periods",
                "Number of periods must be at least 1",
            ));
        }
        if self.periods > MAX_PERIODS {
            return Err(LoanCalcError::invalid(
                "periods",
                format!("Number of periods cannot exceed {MAX_PERIODS}"),
            ));
        }
        if self.periods_per_year == 0 {
            return Err(LoanCalcError::invalid(
                "periods_per_year",
                "Periods per year must be at least 1",
            ));
        }
        Ok(())
    }
}

/// What happens to interest during a repayment holiday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoratoriumInterest {
    /// Simple interest accrues and is added to principal when repayment starts.
    #[default]
    Capitalize,
    /// Borrower services interest each period; principal is untouched.
    PayDuring,
}

/// Pre-processing applied before the level-payment schedule is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum LoanVariant {
    /// Plain amortizing loan.
    #[default]
    Standard,
    /// Repayment holiday of `periods` before the schedule begins.
    Moratorium {
        periods: u32,
        #[serde(default)]
        interest: MoratoriumInterest,
    },
    /// Lump sum due with the final installment.
    Balloon { amount: Money },
}

/// A full loan calculation request as submitted by a calculator page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    pub loan: LoanParameters,
    #[serde(default)]
    pub variant: LoanVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl LoanInput {
    pub fn standard(loan: LoanParameters) -> Self {
        LoanInput {
            loan,
            variant: LoanVariant::Standard,
            label: None,
        }
    }

    pub fn with_variant(mut self, variant: LoanVariant) -> Self {
        self.variant = variant;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_constructor() {
        let p = LoanParameters::monthly(dec!(1_000_000), dec!(8.5), 20).unwrap();
        assert_eq!(p.periods, 240);
        assert_eq!(p.periods_per_year, 12);
    }

    #[test]
    fn test_zero_principal_is_allowed() {
        assert!(LoanParameters::new(Decimal::ZERO, dec!(10), 12, 12).is_ok());
    }

    #[test]
    fn test_rejects_negative_principal() {
        let err = LoanParameters::new(dec!(-1), dec!(10), 12, 12).unwrap_err();
        match err {
            LoanCalcError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_zero_periods_and_frequency() {
        assert!(LoanParameters::new(dec!(1000), dec!(10), 0, 12).is_err());
        assert!(LoanParameters::new(dec!(1000), dec!(10), 12, 0).is_err());
    }

    #[test]
    fn test_rejects_excessive_periods() {
        assert!(LoanParameters::new(dec!(1000), dec!(10), MAX_PERIODS + 1, 12).is_err());
    }

    #[test]
    fn test_input_json_defaults() {
        let input: LoanInput = serde_json::from_str(
            r#"{"loan": {"principal": "250000", "annual_rate_pct": "9", "periods": 60}}"#,
        )
        .unwrap();
        assert_eq!(input.loan.periods_per_year, 12);
        assert_eq!(input.variant, LoanVariant::Standard);
        assert!(input.label.is_none());
    }

    #[test]
    fn test_moratorium_variant_json() {
        let variant: LoanVariant =
            serde_json::from_str(r#"{"Moratorium": {"periods": 24}}"#).unwrap();
        assert_eq!(
            variant,
            LoanVariant::Moratorium {
                periods: 24,
                interest: MoratoriumInterest::Capitalize,
            }
        );
    }
}
