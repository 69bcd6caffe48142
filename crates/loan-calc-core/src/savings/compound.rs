use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{SavingsYear, MAX_YEARS};
use crate::error::LoanCalcError;
use crate::time_value;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::LoanCalcResult;

/// How often interest is added to the balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompoundingFrequency {
    #[default]
    Annually,
    SemiAnnually,
    Quarterly,
    Monthly,
    Daily,
}

impl CompoundingFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            CompoundingFrequency::Annually => 1,
            CompoundingFrequency::SemiAnnually => 2,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::Monthly => 12,
            CompoundingFrequency::Daily => 365,
        }
    }
}

/// Input for lump-sum compound interest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundInput {
    pub principal: Money,
    pub annual_rate_pct: Percent,
    pub years: u32,
    #[serde(default)]
    pub frequency: CompoundingFrequency,
}

/// Output of [`compound_interest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundOutput {
    pub maturity_amount: Money,
    pub interest_earned: Money,
    /// (1 + r/n)^n - 1, as a percentage.
    pub effective_annual_rate_pct: Percent,
    pub year_by_year: Vec<SavingsYear>,
}

/// A = P x (1 + r/n)^(n x t).
pub fn compound_interest(
    input: &CompoundInput,
) -> LoanCalcResult<ComputationOutput<CompoundOutput>> {
    let start = Instant::now();
    validate_compound_input(input)?;

    let n = input.frequency.periods_per_year();
    let rate = time_value::periodic_rate(input.annual_rate_pct, n)?;
    let annual_growth = time_value::growth_factor(rate, n)?;

    let mut year_by_year = Vec::with_capacity(input.years as usize);
    for year in 1..=input.years {
        let value = input
            .principal
            .checked_mul(time_value::growth_factor(rate, n * year)?)
            .ok_or_else(|| LoanCalcError::overflow(format!("compound value after year {year}")))?;
        year_by_year.push(SavingsYear {
            year,
            invested: input.principal,
            value,
            gain: value - input.principal,
        });
    }

    let maturity_amount = year_by_year
        .last()
        .map(|y| y.value)
        .unwrap_or(input.principal);

    let output = CompoundOutput {
        maturity_amount,
        interest_earned: maturity_amount - input.principal,
        effective_annual_rate_pct: ((annual_growth - Decimal::ONE) * dec!(100)).round_dp(4),
        year_by_year,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Compound interest — discrete compounding",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

fn validate_compound_input(input: &CompoundInput) -> LoanCalcResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(LoanCalcError::invalid(
            "principal",
            "Principal must be positive",
        ));
    }
    if input.annual_rate_pct < Decimal::ZERO {
        return Err(LoanCalcError::invalid(
            "annual_rate_pct",
            "Annual rate cannot be negative",
        ));
    }
    if input.years == 0 || input.years > MAX_YEARS {
        return Err(LoanCalcError::invalid(
            "years",
            format!("Term must be between 1 and {MAX_YEARS} years"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_huge_principal_is_an_overflow_error() {
        let input = CompoundInput {
            principal: Decimal::MAX,
            annual_rate_pct: dec!(10),
            years: 1,
            frequency: CompoundingFrequency::Annually,
        };
        match compound_interest(&input).unwrap_err() {
            LoanCalcError::ArithmeticOverflow { context } => assert!(context.contains("year 1")),
            other => panic!("Expected ArithmeticOverflow, got {:?}", other),
        }
    }

    #[test]
    fn test_annual_compounding() {
        let input = CompoundInput {
            principal: dec!(100_000),
            annual_rate_pct: dec!(10),
            years: 5,
            frequency: CompoundingFrequency::Annually,
        };
        let out = compound_interest(&input).unwrap().result;
        assert_eq!(out.maturity_amount, dec!(161_051));
        assert_eq!(out.interest_earned, dec!(61_051));
        assert_eq!(out.effective_annual_rate_pct, dec!(10));
    }

    #[test]
    fn test_more_frequent_compounding_earns_more() {
        let mut input = CompoundInput {
            principal: dec!(100_000),
            annual_rate_pct: dec!(8),
            years: 3,
            frequency: CompoundingFrequency::Annually,
        };
        let annual = compound_interest(&input).unwrap().result.maturity_amount;
        input.frequency = CompoundingFrequency::Quarterly;
        let quarterly = compound_interest(&input).unwrap().result.maturity_amount;
        input.frequency = CompoundingFrequency::Daily;
        let daily = compound_interest(&input).unwrap().result.maturity_amount;
        assert!(annual < quarterly);
        assert!(quarterly < daily);
    }

    #[test]
    fn test_monthly_effective_rate() {
        let input = CompoundInput {
            principal: dec!(1000),
            annual_rate_pct: dec!(12),
            years: 1,
            frequency: CompoundingFrequency::Monthly,
        };
        let out = compound_interest(&input).unwrap().result;
        // 1.01^12 - 1 = 12.6825%
        assert_eq!(out.effective_annual_rate_pct, dec!(12.6825));
    }

    #[test]
    fn test_rejects_zero_years() {
        let input = CompoundInput {
            principal: dec!(1000),
            annual_rate_pct: dec!(5),
            years: 0,
            frequency: CompoundingFrequency::Monthly,
        };
        assert!(compound_interest(&input).is_err());
    }
}
