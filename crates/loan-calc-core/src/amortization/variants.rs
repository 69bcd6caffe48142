//! Moratorium and balloon pre-processing.
//!
//! Both variants reduce to a different starting principal for the standard
//! level-payment loop; the engine never special-cases them per period.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::params::{LoanInput, LoanParameters, LoanVariant, MoratoriumInterest};
use crate::error::LoanCalcError;
use crate::time_value;
use crate::types::Money;
use crate::LoanCalcResult;

const PERCENT_DIVISOR: Decimal = dec!(100);

/// Repayment-holiday details reported alongside the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoratoriumSummary {
    pub periods: u32,
    pub interest: MoratoriumInterest,
    /// Simple interest accrued over the holiday.
    pub interest_accrued: Money,
    /// Portion added to principal (Capitalize only).
    pub capitalized_interest: Money,
    /// Portion paid as it fell due (PayDuring only).
    pub interest_paid: Money,
    /// Per-period interest installment during the holiday (PayDuring only).
    pub periodic_interest_payment: Money,
}

/// Balloon details reported alongside the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalloonSummary {
    pub amount: Money,
    /// Balloon discounted to the start of the loan at the periodic rate.
    pub present_value: Money,
}

/// Parameters handed to the core loop plus whatever the variant contributed.
#[derive(Debug, Clone)]
pub struct PreparedLoan {
    pub amortized: LoanParameters,
    pub moratorium: Option<MoratoriumSummary>,
    pub balloon: Option<BalloonSummary>,
}

/// Apply the request's variant, returning the parameters to amortize.
pub fn prepare(input: &LoanInput, warnings: &mut Vec<String>) -> LoanCalcResult<PreparedLoan> {
    let loan = &input.loan;
    match &input.variant {
        LoanVariant::Standard => Ok(PreparedLoan {
            amortized: loan.clone(),
            moratorium: None,
            balloon: None,
        }),
        LoanVariant::Moratorium { periods, interest } => {
            let summary = moratorium(loan, *periods, *interest)?;
            if *periods > loan.periods {
                warnings.push(format!(
                    "Moratorium of {} periods is longer than the {}-period repayment term",
                    periods, loan.periods
                ));
            }
            let mut amortized = loan.clone();
            amortized.principal = loan
                .principal
                .checked_add(summary.capitalized_interest)
                .ok_or_else(|| LoanCalcError::overflow("capitalized moratorium principal"))?;
            Ok(PreparedLoan {
                amortized,
                moratorium: Some(summary),
                balloon: None,
            })
        }
        LoanVariant::Balloon { amount } => {
            let summary = balloon(loan, *amount)?;
            if summary.amount > loan.principal {
                warnings.push(format!(
                    "Balloon of {} exceeds the amount borrowed",
                    summary.amount
                ));
            }
            let mut amortized = loan.clone();
            amortized.principal = loan.principal - summary.present_value;
            Ok(PreparedLoan {
                amortized,
                moratorium: None,
                balloon: Some(summary),
            })
        }
    }
}

/// Simple interest over a repayment holiday.
///
/// Capitalized: P x annual% x (periods / periods_per_year) joins the
/// principal. Serviced: P x r is paid every holiday period instead.
pub fn moratorium(
    loan: &LoanParameters,
    periods: u32,
    treatment: MoratoriumInterest,
) -> LoanCalcResult<MoratoriumSummary> {
    loan.validate()?;
    if periods == 0 {
        return Err(LoanCalcError::invalid(
            "moratorium.periods",
            "Moratorium must last at least 1 period",
        ));
    }

    let years = Decimal::from(periods) / Decimal::from(loan.periods_per_year);
    let interest_accrued = loan
        .principal
        .checked_mul(loan.annual_rate_pct)
        .map(|v| v / PERCENT_DIVISOR)
        .and_then(|v| v.checked_mul(years))
        .ok_or_else(|| LoanCalcError::overflow("moratorium interest"))?;

    let summary = match treatment {
        MoratoriumInterest::Capitalize => MoratoriumSummary {
            periods,
            interest: treatment,
            interest_accrued,
            capitalized_interest: interest_accrued,
            interest_paid: Decimal::ZERO,
            periodic_interest_payment: Decimal::ZERO,
        },
        MoratoriumInterest::PayDuring => {
            let rate = time_value::periodic_rate(loan.annual_rate_pct, loan.periods_per_year)?;
            MoratoriumSummary {
                periods,
                interest: treatment,
                interest_accrued,
                capitalized_interest: Decimal::ZERO,
                interest_paid: interest_accrued,
                periodic_interest_payment: loan
                    .principal
                    .checked_mul(rate)
                    .ok_or_else(|| LoanCalcError::overflow("moratorium interest installment"))?,
            }
        }
    };

    Ok(summary)
}

/// Present value of a balloon due with the final installment.
pub fn balloon(loan: &LoanParameters, amount: Money) -> LoanCalcResult<BalloonSummary> {
    loan.validate()?;
    if amount < Decimal::ZERO {
        return Err(LoanCalcError::invalid(
            "balloon.amount",
            "Balloon payment cannot be negative",
        ));
    }

    let rate = time_value::periodic_rate(loan.annual_rate_pct, loan.periods_per_year)?;
    let present_value = time_value::present_value(amount, rate, loan.periods)?;

    if present_value > loan.principal {
        return Err(LoanCalcError::invalid(
            "balloon.amount",
            format!(
                "Balloon present value {} exceeds principal {}",
                present_value.round_dp(2),
                loan.principal
            ),
        ));
    }

    Ok(BalloonSummary {
        amount,
        present_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ten_year_loan() -> LoanParameters {
        LoanParameters::new(dec!(1_000_000), dec!(10), 120, 12).unwrap()
    }

    #[test]
    fn test_capitalized_moratorium_two_years() {
        let m = moratorium(&ten_year_loan(), 24, MoratoriumInterest::Capitalize).unwrap();
        assert_eq!(m.interest_accrued, dec!(200_000));
        assert_eq!(m.capitalized_interest, dec!(200_000));
        assert_eq!(m.interest_paid, Decimal::ZERO);
    }

    #[test]
    fn test_serviced_moratorium() {
        let m = moratorium(&ten_year_loan(), 6, MoratoriumInterest::PayDuring).unwrap();
        // Half a year of 10% simple interest on 10 lakh
        assert_eq!(m.interest_paid, dec!(50_000));
        assert_eq!(m.capitalized_interest, Decimal::ZERO);
        assert!((m.periodic_interest_payment - dec!(8333.33)).abs() < dec!(0.01));
    }

    #[test]
    fn test_zero_length_moratorium_rejected() {
        assert!(moratorium(&ten_year_loan(), 0, MoratoriumInterest::Capitalize).is_err());
    }

    #[test]
    fn test_balloon_present_value() {
        let loan = LoanParameters::new(dec!(100_000), dec!(12), 12, 12).unwrap();
        let b = balloon(&loan, dec!(20_000)).unwrap();
        // 20,000 / 1.01^12 ≈ 17,748.99
        assert!((b.present_value - dec!(17748.99)).abs() < dec!(0.01));
    }

    #[test]
    fn test_balloon_larger_than_loan_value_rejected() {
        let loan = LoanParameters::new(dec!(100_000), Decimal::ZERO, 12, 12).unwrap();
        let err = balloon(&loan, dec!(150_000)).unwrap_err();
        match err {
            LoanCalcError::InvalidInput { field, .. } => assert_eq!(field, "balloon.amount"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_prepare_balloon_reduces_amortized_principal() {
        let loan = LoanParameters::new(dec!(100_000), dec!(12), 12, 12).unwrap();
        let input = LoanInput::standard(loan).with_variant(LoanVariant::Balloon {
            amount: dec!(20_000),
        });
        let mut warnings = Vec::new();
        let prepared = prepare(&input, &mut warnings).unwrap();
        let pv = prepared.balloon.as_ref().unwrap().present_value;
        assert_eq!(prepared.amortized.principal, dec!(100_000) - pv);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_prepare_long_moratorium_warns() {
        let loan = LoanParameters::new(dec!(100_000), dec!(12), 12, 12).unwrap();
        let input = LoanInput::standard(loan).with_variant(LoanVariant::Moratorium {
            periods: 24,
            interest: MoratoriumInterest::Capitalize,
        });
        let mut warnings = Vec::new();
        prepare(&input, &mut warnings).unwrap();
        assert_eq!(warnings.len(), 1);
    }
}
