//! Level-payment amortization engine.
//!
//! Every calculator page funnels through [`compute_schedule`]: the moratorium
//! and balloon variants only change the starting principal before the same
//! period loop runs. All arithmetic uses `rust_decimal::Decimal`, so the
//! schedule closes at exactly zero rather than within a float tolerance.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::export::{breakdown, Breakdown};
use super::params::{LoanInput, LoanParameters};
use super::variants::{self, BalloonSummary, MoratoriumSummary};
use crate::error::LoanCalcError;
use crate::time_value;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::LoanCalcResult;

/// Drift in the final installment worth telling the user about.
const FINAL_PAYMENT_TOLERANCE: Decimal = dec!(0.005);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One period of the repayment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based period index.
    pub period: u32,
    /// Installment paid this period (interest + principal).
    pub payment: Money,
    /// Periodic rate x opening balance.
    pub interest: Money,
    /// Portion of the installment that reduces the balance.
    pub principal: Money,
    /// Closing balance after this period.
    pub balance: Money,
}

/// Result of a single amortization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub periodic_rate: Rate,
    /// Level installment (EMI).
    pub payment: Money,
    pub total_interest: Money,
    pub total_payment: Money,
    pub schedule: Vec<AmortizationRow>,
}

/// Output of [`amortize_loan`], expressed from the borrower's point of view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanOutput {
    pub original_principal: Money,
    /// Principal the level schedule actually repays after variant adjustments.
    pub amortized_principal: Money,
    pub periodic_rate: Rate,
    pub payment: Money,
    /// Everything paid above the original principal, including moratorium
    /// interest and the interest share of a balloon.
    pub total_interest: Money,
    /// Installments + moratorium interest paid + balloon.
    pub total_payment: Money,
    pub breakdown: Breakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moratorium: Option<MoratoriumSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balloon: Option<BalloonSummary>,
    pub schedule: Vec<AmortizationRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the level payment, totals, and full schedule for a loan.
///
/// `annual_rate_pct` is a percentage (8.5 = 8.5% p.a.). A zero principal
/// yields an all-zero result with an empty schedule.
pub fn compute_schedule(
    principal: Money,
    annual_rate_pct: Percent,
    periods: u32,
    periods_per_year: u32,
) -> LoanCalcResult<AmortizationResult> {
    let params = LoanParameters::new(principal, annual_rate_pct, periods, periods_per_year)?;
    amortize(&params)
}

/// [`compute_schedule`] over an already-built parameter set.
pub fn amortize(params: &LoanParameters) -> LoanCalcResult<AmortizationResult> {
    params.validate()?;

    let rate = time_value::periodic_rate(params.annual_rate_pct, params.periods_per_year)?;

    if params.principal.is_zero() {
        return Ok(AmortizationResult {
            periodic_rate: rate,
            payment: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            total_payment: Decimal::ZERO,
            schedule: Vec::new(),
        });
    }

    let payment = time_value::level_payment(params.principal, rate, params.periods)?;

    log::debug!(
        "amortizing {} at {}% over {} periods ({}/yr): payment {}",
        params.principal,
        params.annual_rate_pct,
        params.periods,
        params.periods_per_year,
        payment
    );

    let mut schedule: Vec<AmortizationRow> = Vec::with_capacity(params.periods as usize);
    let mut balance = params.principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_payment = Decimal::ZERO;

    for period in 1..=params.periods {
        let interest = balance
            .checked_mul(rate)
            .ok_or_else(|| LoanCalcError::overflow(format!("interest for period {period}")))?;
        let mut principal_part = payment - interest;

        // Final period absorbs rounding drift so the loan closes at exactly
        // zero; a principal portion larger than the balance is capped so it
        // never goes negative (later rows then carry zero amounts).
        if period == params.periods || principal_part > balance {
            principal_part = balance;
        }

        balance -= principal_part;
        let installment = interest + principal_part;
        total_interest = total_interest
            .checked_add(interest)
            .ok_or_else(|| LoanCalcError::overflow("running total interest"))?;
        total_payment = total_payment
            .checked_add(installment)
            .ok_or_else(|| LoanCalcError::overflow("running total payment"))?;

        schedule.push(AmortizationRow {
            period,
            payment: installment,
            interest,
            principal: principal_part,
            balance,
        });
    }

    Ok(AmortizationResult {
        periodic_rate: rate,
        payment,
        total_interest,
        total_payment,
        schedule,
    })
}

/// Run a calculator request: apply the variant, amortize, and wrap the
/// borrower-level totals in the standard output envelope.
pub fn amortize_loan(input: &LoanInput) -> LoanCalcResult<ComputationOutput<LoanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.loan.validate()?;
    let prepared = variants::prepare(input, &mut warnings)?;
    let core = amortize(&prepared.amortized)?;

    if input.loan.principal.is_zero() {
        warnings.push("Principal is zero; schedule is empty".into());
    }

    if let Some(last) = core.schedule.last() {
        let drift = last.payment - core.payment;
        if drift.abs() >= FINAL_PAYMENT_TOLERANCE {
            warnings.push(format!(
                "Final installment adjusted by {} to close the balance",
                drift.round_dp(2)
            ));
        }
    }

    let original_principal = input.loan.principal;
    let moratorium_interest_paid = prepared
        .moratorium
        .as_ref()
        .map(|m| m.interest_paid)
        .unwrap_or(Decimal::ZERO);
    let balloon_amount = prepared
        .balloon
        .as_ref()
        .map(|b| b.amount)
        .unwrap_or(Decimal::ZERO);

    let total_payment = core
        .total_payment
        .checked_add(moratorium_interest_paid)
        .and_then(|v| v.checked_add(balloon_amount))
        .ok_or_else(|| LoanCalcError::overflow("borrower total payment"))?;
    let total_interest = total_payment - original_principal;

    let output = LoanOutput {
        original_principal,
        amortized_principal: prepared.amortized.principal,
        periodic_rate: core.periodic_rate,
        payment: core.payment,
        total_interest,
        total_payment,
        breakdown: breakdown(original_principal, total_interest),
        moratorium: prepared.moratorium,
        balloon: prepared.balloon,
        schedule: core.schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortization (EMI) with moratorium/balloon pre-processing",
        &serde_json::json!({
            "label": input.label,
            "principal": original_principal.to_string(),
            "annual_rate_pct": input.loan.annual_rate_pct.to_string(),
            "periods": input.loan.periods,
            "periods_per_year": input.loan.periods_per_year,
            "variant": input.variant,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::params::{LoanVariant, MoratoriumInterest};
    use rust_decimal_macros::dec;

    fn home_loan() -> LoanParameters {
        LoanParameters::new(dec!(1_000_000), dec!(8.5), 240, 12).unwrap()
    }

    // -----------------------------------------------------------------------
    // 1. Reference EMI: 10 lakh at 8.5% for 20 years
    // -----------------------------------------------------------------------
    #[test]
    fn test_reference_home_loan_emi() {
        let result = amortize(&home_loan()).unwrap();

        assert!((result.periodic_rate - dec!(0.0070833)).abs() < dec!(0.0000001));
        assert!(
            (result.payment - dec!(8678.23)).abs() < dec!(0.01),
            "EMI should be ~8,678.23, got {}",
            result.payment
        );
        assert!((result.total_payment - dec!(2_082_775.76)).abs() < dec!(0.01));
        assert!((result.total_interest - dec!(1_082_775.76)).abs() < dec!(0.01));
        assert_eq!(result.schedule.len(), 240);
    }

    // -----------------------------------------------------------------------
    // 2. Schedule closes at exactly zero
    // -----------------------------------------------------------------------
    #[test]
    fn test_final_balance_is_exactly_zero() {
        let result = amortize(&home_loan()).unwrap();
        let last = result.schedule.last().unwrap();
        assert_eq!(last.period, 240);
        assert_eq!(last.balance, Decimal::ZERO);
    }

    #[test]
    fn test_principal_parts_sum_to_principal() {
        let result = amortize(&home_loan()).unwrap();
        let repaid: Money = result.schedule.iter().map(|r| r.principal).sum();
        assert!((repaid - dec!(1_000_000)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_totals_are_running_sums() {
        let result = amortize(&home_loan()).unwrap();
        let interest: Money = result.schedule.iter().map(|r| r.interest).sum();
        let paid: Money = result.schedule.iter().map(|r| r.payment).sum();
        assert_eq!(result.total_interest, interest);
        assert_eq!(result.total_payment, paid);
        let identity = result.total_payment - result.total_interest - dec!(1_000_000);
        assert!(identity.abs() < dec!(0.000001));
    }

    // -----------------------------------------------------------------------
    // 3. Zero rate is straight-line
    // -----------------------------------------------------------------------
    #[test]
    fn test_zero_rate_straight_line() {
        let result = compute_schedule(dec!(500_000), Decimal::ZERO, 36, 12).unwrap();
        assert_eq!(result.payment, dec!(500_000) / dec!(36));
        assert_eq!(result.payment.round_dp(2), dec!(13888.89));
        assert_eq!(result.total_interest, Decimal::ZERO);
        assert_eq!(result.schedule.last().unwrap().balance, Decimal::ZERO);
    }

    #[test]
    fn test_zero_principal_empty_schedule() {
        let result = compute_schedule(Decimal::ZERO, dec!(9), 60, 12).unwrap();
        assert_eq!(result.payment, Decimal::ZERO);
        assert_eq!(result.total_payment, Decimal::ZERO);
        assert!(result.schedule.is_empty());
    }

    #[test]
    fn test_first_row_split() {
        // 100,000 at 12% monthly: first interest = 1,000
        let result = compute_schedule(dec!(100_000), dec!(12), 12, 12).unwrap();
        let first = &result.schedule[0];
        assert_eq!(first.period, 1);
        assert_eq!(first.interest, dec!(1000));
        assert_eq!(first.principal, result.payment - dec!(1000));
        assert_eq!(first.balance, dec!(100_000) - first.principal);
    }

    #[test]
    fn test_quarterly_frequency() {
        // 100,000 at 8% quarterly for 5 years: r = 2%, N = 20
        let result = compute_schedule(dec!(100_000), dec!(8), 20, 4).unwrap();
        assert_eq!(result.periodic_rate, dec!(0.02));
        assert!((result.payment - dec!(6115.67)).abs() < dec!(0.01));
    }

    #[test]
    fn test_idempotent() {
        let a = amortize(&home_loan()).unwrap();
        let b = amortize(&home_loan()).unwrap();
        assert_eq!(a, b);
    }

    // -----------------------------------------------------------------------
    // 4. Validation
    // -----------------------------------------------------------------------
    #[test]
    fn test_negative_rate_rejected() {
        let err = compute_schedule(dec!(1000), dec!(-1), 12, 12).unwrap_err();
        match err {
            LoanCalcError::InvalidInput { field, .. } => assert_eq!(field, "annual_rate_pct"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialized_params_are_revalidated() {
        let params = LoanParameters {
            principal: dec!(1000),
            annual_rate_pct: dec!(10),
            periods: 12,
            periods_per_year: 0,
        };
        assert!(matches!(
            amortize(&params).unwrap_err(),
            LoanCalcError::InvalidInput { .. }
        ));
    }

    #[test]
    fn test_overflowing_growth_is_an_error() {
        // 1,000% p.a. monthly over 100 years leaves the decimal range
        let err = compute_schedule(dec!(1000), dec!(1000), 1200, 12).unwrap_err();
        assert!(matches!(err, LoanCalcError::ArithmeticOverflow { .. }));
    }

    #[test]
    fn test_running_total_overflow_is_an_error() {
        // Level payment fits, but 1,200 of them exceed the decimal range
        let err = compute_schedule(dec!(70_000_000_000_000_000_000_000_000_000), dec!(1.2), 1200, 12)
            .unwrap_err();
        match err {
            LoanCalcError::ArithmeticOverflow { context } => assert!(context.contains("running total")),
            other => panic!("Expected ArithmeticOverflow, got {:?}", other),
        }
    }

    #[test]
    fn test_one_row_per_period_for_tiny_loan() {
        let result = compute_schedule(dec!(1), Decimal::ZERO, 360, 12).unwrap();
        assert_eq!(result.schedule.len(), 360);
        assert_eq!(result.schedule.last().unwrap().balance, Decimal::ZERO);
        assert!(result.schedule.iter().all(|r| r.balance >= Decimal::ZERO));
    }

    // -----------------------------------------------------------------------
    // 5. Enveloped loan calculation
    // -----------------------------------------------------------------------
    #[test]
    fn test_amortize_loan_standard_matches_core() {
        let input = LoanInput::standard(home_loan());
        let out = amortize_loan(&input).unwrap();
        let core = amortize(&home_loan()).unwrap();

        assert_eq!(out.result.payment, core.payment);
        assert_eq!(out.result.total_payment, core.total_payment);
        assert!((out.result.total_interest - core.total_interest).abs() < dec!(0.000001));
        assert_eq!(out.result.amortized_principal, dec!(1_000_000));
        assert!(out.result.moratorium.is_none());
        assert!(out.result.balloon.is_none());
        assert!(out.warnings.is_empty());
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_amortize_loan_capitalized_moratorium() {
        let input = LoanInput::standard(LoanParameters::new(dec!(1_000_000), dec!(10), 120, 12).unwrap())
            .with_variant(LoanVariant::Moratorium {
                periods: 24,
                interest: MoratoriumInterest::Capitalize,
            });
        let out = amortize_loan(&input).unwrap().result;

        assert_eq!(out.amortized_principal, dec!(1_200_000));
        let expected = compute_schedule(dec!(1_200_000), dec!(10), 120, 12).unwrap();
        assert_eq!(out.payment, expected.payment);
        assert_eq!(out.total_payment, expected.total_payment);
        assert_eq!(out.total_interest, expected.total_payment - dec!(1_000_000));
    }

    #[test]
    fn test_amortize_loan_huge_moratorium_is_an_error() {
        let input = LoanInput::standard(
            LoanParameters::new(dec!(70_000_000_000_000_000_000_000_000_000), dec!(10), 120, 12).unwrap(),
        )
        .with_variant(LoanVariant::Moratorium {
            periods: 24,
            interest: MoratoriumInterest::Capitalize,
        });
        assert!(matches!(
            amortize_loan(&input).unwrap_err(),
            LoanCalcError::ArithmeticOverflow { .. }
        ));
    }

    #[test]
    fn test_amortize_loan_zero_principal_warns() {
        let input = LoanInput::standard(LoanParameters::new(Decimal::ZERO, dec!(10), 12, 12).unwrap());
        let out = amortize_loan(&input).unwrap();
        assert!(out.result.schedule.is_empty());
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.result.breakdown.principal_pct, Decimal::ZERO);
    }
}
