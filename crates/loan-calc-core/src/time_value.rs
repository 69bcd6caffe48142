use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanCalcError;
use crate::types::{Money, Percent, Rate};
use crate::LoanCalcResult;

const PERCENT_DIVISOR: Decimal = dec!(100);

/// Periodic rate from an annual percentage: 8.5% p.a. monthly -> 0.0070833…
pub fn periodic_rate(annual_rate_pct: Percent, periods_per_year: u32) -> LoanCalcResult<Rate> {
    if periods_per_year == 0 {
        return Err(LoanCalcError::invalid(
            "periods_per_year",
            "Periods per year must be > 0",
        ));
    }
    if annual_rate_pct < Decimal::ZERO {
        return Err(LoanCalcError::invalid(
            "annual_rate_pct",
            "Annual rate cannot be negative",
        ));
    }
    Ok(annual_rate_pct / Decimal::from(periods_per_year) / PERCENT_DIVISOR)
}

/// Compound growth factor (1 + r)^n, guarded against leaving the decimal range.
pub fn growth_factor(rate: Rate, nper: u32) -> LoanCalcResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powi(i64::from(nper))
        .ok_or_else(|| LoanCalcError::ArithmeticOverflow {
            context: format!("growth factor (1 + {rate})^{nper}"),
        })
}

/// Level payment that fully amortizes `principal` over `nper` periods.
///
/// Zero rate degrades to straight-line repayment. Payments are returned as
/// positive amounts, unlike spreadsheet PMT.
pub fn level_payment(principal: Money, rate: Rate, nper: u32) -> LoanCalcResult<Money> {
    if nper == 0 {
        return Err(LoanCalcError::invalid(
            "periods",
            "Number of periods must be > 0",
        ));
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let factor = growth_factor(rate, nper)?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(LoanCalcError::DivisionByZero {
            context: "level payment annuity factor".into(),
        });
    }

    let numerator = principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(factor))
        .ok_or_else(|| LoanCalcError::ArithmeticOverflow {
            context: "level payment numerator".into(),
        })?;

    numerator
        .checked_div(denominator)
        .ok_or_else(|| LoanCalcError::ArithmeticOverflow {
            context: "level payment".into(),
        })
}

/// Present value of a single amount received `nper` periods from now.
pub fn present_value(amount: Money, rate: Rate, nper: u32) -> LoanCalcResult<Money> {
    let factor = growth_factor(rate, nper)?;
    amount
        .checked_div(factor)
        .ok_or_else(|| LoanCalcError::DivisionByZero {
            context: "present value discount factor".into(),
        })
}

/// Future value of a level series of contributions.
///
/// With `due` set, contributions land at the start of each period (an
/// annuity-due, the SIP convention); otherwise at the end.
pub fn annuity_future_value(
    installment: Money,
    rate: Rate,
    nper: u32,
    due: bool,
) -> LoanCalcResult<Money> {
    if rate.is_zero() {
        return installment
            .checked_mul(Decimal::from(nper))
            .ok_or_else(|| LoanCalcError::ArithmeticOverflow {
                context: "annuity future value".into(),
            });
    }

    let factor = growth_factor(rate, nper)?;
    let accumulation = (factor - Decimal::ONE) / rate;
    let ordinary = installment
        .checked_mul(accumulation)
        .ok_or_else(|| LoanCalcError::ArithmeticOverflow {
            context: "annuity future value".into(),
        })?;

    if due {
        ordinary
            .checked_mul(Decimal::ONE + rate)
            .ok_or_else(|| LoanCalcError::ArithmeticOverflow {
                context: "annuity-due future value".into(),
            })
    } else {
        Ok(ordinary)
    }
}
