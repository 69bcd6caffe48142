//! Text exports of a repayment schedule and the principal/interest split
//! shown on the results chart.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::engine::AmortizationRow;
use crate::error::LoanCalcError;
use crate::types::Money;
use crate::LoanCalcResult;

const EXPORT_HEADER: [&str; 4] = ["month", "principal", "interest", "balance"];
const DISPLAY_DP: u32 = 2;

/// Share of total repayment that is principal vs interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub principal: Money,
    pub interest: Money,
    pub total: Money,
    /// Percentage of `total`, 2 dp.
    pub principal_pct: Decimal,
    /// Percentage of `total`, 2 dp.
    pub interest_pct: Decimal,
}

pub fn breakdown(principal: Money, interest: Money) -> Breakdown {
    let total = principal + interest;
    let (principal_pct, interest_pct) = if total.is_zero() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        (
            (principal / total * dec!(100)).round_dp(DISPLAY_DP),
            (interest / total * dec!(100)).round_dp(DISPLAY_DP),
        )
    };
    Breakdown {
        principal,
        interest,
        total,
        principal_pct,
        interest_pct,
    }
}

/// Comma-separated `month,principal,interest,balance`, for file download.
pub fn schedule_to_csv(rows: &[AmortizationRow]) -> LoanCalcResult<String> {
    write_delimited(rows, b',')
}

/// Tab-separated, same columns, for pasting into a spreadsheet.
pub fn schedule_to_tsv(rows: &[AmortizationRow]) -> LoanCalcResult<String> {
    write_delimited(rows, b'\t')
}

fn write_delimited(rows: &[AmortizationRow], delimiter: u8) -> LoanCalcResult<String> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    wtr.write_record(EXPORT_HEADER)?;
    for row in rows {
        wtr.write_record([
            row.period.to_string(),
            format_amount(row.principal),
            format_amount(row.interest),
            format_amount(row.balance),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| LoanCalcError::SerializationError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| LoanCalcError::SerializationError(e.to_string()))
}

fn format_amount(value: Money) -> String {
    format!("{:.2}", value.round_dp(DISPLAY_DP))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::engine::compute_schedule;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn rows() -> Vec<AmortizationRow> {
        vec![
            AmortizationRow {
                period: 1,
                payment: dec!(505),
                interest: dec!(5),
                principal: dec!(500),
                balance: dec!(500),
            },
            AmortizationRow {
                period: 2,
                payment: dec!(502.5),
                interest: dec!(2.5),
                principal: dec!(500),
                balance: dec!(0),
            },
        ]
    }

    #[test]
    fn test_csv_layout() {
        let csv = schedule_to_csv(&rows()).unwrap();
        assert_eq!(
            csv,
            "month,principal,interest,balance\n\
             1,500.00,5.00,500.00\n\
             2,500.00,2.50,0.00\n"
        );
    }

    #[test]
    fn test_tsv_layout() {
        let tsv = schedule_to_tsv(&rows()).unwrap();
        let first_line = tsv.lines().next().unwrap();
        assert_eq!(first_line, "month\tprincipal\tinterest\tbalance");
        assert_eq!(tsv.lines().nth(2).unwrap(), "2\t500.00\t2.50\t0.00");
    }

    #[test]
    fn test_csv_has_row_per_period() {
        let result = compute_schedule(dec!(250_000), dec!(9), 60, 12).unwrap();
        let csv = schedule_to_csv(&result.schedule).unwrap();
        assert_eq!(csv.lines().count(), 61);
        assert!(csv.lines().last().unwrap().ends_with(",0.00"));
    }

    #[test]
    fn test_breakdown_percentages() {
        let b = breakdown(dec!(750), dec!(250));
        assert_eq!(b.total, dec!(1000));
        assert_eq!(b.principal_pct, dec!(75));
        assert_eq!(b.interest_pct, dec!(25));
    }

    #[test]
    fn test_breakdown_of_nothing() {
        let b = breakdown(Decimal::ZERO, Decimal::ZERO);
        assert_eq!(b.principal_pct, Decimal::ZERO);
        assert_eq!(b.interest_pct, Decimal::ZERO);
    }
}
