//! Loan amortization: EMI, repayment schedules, moratorium and balloon
//! variants, form-boundary validation, and schedule export.

pub mod engine;
pub mod export;
pub mod form;
pub mod params;
pub mod variants;

pub use engine::{amortize_loan, compute_schedule, AmortizationResult, AmortizationRow};
pub use params::{LoanInput, LoanParameters, LoanVariant, MoratoriumInterest};
