//! Savings-side calculators that share the loan engine's compounding
//! arithmetic: SIP future value and lump-sum compound interest.

pub mod compound;
pub mod sip;

use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Balance at the end of one year of a savings projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsYear {
    pub year: u32,
    /// Cumulative contributions (or the lump sum) to date.
    pub invested: Money,
    pub value: Money,
    /// value - invested.
    pub gain: Money,
}

/// Upper bound on savings horizons.
pub const MAX_YEARS: u32 = 100;
