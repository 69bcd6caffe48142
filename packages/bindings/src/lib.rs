use napi::Result as NapiResult;
use napi_derive::napi;

use loan_calc_core::amortization::{self, export, form::LoanFormLimits, LoanInput};
use loan_calc_core::savings::{compound, sip};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
struct ScheduleBindingInput {
    principal: rust_decimal::Decimal,
    annual_rate_pct: rust_decimal::Decimal,
    periods: u32,
    #[serde(default = "monthly")]
    periods_per_year: u32,
}

fn monthly() -> u32 {
    12
}

/// Bare engine call: `{ principal, annual_rate_pct, periods, periods_per_year }`
/// in, `{ payment, total_interest, total_payment, schedule }` out.
#[napi]
pub fn compute_schedule(input_json: String) -> NapiResult<String> {
    let input: ScheduleBindingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::compute_schedule(
        input.principal,
        input.annual_rate_pct,
        input.periods,
        input.periods_per_year,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortize_loan(input_json: String) -> NapiResult<String> {
    let input: LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::amortize_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn export_schedule_csv(input_json: String) -> NapiResult<String> {
    let input: LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::amortize_loan(&input).map_err(to_napi_error)?;
    export::schedule_to_csv(&output.result.schedule).map_err(to_napi_error)
}

/// Tab-separated schedule for the "copy to clipboard" button.
#[napi]
pub fn export_schedule_tsv(input_json: String) -> NapiResult<String> {
    let input: LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::amortize_loan(&input).map_err(to_napi_error)?;
    export::schedule_to_tsv(&output.result.schedule).map_err(to_napi_error)
}

/// Validate raw EMI form fields against the default slider ranges.
#[napi]
pub fn parse_loan_form(
    principal: String,
    annual_rate_pct: String,
    tenure_years: String,
) -> NapiResult<String> {
    let params = LoanFormLimits::default()
        .parse(&principal, &annual_rate_pct, &tenure_years)
        .map_err(to_napi_error)?;
    serde_json::to_string(&params).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Savings
// ---------------------------------------------------------------------------

#[napi]
pub fn sip_future_value(input_json: String) -> NapiResult<String> {
    let input: sip::SipInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = sip::sip_future_value(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compound_interest(input_json: String) -> NapiResult<String> {
    let input: compound::CompoundInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = compound::compound_interest(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
