use serde_json::Value;

use super::{format_cell, result_of};

/// Headline figure of each calculator, in priority order.
const PRIORITY_KEYS: [&str; 6] = [
    "payment",
    "future_value",
    "maturity_amount",
    "total_payment",
    "deleted",
    "id",
];

/// Print just the headline value: the EMI for a loan, the future value for
/// a SIP, and so on. Falls back to the first scalar field.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);

    if let Value::Object(map) = result {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                println!("{}", format_cell(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().find(|(_, v)| !v.is_array() && !v.is_object()) {
            println!("{}: {}", key, format_cell(val));
            return;
        }
    }

    println!("{}", format_cell(result));
}
