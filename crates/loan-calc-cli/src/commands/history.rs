use clap::{Args, Subcommand};
use serde_json::Value;

use loan_calc_core::history::{CalculationStore, JsonFileStore};

/// Arguments for saved-calculation history
#[derive(Args)]
pub struct HistoryArgs {
    /// JSON history file written by `schedule --save`
    #[arg(long, global = true, default_value = "emi-history.json")]
    pub store: String,

    #[command(subcommand)]
    pub action: HistoryAction,
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List saved calculations, newest first
    List,
    /// Show one saved calculation
    Show {
        /// Saved calculation id
        id: String,
    },
    /// Delete one saved calculation
    Delete {
        /// Saved calculation id
        id: String,
    },
}

pub fn run_history(args: HistoryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut store = JsonFileStore::open(&args.store)?;

    match args.action {
        HistoryAction::List => {
            let summaries: Vec<Value> = store
                .list()?
                .into_iter()
                .map(|c| {
                    serde_json::json!({
                        "id": c.id,
                        "label": c.label,
                        "saved_at": c.saved_at.to_rfc3339(),
                        "principal": c.input.loan.principal,
                        "annual_rate_pct": c.input.loan.annual_rate_pct,
                        "periods": c.input.loan.periods,
                        "payment": c.payment.round_dp(2),
                        "total_payment": c.total_payment.round_dp(2),
                    })
                })
                .collect();
            Ok(serde_json::json!({ "results": summaries }))
        }
        HistoryAction::Show { id } => Ok(serde_json::to_value(store.load(&id)?)?),
        HistoryAction::Delete { id } => {
            store.delete(&id)?;
            Ok(serde_json::json!({ "deleted": id }))
        }
    }
}
