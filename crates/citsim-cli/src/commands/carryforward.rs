use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use citsim_core::losses::{calculate_loss_carryforward, LossCarryforwardInput};
use citsim_core::record::LossHistory;

use super::policy::load_policy;
use crate::input;

/// Arguments for the standalone loss carryforward engine
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CarryforwardArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Profit after interest for the period; negative for a loss
    #[arg(long)]
    pub profit: Option<Decimal>,

    /// Carryforward window in years; defaults to the policy's window
    #[arg(long)]
    pub window: Option<u8>,

    /// Brought-forward losses, most recent vintage first (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub history: Option<Vec<Decimal>>,
}

pub fn run_carryforward(
    args: CarryforwardArgs,
    policy_path: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let cf_input: LossCarryforwardInput = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        let profit = args
            .profit
            .ok_or("--profit is required (or provide --input)")?;
        let carryforward_years = match args.window {
            Some(w) => w,
            None => load_policy(policy_path)?.loss_carryforward_years,
        };
        let history = args.history.unwrap_or_default();

        LossCarryforwardInput {
            profit_after_interest: profit,
            carryforward_years,
            loss_history: LossHistory::from_vintages(&history)?,
        }
    };

    let result = calculate_loss_carryforward(&cf_input)?;
    Ok(serde_json::to_value(result)?)
}
