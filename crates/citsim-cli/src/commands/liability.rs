use clap::Args;
use serde_json::Value;

use citsim_core::liability::{progressive_breakdown, LiabilityRegime};
use citsim_core::pipeline::{calculate_cit, CitInput};
use citsim_core::record::EntityRecord;

use super::policy::load_policy;
use crate::input;

/// Arguments for a single-record liability run
#[derive(Args)]
pub struct LiabilityArgs {
    /// Path to a JSON or YAML entity record (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Include the progressive bracket breakdown for sole proprietorships
    #[arg(long)]
    pub brackets: bool,
}

pub fn run_liability(
    args: LiabilityArgs,
    policy_path: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let policy = load_policy(policy_path)?;
    let record: EntityRecord = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <record.json> or stdin required for liability".into());
    };

    let schedule = policy.progressive.clone();
    let result = calculate_cit(&CitInput { policy, record })?;

    let mut value = serde_json::to_value(&result)?;
    if args.brackets && result.result.liability.regime == LiabilityRegime::Progressive {
        let slices = progressive_breakdown(result.result.behavior.net_tax_base_behavior, &schedule);
        value["result"]["brackets"] = serde_json::to_value(slices)?;
    }
    Ok(value)
}
