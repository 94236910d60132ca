use serde_json::Value;
use tracing::info;

use citsim_core::policy::{validate_policy, PolicyParameters};

use crate::input;

/// Load the policy bundle from `--policy`, or current law when absent, and
/// validate it before any record is touched.
pub fn load_policy(path: Option<&str>) -> Result<PolicyParameters, Box<dyn std::error::Error>> {
    let policy: PolicyParameters = match path {
        Some(p) => {
            info!(path = p, "loading policy parameters");
            input::file::read_document(p)?
        }
        None => PolicyParameters::default(),
    };
    validate_policy(&policy)?;
    Ok(policy)
}

pub fn run_default_policy() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(PolicyParameters::default())?)
}
