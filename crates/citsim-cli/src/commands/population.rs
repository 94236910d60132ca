use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use citsim_core::pipeline::CitOutput;
use citsim_core::population::{self, PopulationInput};
use citsim_core::record::EntityRecord;

use super::policy::load_policy;
use crate::input;

/// Arguments for a population run
#[derive(Args)]
pub struct PopulationArgs {
    /// Path to a JSON or YAML file of records (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// One flat row per record instead of the full stage breakdown
    #[arg(long)]
    pub summary: bool,
}

/// A bare array of records, or an object with a `records` field.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordsDocument {
    Wrapped { records: Vec<EntityRecord> },
    Bare(Vec<EntityRecord>),
}

impl RecordsDocument {
    fn into_records(self) -> Vec<EntityRecord> {
        match self {
            RecordsDocument::Wrapped { records } | RecordsDocument::Bare(records) => records,
        }
    }
}

pub fn run_population(
    args: PopulationArgs,
    policy_path: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let policy = load_policy(policy_path)?;
    let document: RecordsDocument = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <records.json> or stdin required for population".into());
    };

    let result = population::run_population(&PopulationInput {
        policy,
        records: document.into_records(),
    })?;

    let mut value = serde_json::to_value(&result)?;
    if args.summary {
        let rows: Vec<_> = result.result.records.iter().map(CitOutput::summary).collect();
        value["result"]["records"] = serde_json::to_value(rows)?;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_document_shapes() {
        let bare: RecordsDocument =
            serde_json::from_str(r#"[{"sector_code": 1, "legal_form": "Partnership"}]"#).unwrap();
        assert_eq!(bare.into_records().len(), 1);

        let wrapped: RecordsDocument = serde_json::from_str(
            r#"{"records": [{"sector_code": 1, "legal_form": "Other"}, {"sector_code": 4, "legal_form": "Other"}]}"#,
        )
        .unwrap();
        assert_eq!(wrapped.into_records().len(), 2);
    }
}
