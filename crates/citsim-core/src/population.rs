use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, info_span, warn, Span};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::pipeline::{compute_record, CitOutput};
use crate::policy::{validate_policy, PolicyParameters};
use crate::record::EntityRecord;
use crate::types::{with_metadata, ComputationOutput};
use crate::CitResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationInput {
    #[serde(default)]
    pub policy: PolicyParameters,
    pub records: Vec<EntityRecord>,
}

/// A record the pipeline rejected. The rest of the population still runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordFailure {
    /// Position in the input population
    pub index: usize,
    pub record_id: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationOutput {
    /// Successful records, in input order
    pub records: Vec<CitOutput>,
    /// Rejected records, in input order
    pub failures: Vec<RecordFailure>,
    pub records_processed: usize,
    pub records_failed: usize,
}

// ---------------------------------------------------------------------------
// Population mapping
// ---------------------------------------------------------------------------

/// Map the per-record pipeline over a population under one policy.
///
/// The policy is validated once up front; an invalid policy fails the whole
/// run. After that, each record is independent: a failing record becomes a
/// `RecordFailure` and the run continues.
pub fn run_population(input: &PopulationInput) -> CitResult<ComputationOutput<PopulationOutput>> {
    let start = Instant::now();
    let span = info_span!("population", records = input.records.len());
    let _guard = span.enter();

    validate_policy(&input.policy)?;

    let results = map_records(&input.records, &input.policy, &span);

    let mut records = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(out) => records.push(out),
            Err(e) => {
                let record_id = input.records[index].record_id.clone();
                warn!(index, record_id = %record_id, error = %e, "record rejected");
                failures.push(RecordFailure {
                    index,
                    record_id,
                    error: e.to_string(),
                });
            }
        }
    }

    let mut warnings = Vec::new();
    if !failures.is_empty() {
        warnings.push(format!(
            "{} of {} records were rejected; see failures",
            failures.len(),
            input.records.len()
        ));
    }

    info!(
        processed = records.len(),
        failed = failures.len(),
        "population run complete"
    );

    let output = PopulationOutput {
        records_processed: records.len(),
        records_failed: failures.len(),
        records,
        failures,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Per-record CIT pipeline mapped over the population under a shared policy",
        &serde_json::json!({
            "records": input.records.len(),
            "loss_carryforward_years": input.policy.loss_carryforward_years,
            "parallel": cfg!(feature = "parallel"),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// Each record runs inside the run's span; worker threads do not inherit the
// caller's entered span.
#[cfg(feature = "parallel")]
fn map_records(records: &[EntityRecord], policy: &PolicyParameters, span: &Span) -> Vec<CitResult<CitOutput>> {
    records
        .par_iter()
        .map(|r| span.in_scope(|| compute_record(r, policy)))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn map_records(records: &[EntityRecord], policy: &PolicyParameters, span: &Span) -> Vec<CitResult<CitOutput>> {
    records
        .iter()
        .map(|r| span.in_scope(|| compute_record(r, policy)))
        .collect()
}
