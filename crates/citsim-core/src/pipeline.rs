use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::behavioral::{adjust_for_behavior, BehavioralOutput};
use crate::classification::{classify_entity, Classification};
use crate::depreciation::{calculate_depreciation, DepreciationOutput};
use crate::liability::{
    calculate_excess_tax, calculate_liability, ExcessTaxOutput, LiabilityInput, LiabilityOutput,
};
use crate::losses::{apply_loss_carryforward, LossCarryforwardOutput};
use crate::policy::{validate_policy, PolicyParameters};
use crate::profit::{adjust_profit, apply_limitations, AdjustedProfit, LimitationOutput};
use crate::record::{EntityRecord, LossHistory};
use crate::types::{with_metadata, ComputationOutput, FirmSize, Money, Sector};
use crate::CitResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitInput {
    #[serde(default)]
    pub policy: PolicyParameters,
    pub record: EntityRecord,
}

/// Every derived field for one record, grouped by stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitOutput {
    pub record_id: String,
    pub classification: Classification,
    pub depreciation: DepreciationOutput,
    pub profit: AdjustedProfit,
    pub limitations: LimitationOutput,
    pub losses: LossCarryforwardOutput,
    pub behavior: BehavioralOutput,
    pub excess_tax: ExcessTaxOutput,
    pub liability: LiabilityOutput,
}

/// One flat row per record for tabular output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub record_id: String,
    pub sector: Sector,
    pub size: FirmSize,
    pub turnover: Money,
    pub adjusted_profit: Money,
    pub profit_after_interest: Money,
    pub used_loss_total: Money,
    pub net_taxable_profit: Money,
    pub net_tax_base_behavior: Money,
    pub excess_tax: Money,
    pub cit_liability: Money,
}

impl CitOutput {
    pub fn cit_liability(&self) -> Money {
        self.liability.cit_liability
    }

    /// Loss history to store on the record for the next period.
    pub fn next_loss_history(&self) -> LossHistory {
        self.losses.next_loss_history
    }

    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            record_id: self.record_id.clone(),
            sector: self.classification.sector,
            size: self.classification.size,
            turnover: self.classification.turnover,
            adjusted_profit: self.profit.adjusted_profit,
            profit_after_interest: self.limitations.profit_after_interest,
            used_loss_total: self.losses.used_loss_total,
            net_taxable_profit: self.losses.net_taxable_profit,
            net_tax_base_behavior: self.behavior.net_tax_base_behavior,
            excess_tax: self.excess_tax.excess_tax,
            cit_liability: self.liability.cit_liability,
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run one record through every stage in dependency order.
///
/// Pure: the record and policy are only read. The policy is assumed to have
/// passed `validate_policy`; use `calculate_cit` for a checked single run.
pub fn compute_record(record: &EntityRecord, policy: &PolicyParameters) -> CitResult<CitOutput> {
    let classification = classify_entity(record, &policy.size_thresholds)?;

    let depreciation = calculate_depreciation(
        &record.depreciation,
        record.special_depreciation_eligible,
        &policy.depreciation,
    );

    let profit = adjust_profit(&record.profit, depreciation.total_depreciation);
    let limitations = apply_limitations(
        profit.adjusted_profit,
        record.profit.charity_contribution,
        record.profit.interest_expense,
        record.profit.interest_income,
        policy.charity_deduction_rate,
        policy.interest_deduction_rate,
    );

    let losses = apply_loss_carryforward(
        limitations.profit_after_interest,
        &record.loss_history,
        policy.loss_carryforward_years,
    )?;

    let behavior = adjust_for_behavior(
        losses.net_taxable_profit,
        classification.sector,
        record.legal_form,
        record.qip_flag,
        policy,
    )?;

    let excess_tax = calculate_excess_tax(
        behavior.net_tax_base_behavior,
        &record.extractive,
        &policy.excess_tax,
    )?;

    let liability = calculate_liability(
        &LiabilityInput {
            net_tax_base_behavior: behavior.net_tax_base_behavior,
            excess_tax: excess_tax.excess_tax,
            sector: classification.sector,
            legal_form: record.legal_form,
            qip_flag: record.qip_flag,
            mintax_exempt: record.mintax_exempt,
            turnover: classification.turnover,
        },
        policy,
    )?;

    debug!(
        record_id = %record.record_id,
        sector = %classification.sector,
        size = %classification.size,
        cit = %liability.cit_liability,
        "record computed"
    );

    Ok(CitOutput {
        record_id: record.record_id.clone(),
        classification,
        depreciation,
        profit,
        limitations,
        losses,
        behavior,
        excess_tax,
        liability,
    })
}

/// Validate the policy, compute one record and attach warnings and metadata.
pub fn calculate_cit(input: &CitInput) -> CitResult<ComputationOutput<CitOutput>> {
    let start = Instant::now();

    validate_policy(&input.policy)?;
    let output = compute_record(&input.record, &input.policy)?;
    let warnings = record_warnings(&input.record, &output, &input.policy);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Corporate income tax: classification, depreciation, profit adjustment, \
         charity and interest caps, loss carryforward, behavioral response, \
         excess tax and liability",
        &serde_json::json!({
            "record_id": input.record.record_id,
            "loss_carryforward_years": input.policy.loss_carryforward_years,
            "switch_prog": input.policy.switch_prog.to_string(),
            "standard_rate": input.policy.rates.standard.to_string(),
            "minimum_tax_enabled": input.policy.minimum_tax.enabled,
        }),
        warnings,
        elapsed,
        output,
    ))
}

pub(crate) fn record_warnings(
    record: &EntityRecord,
    output: &CitOutput,
    policy: &PolicyParameters,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if output.depreciation.normal_base < Decimal::ZERO {
        warnings.push(format!(
            "Disposals exceed the normal depreciation pool; base is {}",
            output.depreciation.normal_base
        ));
    }

    let years = policy.loss_carryforward_years as usize;
    let beyond_window: Money = record.loss_history.as_slice()[years..].iter().copied().sum();
    if beyond_window > Decimal::ZERO {
        warnings.push(format!(
            "Brought-forward losses of {} lie outside the {}-year window and were ignored",
            beyond_window, years
        ));
    }
    if output.losses.expired_loss > Decimal::ZERO {
        warnings.push(format!(
            "Unused loss of {} expires at rollover",
            output.losses.expired_loss
        ));
    }

    if output.classification.sector != Sector::Mining && output.excess_tax.excess_tax > Decimal::ZERO
    {
        warnings.push(format!(
            "Excess tax of {} computed for a {} record is not charged outside mining",
            output.excess_tax.excess_tax, output.classification.sector
        ));
    }

    if output.liability.minimum_tax_applied {
        warnings.push(format!(
            "Minimum tax of {} exceeds computed CIT of {}",
            output.liability.minimum_tax, output.liability.cit_before_minimum_tax
        ));
    }

    warnings
}
