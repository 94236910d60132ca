use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::loss_history::LossHistory;
use crate::error::CitError;
use crate::types::{LegalForm, Money};
use crate::CitResult;

/// Largest magnitude accepted for any monetary input. Below it every stage
/// stays inside `Decimal` range.
pub const MAX_INPUT_AMOUNT: Money = dec!(1_000_000_000_000_000_000);

// ---------------------------------------------------------------------------
// Input sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueInputs {
    pub operating: Money,
    pub subsidiary: Money,
    pub other: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetInputs {
    pub current: Money,
    pub non_current: Money,
}

/// Depreciable asset movements for the normal and special pools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepreciationInputs {
    /// Opening written-down value of the normal pool
    pub opening_wdv: Money,
    pub additions: Money,
    pub disposals: Money,
    /// Additions qualifying for special depreciation
    pub special_additions: Money,
}

/// Book-to-tax adjustment items, interest and charity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfitInputs {
    pub profit_before_tax: Money,
    // additions
    pub donations_grants: Money,
    pub non_deductible_expense: Money,
    pub unrecorded_income: Money,
    // deductions
    pub decrease_in_provisions: Money,
    pub disposal_losses: Money,
    pub other_deductible_expense: Money,
    // non-taxable income
    pub dividends: Money,
    pub capital_gains_on_disposal: Money,
    pub other_non_taxable_income: Money,
    pub rental_income: Money,
    pub charity_contribution: Money,
    pub interest_expense: Money,
    pub interest_income: Money,
}

/// Accumulated income and expense used by the extractive-sector surcharge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractiveInputs {
    pub accumulated_income: Money,
    pub accumulated_expense: Money,
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One business's financial and tax data for one assessment period.
///
/// Only `sector_code` and `legal_form` are required in JSON; every monetary
/// section defaults to zero and the loss history to ten empty vintages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    #[serde(default)]
    pub record_id: String,
    /// Raw sector classification code (1..=5)
    pub sector_code: u8,
    pub legal_form: LegalForm,
    #[serde(default)]
    pub qip_flag: bool,
    /// Exempt from the turnover-based minimum tax
    #[serde(default)]
    pub mintax_exempt: bool,
    #[serde(default)]
    pub special_depreciation_eligible: bool,
    #[serde(default)]
    pub revenue: RevenueInputs,
    #[serde(default)]
    pub assets: AssetInputs,
    #[serde(default)]
    pub depreciation: DepreciationInputs,
    #[serde(default)]
    pub profit: ProfitInputs,
    #[serde(default)]
    pub extractive: ExtractiveInputs,
    /// Brought-forward losses, most recent vintage first
    #[serde(default)]
    pub loss_history: LossHistory,
}

impl EntityRecord {
    /// Sum of revenue lines, clamped at zero. Individual lines may be
    /// negative (reversals, write-backs).
    pub fn turnover(&self) -> Money {
        (self.revenue.operating + self.revenue.subsidiary + self.revenue.other).max(Decimal::ZERO)
    }

    /// Sum of asset balances, clamped at zero.
    pub fn total_assets(&self) -> Money {
        (self.assets.current + self.assets.non_current).max(Decimal::ZERO)
    }

    /// Every monetary input with its field path.
    pub fn monetary_inputs(&self) -> [(&'static str, Money); 25] {
        let (r, a, d, p, x) = (
            &self.revenue,
            &self.assets,
            &self.depreciation,
            &self.profit,
            &self.extractive,
        );
        [
            ("revenue.operating", r.operating),
            ("revenue.subsidiary", r.subsidiary),
            ("revenue.other", r.other),
            ("assets.current", a.current),
            ("assets.non_current", a.non_current),
            ("depreciation.opening_wdv", d.opening_wdv),
            ("depreciation.additions", d.additions),
            ("depreciation.disposals", d.disposals),
            ("depreciation.special_additions", d.special_additions),
            ("profit.profit_before_tax", p.profit_before_tax),
            ("profit.donations_grants", p.donations_grants),
            ("profit.non_deductible_expense", p.non_deductible_expense),
            ("profit.unrecorded_income", p.unrecorded_income),
            ("profit.decrease_in_provisions", p.decrease_in_provisions),
            ("profit.disposal_losses", p.disposal_losses),
            ("profit.other_deductible_expense", p.other_deductible_expense),
            ("profit.dividends", p.dividends),
            ("profit.capital_gains_on_disposal", p.capital_gains_on_disposal),
            ("profit.other_non_taxable_income", p.other_non_taxable_income),
            ("profit.rental_income", p.rental_income),
            ("profit.charity_contribution", p.charity_contribution),
            ("profit.interest_expense", p.interest_expense),
            ("profit.interest_income", p.interest_income),
            ("extractive.accumulated_income", x.accumulated_income),
            ("extractive.accumulated_expense", x.accumulated_expense),
        ]
    }

    /// Reject amounts beyond `MAX_INPUT_AMOUNT`, loss vintages included.
    pub fn check_amounts(&self) -> CitResult<()> {
        for (field, value) in self.monetary_inputs() {
            if value.abs() > MAX_INPUT_AMOUNT {
                return Err(CitError::input(
                    field,
                    format!("Amount {} exceeds the supported magnitude of {}", value, MAX_INPUT_AMOUNT),
                ));
            }
        }
        if let Some(pos) = self
            .loss_history
            .as_slice()
            .iter()
            .position(|v| *v > MAX_INPUT_AMOUNT)
        {
            return Err(CitError::input(
                "loss_history",
                format!("Loss vintage {} exceeds the supported magnitude of {}", pos + 1, MAX_INPUT_AMOUNT),
            ));
        }
        Ok(())
    }

    /// The same entity for the following period, carrying the rolled-forward
    /// loss history. Financial inputs are left for the caller to replace.
    pub fn with_loss_history(&self, loss_history: LossHistory) -> Self {
        Self {
            loss_history,
            ..self.clone()
        }
    }
}

impl Default for EntityRecord {
    fn default() -> Self {
        Self {
            record_id: String::new(),
            sector_code: 2,
            legal_form: LegalForm::PrivateLimited,
            qip_flag: false,
            mintax_exempt: false,
            special_depreciation_eligible: false,
            revenue: RevenueInputs::default(),
            assets: AssetInputs::default(),
            depreciation: DepreciationInputs::default(),
            profit: ProfitInputs::default(),
            extractive: ExtractiveInputs::default(),
            loss_history: LossHistory::zero(),
        }
    }
}
