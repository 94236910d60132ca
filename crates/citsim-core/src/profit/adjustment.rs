use serde::{Deserialize, Serialize};

use crate::record::ProfitInputs;
use crate::types::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedProfit {
    pub net_accounting_profit: Money,
    pub total_additions: Money,
    pub total_deductions: Money,
    pub total_non_taxable_income: Money,
    pub adjusted_profit: Money,
}

/// Book profit to adjusted taxable profit, before the charity and interest
/// limitations.
pub fn adjust_profit(inputs: &ProfitInputs, total_depreciation: Money) -> AdjustedProfit {
    let net_accounting_profit = inputs.profit_before_tax;

    let total_additions =
        inputs.donations_grants + inputs.non_deductible_expense + inputs.unrecorded_income;

    let total_deductions = total_depreciation
        + inputs.decrease_in_provisions
        + inputs.disposal_losses
        + inputs.other_deductible_expense;

    let total_non_taxable_income =
        inputs.dividends + inputs.capital_gains_on_disposal + inputs.other_non_taxable_income;

    let adjusted_profit = net_accounting_profit + total_additions + inputs.rental_income
        - total_deductions
        - total_non_taxable_income;

    AdjustedProfit {
        net_accounting_profit,
        total_additions,
        total_deductions,
        total_non_taxable_income,
        adjusted_profit,
    }
}
