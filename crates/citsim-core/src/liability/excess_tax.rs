use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CitError;
use crate::policy::ExcessTaxSchedule;
use crate::record::ExtractiveInputs;
use crate::types::{Money, Rate};
use crate::CitResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcessTaxOutput {
    /// Accumulated income over accumulated expense (0 when expense is 0)
    pub accumulation_proportion: Rate,
    /// Highest surcharge tier reached, 0 when below the first threshold
    pub tier: u8,
    pub excess_tax: Money,
}

pub fn accumulation_proportion(inputs: &ExtractiveInputs) -> CitResult<Rate> {
    if inputs.accumulated_expense.is_zero() {
        return Ok(Decimal::ZERO);
    }
    inputs
        .accumulated_income
        .checked_div(inputs.accumulated_expense)
        .ok_or_else(|| CitError::overflow("accumulation proportion"))
}

/// Tiered surcharge on the behavioral tax base.
///
/// Within the tier the proportion falls in, the rate applies to the share
/// of the proportion above that tier's threshold; each completed lower tier
/// adds its full band measured against its own upper threshold. A
/// proportion at or below the first threshold pays nothing.
pub fn calculate_excess_tax(
    base: Money,
    inputs: &ExtractiveInputs,
    schedule: &ExcessTaxSchedule,
) -> CitResult<ExcessTaxOutput> {
    let p = accumulation_proportion(inputs)?;
    let [p1, p2, p3] = schedule.thresholds;
    let [r1, r2, r3] = schedule.rates;

    // width <= denominator, so the share is at most 1
    let band = |rate: Rate, width: Rate, denominator: Rate| -> CitResult<Money> {
        (width / denominator)
            .checked_mul(rate)
            .and_then(|share| share.checked_mul(base))
            .ok_or_else(|| CitError::overflow("excess tax band"))
    };

    let (tier, excess_tax) = if p <= p1 || p.is_zero() {
        (0, Decimal::ZERO)
    } else if p <= p2 {
        (1, band(r1, p - p1, p)?)
    } else if p <= p3 {
        (2, sum_bands(&[band(r2, p - p2, p)?, band(r1, p2 - p1, p2)?])?)
    } else {
        let bands = [
            band(r3, p - p3, p)?,
            band(r2, p3 - p2, p3)?,
            band(r1, p2 - p1, p2)?,
        ];
        (3, sum_bands(&bands)?)
    };

    Ok(ExcessTaxOutput {
        accumulation_proportion: p,
        tier,
        excess_tax,
    })
}

fn sum_bands(bands: &[Money]) -> CitResult<Money> {
    bands.iter().try_fold(Decimal::ZERO, |acc, b| {
        acc.checked_add(*b)
            .ok_or_else(|| CitError::overflow("excess tax"))
    })
}
