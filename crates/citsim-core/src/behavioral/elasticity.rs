use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CitError;
use crate::policy::{ElasticityBands, PolicyParameters};
use crate::types::{LegalForm, Money, Rate, RateRegime, Sector};
use crate::CitResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralOutput {
    /// Net taxable profit floored at zero
    pub positive_taxable_profit: Money,
    pub elasticity: Decimal,
    /// Regime whose rate change drives the response; None means no response
    pub regime: Option<RateRegime>,
    /// Fractional change in the net-of-tax rate for that regime
    pub net_of_tax_rate_change: Rate,
    pub net_tax_base_behavior: Money,
}

/// Elasticity for the income band `profit` falls in. Zero and negative
/// profit have no response.
pub fn select_elasticity(profit: Money, bands: &ElasticityBands) -> Decimal {
    let [t0, t1] = bands.thresholds;
    if profit <= Decimal::ZERO {
        Decimal::ZERO
    } else if profit <= t0 {
        bands.values[0]
    } else if profit <= t1 {
        bands.values[1]
    } else {
        bands.values[2]
    }
}

/// `((1 - simulated) - (1 - current)) / (1 - current)`
pub fn net_of_tax_rate_change(simulated: Rate, current_law: Rate) -> CitResult<Rate> {
    let current_net = Decimal::ONE - current_law;
    if current_net.is_zero() {
        return Err(CitError::DivisionByZero {
            context: "net-of-tax rate change (current-law rate of 1)".into(),
        });
    }
    ((Decimal::ONE - simulated) - current_net)
        .checked_div(current_net)
        .ok_or_else(|| CitError::overflow("net-of-tax rate change"))
}

/// Which regime's rate change a record responds to. Sole proprietorships in
/// the standard sectors fall through to the QIP test.
pub fn response_regime(sector: Sector, legal_form: LegalForm, qip_flag: bool) -> Option<RateRegime> {
    let standard_sector = matches!(
        sector,
        Sector::Agriculture | Sector::Service | Sector::Manufacturing
    );
    if standard_sector && !legal_form.is_progressive() {
        Some(RateRegime::Standard)
    } else if sector == Sector::Mining {
        Some(RateRegime::Mining)
    } else if sector == Sector::Insurance {
        Some(RateRegime::Insurance)
    } else if qip_flag {
        Some(RateRegime::Qip)
    } else {
        None
    }
}

/// Scale the positive taxable base by its elasticity-weighted response to the
/// change in the net-of-tax rate between current law and the simulated policy.
pub fn adjust_for_behavior(
    net_taxable_profit: Money,
    sector: Sector,
    legal_form: LegalForm,
    qip_flag: bool,
    policy: &PolicyParameters,
) -> CitResult<BehavioralOutput> {
    let positive_taxable_profit = net_taxable_profit.max(Decimal::ZERO);
    let elasticity = select_elasticity(positive_taxable_profit, &policy.elasticity);
    let regime = response_regime(sector, legal_form, qip_flag);

    let net_of_tax_rate_change = match regime {
        Some(r) => net_of_tax_rate_change(
            policy.rates.rate_for(r),
            policy.current_law_rates.rate_for(r),
        )?,
        None => Decimal::ZERO,
    };

    let net_tax_base_behavior = elasticity
        .checked_mul(net_of_tax_rate_change)
        .and_then(|response| response.checked_add(Decimal::ONE))
        .and_then(|multiplier| positive_taxable_profit.checked_mul(multiplier))
        .ok_or_else(|| CitError::overflow("behavioral tax base"))?;

    Ok(BehavioralOutput {
        positive_taxable_profit,
        elasticity,
        regime,
        net_of_tax_rate_change,
        net_tax_base_behavior,
    })
}
