use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::brackets::progressive_tax;
use crate::error::CitError;
use crate::policy::PolicyParameters;
use crate::types::{LegalForm, Money, Rate, RateRegime, Sector};
use crate::CitResult;

/// How a record's liability is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiabilityRegime {
    /// Progressive schedule blended with the standard flat rate
    Progressive,
    Flat(RateRegime),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiabilityInput {
    pub net_tax_base_behavior: Money,
    pub excess_tax: Money,
    pub sector: Sector,
    pub legal_form: LegalForm,
    pub qip_flag: bool,
    pub mintax_exempt: bool,
    pub turnover: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiabilityOutput {
    pub regime: LiabilityRegime,
    /// Five-bracket schedule tax; only set for progressive-form entities
    pub progressive_component: Option<Money>,
    /// Regime flat-rate tax, including excess tax for mining
    pub flat_component: Money,
    /// Weight given to the progressive component
    pub progressive_weight: Rate,
    pub cit_before_minimum_tax: Money,
    pub minimum_tax: Money,
    pub minimum_tax_applied: bool,
    pub cit_liability: Money,
}

/// Regime priority: progressive legal form, then mining, insurance, QIP,
/// and the standard rate for everything else.
pub fn liability_regime(sector: Sector, legal_form: LegalForm, qip_flag: bool) -> LiabilityRegime {
    if legal_form.is_progressive() {
        LiabilityRegime::Progressive
    } else if sector == Sector::Mining {
        LiabilityRegime::Flat(RateRegime::Mining)
    } else if sector == Sector::Insurance {
        LiabilityRegime::Flat(RateRegime::Insurance)
    } else if qip_flag {
        LiabilityRegime::Flat(RateRegime::Qip)
    } else {
        LiabilityRegime::Flat(RateRegime::Standard)
    }
}

/// Final CIT for one record under the simulated rates.
///
/// A non-positive base owes nothing. Progressive-form entities pay
/// `progressive * switch_prog + standard_flat * (1 - switch_prog)`; all
/// others pay their regime's flat rate, with excess tax added for mining.
/// The minimum tax only takes part when the policy enables it.
pub fn calculate_liability(input: &LiabilityInput, policy: &PolicyParameters) -> CitResult<LiabilityOutput> {
    let regime = liability_regime(input.sector, input.legal_form, input.qip_flag);
    let base = input.net_tax_base_behavior;

    let (progressive_component, flat_component, progressive_weight, cit) = if base <= Decimal::ZERO {
        (None, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    } else {
        match regime {
            LiabilityRegime::Progressive => {
                let progressive = progressive_tax(base, &policy.progressive);
                let flat = policy.rates.standard * base;
                let w = policy.switch_prog;
                (
                    Some(progressive),
                    flat,
                    w,
                    progressive * w + flat * (Decimal::ONE - w),
                )
            }
            LiabilityRegime::Flat(r) => {
                let mut flat = policy.rates.rate_for(r) * base;
                if r == RateRegime::Mining {
                    flat = flat
                        .checked_add(input.excess_tax)
                        .ok_or_else(|| CitError::overflow("mining excess tax"))?;
                }
                (None, flat, Decimal::ZERO, flat)
            }
        }
    };

    let minimum_tax = if policy.minimum_tax.enabled && !input.mintax_exempt {
        input.turnover.max(Decimal::ZERO) * policy.minimum_tax.rate
    } else {
        Decimal::ZERO
    };
    let minimum_tax_applied = minimum_tax > cit;

    Ok(LiabilityOutput {
        regime,
        progressive_component,
        flat_component,
        progressive_weight,
        cit_before_minimum_tax: cit,
        minimum_tax,
        minimum_tax_applied,
        cit_liability: cit.max(minimum_tax),
    })
}
