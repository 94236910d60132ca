use rust_decimal::Decimal;

use super::parameters::{
    PolicyParameters, StatutoryRates, TierThresholds, MAX_CARRYFORWARD_YEARS,
};
use crate::error::CitError;
use crate::types::Rate;
use crate::CitResult;

/// Validate a policy bundle once, before any record is processed.
///
/// The per-record stages assume everything checked here: rates in [0, 1],
/// current-law rates strictly below 1 (they divide the behavioral response),
/// ascending thresholds and a window that fits the 10-slot loss history.
pub fn validate_policy(policy: &PolicyParameters) -> CitResult<()> {
    if policy.loss_carryforward_years > MAX_CARRYFORWARD_YEARS {
        return Err(CitError::policy(
            "loss_carryforward_years",
            format!(
                "Carryforward window must be between 0 and {}, got {}",
                MAX_CARRYFORWARD_YEARS, policy.loss_carryforward_years
            ),
        ));
    }

    check_rate("depreciation.normal_rate", policy.depreciation.normal_rate)?;
    check_rate("depreciation.special_rate", policy.depreciation.special_rate)?;
    if policy.depreciation.floor_amount < Decimal::ZERO {
        return Err(CitError::policy(
            "depreciation.floor_amount",
            "Depreciation floor cannot be negative",
        ));
    }
    check_rate("charity_deduction_rate", policy.charity_deduction_rate)?;
    check_rate("interest_deduction_rate", policy.interest_deduction_rate)?;
    check_rate("switch_prog", policy.switch_prog)?;
    check_rate("minimum_tax.rate", policy.minimum_tax.rate)?;

    check_statutory("rates", &policy.rates)?;
    check_statutory("current_law_rates", &policy.current_law_rates)?;
    for (name, rate) in statutory_fields(&policy.current_law_rates) {
        if rate >= Decimal::ONE {
            return Err(CitError::policy(
                &format!("current_law_rates.{}", name),
                "Current-law rate must be below 1 (net-of-tax rate would be zero)",
            ));
        }
    }

    let bands = &policy.elasticity;
    if bands.thresholds[0] < Decimal::ZERO || bands.thresholds[0] >= bands.thresholds[1] {
        return Err(CitError::policy(
            "elasticity.thresholds",
            "Elasticity thresholds must be non-negative and strictly ascending",
        ));
    }

    let prog = &policy.progressive;
    if prog.thresholds[0] < Decimal::ZERO || !prog.thresholds.windows(2).all(|w| w[0] <= w[1]) {
        return Err(CitError::policy(
            "progressive.thresholds",
            "Bracket thresholds must be non-negative and ascending",
        ));
    }
    for (k, rate) in prog.rates.iter().enumerate() {
        check_rate(&format!("progressive.rates[{}]", k), *rate)?;
    }

    let etax = &policy.excess_tax;
    if etax.thresholds[0] < Decimal::ZERO || !etax.thresholds.windows(2).all(|w| w[0] < w[1]) {
        return Err(CitError::policy(
            "excess_tax.thresholds",
            "Accumulation thresholds must be non-negative and strictly ascending",
        ));
    }
    for (k, rate) in etax.rates.iter().enumerate() {
        check_rate(&format!("excess_tax.rates[{}]", k), *rate)?;
    }

    let sizes = &policy.size_thresholds;
    check_tiers("size_thresholds.agriculture", &sizes.agriculture)?;
    check_tiers("size_thresholds.service", &sizes.service)?;
    check_tiers("size_thresholds.manufacturing", &sizes.manufacturing)?;

    Ok(())
}

fn check_rate(parameter: &str, rate: Rate) -> CitResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(CitError::policy(
            parameter,
            format!("Rate must be between 0 and 1, got {}", rate),
        ));
    }
    Ok(())
}

fn statutory_fields(rates: &StatutoryRates) -> [(&'static str, Rate); 4] {
    [
        ("standard", rates.standard),
        ("mining", rates.mining),
        ("insurance", rates.insurance),
        ("qip", rates.qip),
    ]
}

fn check_statutory(prefix: &str, rates: &StatutoryRates) -> CitResult<()> {
    for (name, rate) in statutory_fields(rates) {
        check_rate(&format!("{}.{}", prefix, name), rate)?;
    }
    Ok(())
}

fn check_tiers(parameter: &str, tiers: &TierThresholds) -> CitResult<()> {
    let values = [
        tiers.medium.turnover,
        tiers.medium.assets,
        tiers.large.turnover,
        tiers.large.assets,
    ];
    if values.iter().any(|v| *v < Decimal::ZERO) {
        return Err(CitError::policy(parameter, "Size thresholds cannot be negative"));
    }
    if tiers.large.turnover < tiers.medium.turnover || tiers.large.assets < tiers.medium.assets {
        return Err(CitError::policy(
            parameter,
            "Large-firm thresholds must not be below medium-firm thresholds",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parameter_of(err: CitError) -> String {
        match err {
            CitError::InvalidPolicy { parameter, .. } => parameter,
            other => panic!("Expected InvalidPolicy, got {:?}", other),
        }
    }

    #[test]
    fn test_default_policy_is_valid() {
        assert!(validate_policy(&PolicyParameters::default()).is_ok());
    }

    #[test]
    fn test_window_above_ten_rejected() {
        let mut policy = PolicyParameters::default();
        policy.loss_carryforward_years = 11;
        let err = validate_policy(&policy).unwrap_err();
        assert_eq!(parameter_of(err), "loss_carryforward_years");
    }

    #[test]
    fn test_current_law_rate_of_one_rejected() {
        let mut policy = PolicyParameters::default();
        policy.current_law_rates.mining = Decimal::ONE;
        let err = validate_policy(&policy).unwrap_err();
        assert_eq!(parameter_of(err), "current_law_rates.mining");
    }

    #[test]
    fn test_simulated_rate_of_one_allowed() {
        let mut policy = PolicyParameters::default();
        policy.rates.standard = Decimal::ONE;
        assert!(validate_policy(&policy).is_ok());
    }

    #[test]
    fn test_elasticity_thresholds_must_ascend() {
        let mut policy = PolicyParameters::default();
        policy.elasticity.thresholds = [dec!(500), dec!(500)];
        let err = validate_policy(&policy).unwrap_err();
        assert_eq!(parameter_of(err), "elasticity.thresholds");
    }

    #[test]
    fn test_excess_tax_thresholds_must_strictly_ascend() {
        let mut policy = PolicyParameters::default();
        policy.excess_tax.thresholds = [dec!(1.3), dec!(1.3), dec!(2.0)];
        let err = validate_policy(&policy).unwrap_err();
        assert_eq!(parameter_of(err), "excess_tax.thresholds");
    }

    #[test]
    fn test_bracket_rate_out_of_range() {
        let mut policy = PolicyParameters::default();
        policy.progressive.rates[4] = dec!(1.2);
        let err = validate_policy(&policy).unwrap_err();
        assert_eq!(parameter_of(err), "progressive.rates[4]");
    }

    #[test]
    fn test_switch_weight_out_of_range() {
        let mut policy = PolicyParameters::default();
        policy.switch_prog = dec!(-0.1);
        assert!(validate_policy(&policy).is_err());
    }

    #[test]
    fn test_inverted_size_tiers_rejected() {
        let mut policy = PolicyParameters::default();
        policy.size_thresholds.service.large.turnover = dec!(10);
        let err = validate_policy(&policy).unwrap_err();
        assert_eq!(parameter_of(err), "size_thresholds.service");
    }
}
