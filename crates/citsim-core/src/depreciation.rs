use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::policy::DepreciationPolicy;
use crate::record::DepreciationInputs;
use crate::types::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationOutput {
    /// Opening WDV + additions - disposals. May be negative when disposals
    /// exceed the pool; it is carried as-is.
    pub normal_base: Money,
    pub normal_depreciation: Money,
    pub special_base: Money,
    pub special_depreciation: Money,
    pub total_depreciation: Money,
    pub closing_wdv: Money,
}

/// Normal and special pool depreciation and the closing written-down value.
pub fn calculate_depreciation(
    inputs: &DepreciationInputs,
    special_eligible: bool,
    policy: &DepreciationPolicy,
) -> DepreciationOutput {
    let normal_base = inputs.opening_wdv + inputs.additions - inputs.disposals;
    let normal_depreciation = (normal_base * policy.normal_rate).max(policy.floor_amount);

    let special_base = inputs.special_additions;
    let special_depreciation = if special_eligible {
        special_base * policy.special_rate
    } else {
        Decimal::ZERO
    };

    let total_depreciation = normal_depreciation + special_depreciation;
    let closing_wdv = normal_base + special_base - total_depreciation;

    DepreciationOutput {
        normal_base,
        normal_depreciation,
        special_base,
        special_depreciation,
        total_depreciation,
        closing_wdv,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn policy() -> DepreciationPolicy {
        DepreciationPolicy {
            normal_rate: dec!(0.25),
            floor_amount: Decimal::ZERO,
            special_rate: dec!(0.40),
        }
    }

    fn inputs() -> DepreciationInputs {
        DepreciationInputs {
            opening_wdv: dec!(1_000),
            additions: dec!(300),
            disposals: dec!(100),
            special_additions: dec!(500),
        }
    }

    #[test]
    fn test_eligible_record() {
        let out = calculate_depreciation(&inputs(), true, &policy());
        assert_eq!(
            out,
            DepreciationOutput {
                normal_base: dec!(1_200),
                normal_depreciation: dec!(300),
                special_base: dec!(500),
                special_depreciation: dec!(200),
                total_depreciation: dec!(500),
                closing_wdv: dec!(1_200),
            }
        );
    }

    #[test]
    fn test_ineligible_record_gets_no_special_depreciation() {
        let out = calculate_depreciation(&inputs(), false, &policy());
        assert_eq!(out.special_depreciation, Decimal::ZERO);
        assert_eq!(out.total_depreciation, dec!(300));
        // Special additions still enter the closing pool
        assert_eq!(out.closing_wdv, dec!(1_400));
    }

    #[test]
    fn test_floor_amount_applies() {
        let mut p = policy();
        p.floor_amount = dec!(400);
        let out = calculate_depreciation(&inputs(), false, &p);
        assert_eq!(out.normal_depreciation, dec!(400));
    }

    #[test]
    fn test_negative_base_not_clamped() {
        let i = DepreciationInputs {
            opening_wdv: dec!(100),
            additions: Decimal::ZERO,
            disposals: dec!(300),
            special_additions: Decimal::ZERO,
        };
        let out = calculate_depreciation(&i, false, &policy());
        assert_eq!(out.normal_base, dec!(-200));
        // max(-50, 0 floor) = 0
        assert_eq!(out.normal_depreciation, Decimal::ZERO);
        assert_eq!(out.closing_wdv, dec!(-200));
    }
}
