use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharityCap {
    pub max_deductible_charity: Money,
    pub deductible_charity: Money,
    pub non_deductible_charity: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestCap {
    pub net_non_interest_income: Money,
    pub max_deductible_interest: Money,
    pub non_deductible_interest: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitationOutput {
    pub charity: CharityCap,
    pub profit_before_interest: Money,
    pub interest: InterestCap,
    pub profit_after_interest: Money,
}

/// Deductible charity is capped at `rate` of adjusted profit with the
/// contribution added back.
pub fn apply_charity_cap(
    adjusted_profit: Money,
    charity_contribution: Money,
    rate: Rate,
) -> CharityCap {
    let max_deductible_charity = rate * (adjusted_profit + charity_contribution);
    let deductible_charity = max_deductible_charity.min(charity_contribution);
    CharityCap {
        max_deductible_charity,
        deductible_charity,
        non_deductible_charity: charity_contribution - deductible_charity,
    }
}

/// Thin-capitalisation limit: interest expense above `rate` of net
/// non-interest income plus interest income is disallowed.
pub fn apply_interest_cap(
    profit_before_interest: Money,
    interest_expense: Money,
    interest_income: Money,
    rate: Rate,
) -> InterestCap {
    let net_non_interest_income =
        (profit_before_interest + interest_expense - interest_income).max(Decimal::ZERO);
    let max_deductible_interest = rate * net_non_interest_income + interest_income;
    let non_deductible_interest = (interest_expense - max_deductible_interest).max(Decimal::ZERO);
    InterestCap {
        net_non_interest_income,
        max_deductible_interest,
        non_deductible_interest,
    }
}

/// Charity cap, then interest cap, each disallowance added back to profit.
pub fn apply_limitations(
    adjusted_profit: Money,
    charity_contribution: Money,
    interest_expense: Money,
    interest_income: Money,
    charity_rate: Rate,
    interest_rate: Rate,
) -> LimitationOutput {
    let charity = apply_charity_cap(adjusted_profit, charity_contribution, charity_rate);
    let profit_before_interest = adjusted_profit + charity.non_deductible_charity;

    let interest = apply_interest_cap(
        profit_before_interest,
        interest_expense,
        interest_income,
        interest_rate,
    );
    let profit_after_interest = profit_before_interest + interest.non_deductible_interest;

    LimitationOutput {
        charity,
        profit_before_interest,
        interest,
        profit_after_interest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_charity_within_cap() {
        // cap = 5% of (1000 + 20) = 51 > 20
        let cap = apply_charity_cap(dec!(1_000), dec!(20), dec!(0.05));
        assert_eq!(cap.max_deductible_charity, dec!(51));
        assert_eq!(cap.deductible_charity, dec!(20));
        assert_eq!(cap.non_deductible_charity, Decimal::ZERO);
    }

    #[test]
    fn test_charity_above_cap() {
        // cap = 5% of (900 + 100) = 50
        let cap = apply_charity_cap(dec!(900), dec!(100), dec!(0.05));
        assert_eq!(cap.deductible_charity, dec!(50));
        assert_eq!(cap.non_deductible_charity, dec!(50));
    }

    #[test]
    fn test_charity_cap_on_negative_base() {
        // The cap is not floored: a negative base adds back more than the gift
        let cap = apply_charity_cap(dec!(-1_000), dec!(100), dec!(0.05));
        assert_eq!(cap.max_deductible_charity, dec!(-45));
        assert_eq!(cap.deductible_charity, dec!(-45));
        assert_eq!(cap.non_deductible_charity, dec!(145));
    }

    #[test]
    fn test_interest_within_cap() {
        // nni = 1000 + 100 - 50 = 1050; max = 525 + 50 = 575 > 100
        let cap = apply_interest_cap(dec!(1_000), dec!(100), dec!(50), dec!(0.5));
        assert_eq!(cap.net_non_interest_income, dec!(1_050));
        assert_eq!(cap.max_deductible_interest, dec!(575));
        assert_eq!(cap.non_deductible_interest, Decimal::ZERO);
    }

    #[test]
    fn test_interest_above_cap() {
        // nni = 100 + 500 - 0 = 600; max = 300; disallowed = 200
        let cap = apply_interest_cap(dec!(100), dec!(500), Decimal::ZERO, dec!(0.5));
        assert_eq!(cap.non_deductible_interest, dec!(200));
    }

    #[test]
    fn test_interest_net_income_floored_at_zero() {
        // nni = max(-1000 + 100 - 0, 0) = 0; max = 0; all 100 disallowed
        let cap = apply_interest_cap(dec!(-1_000), dec!(100), Decimal::ZERO, dec!(0.5));
        assert_eq!(cap.net_non_interest_income, Decimal::ZERO);
        assert_eq!(cap.non_deductible_interest, dec!(100));
    }

    #[test]
    fn test_limitations_chain() {
        let out = apply_limitations(
            dec!(900),
            dec!(100),
            dec!(2_000),
            Decimal::ZERO,
            dec!(0.05),
            dec!(0.5),
        );
        assert_eq!(out.profit_before_interest, dec!(950));
        // nni = 950 + 2000 = 2950; max = 1475; disallowed = 525
        assert_eq!(out.interest.non_deductible_interest, dec!(525));
        assert_eq!(out.profit_after_interest, dec!(1_475));
    }
}
