use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::policy::ProgressiveSchedule;
use crate::types::{Money, Rate};

/// Tax raised by one bracket of the progressive schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub lower: Money,
    /// None for the open top bracket
    pub upper: Option<Money>,
    pub rate: Rate,
    pub taxable: Money,
    pub tax: Money,
}

/// Marginal-bracket breakdown: each bracket taxes only the part of `base`
/// between its lower and upper thresholds.
pub fn progressive_breakdown(base: Money, schedule: &ProgressiveSchedule) -> Vec<BracketSlice> {
    let mut slices = Vec::with_capacity(schedule.rates.len());
    let mut lower = Decimal::ZERO;

    for (k, rate) in schedule.rates.iter().enumerate() {
        let upper = schedule.thresholds.get(k).copied();
        let ceiling = upper.map_or(base, |u| base.min(u));
        let taxable = (ceiling - lower).max(Decimal::ZERO);
        slices.push(BracketSlice {
            lower,
            upper,
            rate: *rate,
            taxable,
            tax: *rate * taxable,
        });
        if let Some(u) = upper {
            lower = u;
        }
    }
    slices
}

pub fn progressive_tax(base: Money, schedule: &ProgressiveSchedule) -> Money {
    progressive_breakdown(base, schedule)
        .iter()
        .map(|s| s.tax)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn schedule() -> ProgressiveSchedule {
        ProgressiveSchedule {
            thresholds: [dec!(100), dec!(200), dec!(500), dec!(1_000)],
            rates: [dec!(0), dec!(0.05), dec!(0.10), dec!(0.15), dec!(0.20)],
        }
    }

    #[test]
    fn test_inside_first_bracket() {
        assert_eq!(progressive_tax(dec!(80), &schedule()), Decimal::ZERO);
    }

    #[test]
    fn test_third_bracket() {
        // 0 + 100*0.05 + 100*0.10 = 15
        assert_eq!(progressive_tax(dec!(300), &schedule()), dec!(15));
    }

    #[test]
    fn test_top_bracket() {
        // 0 + 5 + 30 + 75 + 1000*0.20 = 310
        assert_eq!(progressive_tax(dec!(2_000), &schedule()), dec!(310));
    }

    #[test]
    fn test_breakdown_shape() {
        let slices = progressive_breakdown(dec!(300), &schedule());
        assert_eq!(slices.len(), 5);
        assert_eq!(slices[2].taxable, dec!(100));
        assert_eq!(slices[3].taxable, Decimal::ZERO);
        assert_eq!(slices[4].upper, None);
        assert_eq!(slices[4].lower, dec!(1_000));
    }

    #[test]
    fn test_continuous_at_each_threshold() {
        let s = schedule();
        let eps = dec!(0.000001);
        for t in s.thresholds {
            let gap = progressive_tax(t + eps, &s) - progressive_tax(t, &s);
            assert!(gap >= Decimal::ZERO && gap <= eps, "jump of {} at {}", gap, t);
        }
    }

    #[test]
    fn test_equal_thresholds_collapse_bracket() {
        let s = ProgressiveSchedule {
            thresholds: [dec!(100), dec!(100), dec!(500), dec!(1_000)],
            rates: [dec!(0), dec!(0.05), dec!(0.10), dec!(0.15), dec!(0.20)],
        };
        // Second bracket is empty: 0 + 0 + 200*0.10
        assert_eq!(progressive_tax(dec!(300), &s), dec!(20));
    }
}
