use citsim_core::liability::{calculate_liability, progressive_tax, LiabilityInput};
use citsim_core::losses::apply_loss_carryforward;
use citsim_core::policy::PolicyParameters;
use citsim_core::record::{LossHistory, LOSS_HISTORY_SLOTS};
use citsim_core::{LegalForm, Money, Sector};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn money(cents: i64) -> Money {
    Decimal::new(cents, 2)
}

fn history_from(cents: &[u32]) -> LossHistory {
    let amounts: Vec<Money> = cents.iter().map(|c| money(*c as i64)).collect();
    LossHistory::from_vintages(&amounts).unwrap()
}

fn legal_form(code: u8) -> LegalForm {
    match code {
        0 => LegalForm::SoleProprietorship,
        1 => LegalForm::Partnership,
        2 => LegalForm::PrivateLimited,
        3 => LegalForm::PublicLimited,
        _ => LegalForm::Other,
    }
}

// ===========================================================================
// Loss carryforward
// ===========================================================================

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(64))]

    #[test]
    fn prop_zero_window_carries_nothing(
        profit in -10_000_000i64..10_000_000,
        history in prop::collection::vec(0u32..5_000_000, 0..=LOSS_HISTORY_SLOTS),
    ) {
        let out = apply_loss_carryforward(money(profit), &history_from(&history), 0).unwrap();
        prop_assert!(out.next_loss_history.is_zero());
        prop_assert_eq!(out.used_loss_total, Decimal::ZERO);
        prop_assert_eq!(out.net_taxable_profit, money(profit));
    }

    #[test]
    fn prop_used_loss_bounded_by_profit_and_window(
        profit in 0i64..10_000_000,
        history in prop::collection::vec(0u32..5_000_000, 0..=LOSS_HISTORY_SLOTS),
        window in 1u8..=10,
    ) {
        let h = history_from(&history);
        let out = apply_loss_carryforward(money(profit), &h, window).unwrap();
        let available: Money = h.window(window as usize).iter().copied().sum();

        prop_assert!(out.used_loss_total <= money(profit).min(available));
        prop_assert!(out.net_taxable_profit >= Decimal::ZERO);
        prop_assert_eq!(out.used_loss_total, money(profit).min(available));
    }

    #[test]
    fn prop_oldest_vintage_exhausted_first(
        profit in 0i64..10_000_000,
        history in prop::collection::vec(0u32..5_000_000, 0..=LOSS_HISTORY_SLOTS),
        window in 1u8..=10,
    ) {
        let h = history_from(&history);
        let out = apply_loss_carryforward(money(profit), &h, window).unwrap();
        let w = window as usize;

        // A newer vintage is only touched once every older one is used up
        for newer in 0..w {
            if out.used_losses[newer] > Decimal::ZERO {
                for older in (newer + 1)..w {
                    prop_assert_eq!(out.used_losses[older], h.vintage(older + 1));
                }
            }
        }
    }

    #[test]
    fn prop_rollover_conserves_unexpired_losses(
        profit in -10_000_000i64..10_000_000,
        history in prop::collection::vec(0u32..5_000_000, 0..=LOSS_HISTORY_SLOTS),
        window in 1u8..=10,
    ) {
        let h = history_from(&history);
        let out = apply_loss_carryforward(money(profit), &h, window).unwrap();
        let available: Money = h.window(window as usize).iter().copied().sum();

        prop_assert_eq!(
            out.next_loss_history.total(),
            out.current_year_loss + available - out.used_loss_total - out.expired_loss
        );
    }
}

// ===========================================================================
// Liability
// ===========================================================================

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(64))]

    #[test]
    fn prop_liability_non_negative(
        base in -1_000_000_000i64..1_000_000_000,
        excess in 0i64..100_000_000,
        sector_code in 1u8..=5,
        form in 0u8..5,
        qip in any::<bool>(),
        switch_pct in 0i64..=100,
    ) {
        let mut policy = PolicyParameters::default();
        policy.switch_prog = Decimal::new(switch_pct, 2);
        let input = LiabilityInput {
            net_tax_base_behavior: money(base),
            excess_tax: money(excess),
            sector: Sector::from_code(sector_code).unwrap(),
            legal_form: legal_form(form),
            qip_flag: qip,
            mintax_exempt: false,
            turnover: money(base.abs()),
        };

        let out = calculate_liability(&input, &policy).unwrap();
        prop_assert!(out.cit_liability >= Decimal::ZERO);
        if input.net_tax_base_behavior <= Decimal::ZERO {
            prop_assert_eq!(out.cit_liability, Decimal::ZERO);
        }
    }

    #[test]
    fn prop_progressive_tax_monotone(
        a in 0i64..50_000_000_000,
        b in 0i64..50_000_000_000,
    ) {
        let schedule = PolicyParameters::default().progressive;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(progressive_tax(money(lo), &schedule) <= progressive_tax(money(hi), &schedule));
    }
}

#[test]
fn test_progressive_continuous_at_default_thresholds() {
    let schedule = PolicyParameters::default().progressive;
    let eps = Decimal::new(1, 2);
    for t in schedule.thresholds {
        let below = progressive_tax(t - eps, &schedule);
        let at = progressive_tax(t, &schedule);
        let above = progressive_tax(t + eps, &schedule);
        assert!(at - below <= eps, "jump below {}", t);
        assert!(above - at <= eps, "jump above {}", t);
    }
}
