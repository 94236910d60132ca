use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CitError;
use crate::policy::MAX_CARRYFORWARD_YEARS;
use crate::record::LossHistory;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::CitResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LossCarryforwardInput {
    pub profit_after_interest: Money,
    pub carryforward_years: u8,
    #[serde(default)]
    pub loss_history: LossHistory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossCarryforwardOutput {
    /// Profit after interest less losses used. Negative when the period
    /// itself made a loss.
    pub net_taxable_profit: Money,
    /// Loss incurred this period, entering next period as vintage 1
    pub current_year_loss: Money,
    /// Loss used per vintage within the window, vintage 1 first
    pub used_losses: Vec<Money>,
    pub used_loss_total: Money,
    /// Unused loss in the oldest vintage of the window, lost at rollover
    pub expired_loss: Money,
    pub next_loss_history: LossHistory,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Set brought-forward losses against this period's profit and roll the
/// history forward one period.
///
/// Vintages are consumed oldest first (vintage `W` down to vintage 1), so
/// losses closest to expiry are used before newer ones. Vintages beyond the
/// window are ignored. With a window of zero nothing is used and nothing is
/// carried, whatever the sign of profit.
pub fn apply_loss_carryforward(
    profit_after_interest: Money,
    history: &LossHistory,
    carryforward_years: u8,
) -> CitResult<LossCarryforwardOutput> {
    if carryforward_years > MAX_CARRYFORWARD_YEARS {
        return Err(CitError::policy(
            "loss_carryforward_years",
            format!(
                "Carryforward window must be between 0 and {}, got {}",
                MAX_CARRYFORWARD_YEARS, carryforward_years
            ),
        ));
    }

    let years = carryforward_years as usize;
    if years == 0 {
        return Ok(LossCarryforwardOutput {
            net_taxable_profit: profit_after_interest,
            current_year_loss: Decimal::ZERO,
            used_losses: Vec::new(),
            used_loss_total: Decimal::ZERO,
            expired_loss: Decimal::ZERO,
            next_loss_history: LossHistory::zero(),
        });
    }

    let window = history.window(years);
    let mut used_losses = vec![Decimal::ZERO; years];

    let current_year_loss = if profit_after_interest < Decimal::ZERO {
        profit_after_interest.abs()
    } else {
        let mut cumulative_used = Decimal::ZERO;
        for i in (0..years).rev() {
            let available = profit_after_interest - cumulative_used;
            used_losses[i] = window[i].min(available);
            cumulative_used += used_losses[i];
        }
        Decimal::ZERO
    };

    let remaining: Vec<Money> = window
        .iter()
        .zip(&used_losses)
        .map(|(brought_forward, used)| brought_forward - used)
        .collect();
    let used_loss_total: Money = used_losses.iter().copied().sum();
    let expired_loss = remaining[years - 1];

    Ok(LossCarryforwardOutput {
        net_taxable_profit: profit_after_interest - used_loss_total,
        current_year_loss,
        used_losses,
        used_loss_total,
        expired_loss,
        next_loss_history: LossHistory::rolled(current_year_loss, &remaining),
    })
}

/// Standalone loss carryforward computation with warnings and metadata.
pub fn calculate_loss_carryforward(
    input: &LossCarryforwardInput,
) -> CitResult<ComputationOutput<LossCarryforwardOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let output = apply_loss_carryforward(
        input.profit_after_interest,
        &input.loss_history,
        input.carryforward_years,
    )?;

    let years = input.carryforward_years as usize;
    let beyond_window: Money = input.loss_history.as_slice()[years..].iter().copied().sum();
    if beyond_window > Decimal::ZERO {
        warnings.push(format!(
            "Brought-forward losses of {} lie outside the {}-year window and were ignored",
            beyond_window, years
        ));
    }
    if output.expired_loss > Decimal::ZERO {
        warnings.push(format!(
            "Unused loss of {} in vintage {} expires at rollover",
            output.expired_loss, years
        ));
    }
    if years == 0 && input.profit_after_interest < Decimal::ZERO {
        warnings.push(
            "Carryforward disabled: this period's loss is not carried to the next period".into(),
        );
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Loss carryforward: oldest-vintage-first consumption within the window, \
         then rollover with the current-year loss as the newest vintage",
        &serde_json::json!({
            "profit_after_interest": input.profit_after_interest.to_string(),
            "carryforward_years": input.carryforward_years,
            "brought_forward_total": input.loss_history.total().to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn history(amounts: &[Money]) -> LossHistory {
        LossHistory::from_vintages(amounts).unwrap()
    }

    #[test]
    fn test_zero_window_ignores_history() {
        let h = history(&[dec!(50), dec!(50)]);
        let out = apply_loss_carryforward(dec!(100), &h, 0).unwrap();
        assert_eq!(out.net_taxable_profit, dec!(100));
        assert_eq!(out.used_loss_total, Decimal::ZERO);
        assert!(out.next_loss_history.is_zero());
    }

    #[test]
    fn test_zero_window_drops_current_loss() {
        let out = apply_loss_carryforward(dec!(-80), &LossHistory::zero(), 0).unwrap();
        assert_eq!(out.net_taxable_profit, dec!(-80));
        assert!(out.next_loss_history.is_zero());
    }

    #[test]
    fn test_oldest_vintage_consumed_first() {
        // window 3: vintage 3 = 50 is oldest, consumed before vintage 1 = 40
        let h = history(&[dec!(40), dec!(0), dec!(50)]);
        let out = apply_loss_carryforward(dec!(70), &h, 3).unwrap();
        assert_eq!(out.used_losses, vec![dec!(20), dec!(0), dec!(50)]);
        assert_eq!(out.used_loss_total, dec!(70));
        assert_eq!(out.net_taxable_profit, Decimal::ZERO);
        // vintage 1 had 20 left and ages into vintage 2
        assert_eq!(out.next_loss_history.vintage(2), dec!(20));
        assert_eq!(out.expired_loss, Decimal::ZERO);
    }

    #[test]
    fn test_partial_use_of_oldest_vintage_expires_remainder() {
        let h = history(&[dec!(0), dec!(0), dec!(50)]);
        let out = apply_loss_carryforward(dec!(30), &h, 3).unwrap();
        assert_eq!(out.used_losses, vec![dec!(0), dec!(0), dec!(30)]);
        assert_eq!(out.net_taxable_profit, Decimal::ZERO);
        assert_eq!(out.expired_loss, dec!(20));
        assert!(out.next_loss_history.is_zero());
    }

    #[test]
    fn test_losses_exceed_profit() {
        let h = history(&[dec!(100), dec!(100)]);
        let out = apply_loss_carryforward(dec!(150), &h, 2).unwrap();
        assert_eq!(out.used_losses, vec![dec!(50), dec!(100)]);
        assert_eq!(out.net_taxable_profit, Decimal::ZERO);
        assert_eq!(out.next_loss_history.vintage(1), Decimal::ZERO);
        assert_eq!(out.next_loss_history.vintage(2), dec!(50));
    }

    #[test]
    fn test_current_loss_becomes_newest_vintage() {
        let h = history(&[dec!(10), dec!(20), dec!(30)]);
        let out = apply_loss_carryforward(dec!(-40), &h, 5).unwrap();
        assert_eq!(out.used_loss_total, Decimal::ZERO);
        assert_eq!(out.current_year_loss, dec!(40));
        assert_eq!(out.net_taxable_profit, dec!(-40));
        assert_eq!(
            out.next_loss_history.as_slice()[..5].to_vec(),
            vec![dec!(40), dec!(10), dec!(20), dec!(30), dec!(0)]
        );
    }

    #[test]
    fn test_vintages_beyond_window_ignored() {
        let h = history(&[dec!(0), dec!(0), dec!(0), dec!(500)]);
        let out = apply_loss_carryforward(dec!(100), &h, 3).unwrap();
        assert_eq!(out.used_loss_total, Decimal::ZERO);
        assert_eq!(out.net_taxable_profit, dec!(100));
        assert!(out.next_loss_history.is_zero());
    }

    #[test]
    fn test_full_ten_year_window() {
        let amounts: Vec<Money> = (1..=10).map(|_| dec!(10)).collect();
        let out = apply_loss_carryforward(dec!(35), &history(&amounts), 10).unwrap();
        assert_eq!(out.used_loss_total, dec!(35));
        // vintages 10, 9, 8 fully used, vintage 7 half used
        assert_eq!(out.used_losses[9], dec!(10));
        assert_eq!(out.used_losses[6], dec!(5));
        assert_eq!(out.used_losses[5], Decimal::ZERO);
        assert_eq!(out.next_loss_history.vintage(8), dec!(5));
        assert_eq!(out.next_loss_history.vintage(9), Decimal::ZERO);
        assert_eq!(out.next_loss_history.vintage(10), Decimal::ZERO);
    }

    #[test]
    fn test_window_above_ten_rejected() {
        let err = apply_loss_carryforward(dec!(1), &LossHistory::zero(), 11).unwrap_err();
        assert!(matches!(err, CitError::InvalidPolicy { .. }));
    }

    #[test]
    fn test_input_history_not_mutated() {
        let h = history(&[dec!(10), dec!(20)]);
        let before = h;
        let _ = apply_loss_carryforward(dec!(100), &h, 2).unwrap();
        assert_eq!(h, before);
    }

    #[test]
    fn test_standalone_warnings() {
        let input = LossCarryforwardInput {
            profit_after_interest: dec!(30),
            carryforward_years: 3,
            loss_history: history(&[dec!(0), dec!(0), dec!(50), dec!(9)]),
        };
        let result = calculate_loss_carryforward(&input).unwrap();
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].contains("outside the 3-year window"));
        assert!(result.warnings[1].contains("expires"));
        assert!(!result.methodology.is_empty());
    }
}
