use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CitError;
use crate::types::Money;
use crate::CitResult;

/// Number of loss vintages carried on every record.
pub const LOSS_HISTORY_SLOTS: usize = 10;

/// Brought-forward losses by vintage, most recent first.
///
/// Slot 0 holds vintage 1 (last year's loss), slot 9 holds vintage 10. The
/// value is never edited in place: the carryforward engine reads one history
/// and returns a new one for the next period.
///
/// Serialises as a plain JSON array; shorter arrays are padded with zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Money>", into = "Vec<Money>")]
pub struct LossHistory([Money; LOSS_HISTORY_SLOTS]);

impl LossHistory {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build a history from vintage amounts, most recent first.
    pub fn from_vintages(amounts: &[Money]) -> CitResult<Self> {
        if amounts.len() > LOSS_HISTORY_SLOTS {
            return Err(CitError::input(
                "loss_history",
                format!(
                    "At most {} loss vintages are supported, got {}",
                    LOSS_HISTORY_SLOTS,
                    amounts.len()
                ),
            ));
        }
        if let Some(pos) = amounts.iter().position(|a| *a < Decimal::ZERO) {
            return Err(CitError::input(
                "loss_history",
                format!("Loss vintage {} is negative ({})", pos + 1, amounts[pos]),
            ));
        }
        let mut slots = [Decimal::ZERO; LOSS_HISTORY_SLOTS];
        slots[..amounts.len()].copy_from_slice(amounts);
        Ok(Self(slots))
    }

    /// Loss brought forward from `vintage` years ago (1-based). Vintages
    /// outside 1..=10 are expired and read as zero.
    pub fn vintage(&self, vintage: usize) -> Money {
        if (1..=LOSS_HISTORY_SLOTS).contains(&vintage) {
            self.0[vintage - 1]
        } else {
            Decimal::ZERO
        }
    }

    pub fn as_slice(&self) -> &[Money] {
        &self.0
    }

    /// The vintages usable under a carryforward window of `years`.
    pub fn window(&self, years: usize) -> &[Money] {
        &self.0[..years.min(LOSS_HISTORY_SLOTS)]
    }

    pub fn total(&self) -> Money {
        self.0.iter().copied().sum()
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| v.is_zero())
    }

    /// Next period's history: the current-year loss enters as vintage 1 and
    /// each remaining vintage ages one year. The last entry of `remaining`
    /// has reached the end of its window and is dropped.
    pub(crate) fn rolled(current_year_loss: Money, remaining: &[Money]) -> Self {
        let mut slots = [Decimal::ZERO; LOSS_HISTORY_SLOTS];
        slots[0] = current_year_loss;
        let kept = remaining.len().saturating_sub(1).min(LOSS_HISTORY_SLOTS - 1);
        slots[1..=kept].copy_from_slice(&remaining[..kept]);
        Self(slots)
    }
}

impl TryFrom<Vec<Money>> for LossHistory {
    type Error = CitError;

    fn try_from(amounts: Vec<Money>) -> Result<Self, Self::Error> {
        Self::from_vintages(&amounts)
    }
}

impl From<LossHistory> for Vec<Money> {
    fn from(history: LossHistory) -> Self {
        history.0.to_vec()
    }
}
