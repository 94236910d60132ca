use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate, RateRegime, Sector};

/// Longest loss-carryforward window the record layout can hold.
pub const MAX_CARRYFORWARD_YEARS: u8 = 10;

// ---------------------------------------------------------------------------
// Size classification
// ---------------------------------------------------------------------------

/// A (turnover, total assets) threshold pair. Exceeding either axis
/// qualifies for the tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPair {
    pub turnover: Money,
    pub assets: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub large: ThresholdPair,
    pub medium: ThresholdPair,
}

/// Size thresholds per sector group. Insurance shares the service table,
/// mining shares the manufacturing table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeThresholds {
    pub agriculture: TierThresholds,
    pub service: TierThresholds,
    pub manufacturing: TierThresholds,
}

impl SizeThresholds {
    pub fn for_sector(&self, sector: Sector) -> &TierThresholds {
        match sector {
            Sector::Agriculture => &self.agriculture,
            Sector::Service | Sector::Insurance => &self.service,
            Sector::Manufacturing | Sector::Mining => &self.manufacturing,
        }
    }
}

impl Default for SizeThresholds {
    fn default() -> Self {
        Self {
            agriculture: TierThresholds {
                large: ThresholdPair {
                    turnover: dec!(4_000_000_000),
                    assets: dec!(2_000_000_000),
                },
                medium: ThresholdPair {
                    turnover: dec!(1_000_000_000),
                    assets: dec!(1_000_000_000),
                },
            },
            service: TierThresholds {
                large: ThresholdPair {
                    turnover: dec!(6_000_000_000),
                    assets: dec!(2_000_000_000),
                },
                medium: ThresholdPair {
                    turnover: dec!(1_000_000_000),
                    assets: dec!(1_000_000_000),
                },
            },
            manufacturing: TierThresholds {
                large: ThresholdPair {
                    turnover: dec!(8_000_000_000),
                    assets: dec!(4_000_000_000),
                },
                medium: ThresholdPair {
                    turnover: dec!(1_600_000_000),
                    assets: dec!(2_000_000_000),
                },
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Depreciation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepreciationPolicy {
    /// Rate applied to the normal pool base
    pub normal_rate: Rate,
    /// Minimum normal depreciation claim per record
    pub floor_amount: Money,
    /// Rate applied to special-pool additions for eligible records
    pub special_rate: Rate,
}

impl Default for DepreciationPolicy {
    fn default() -> Self {
        Self {
            normal_rate: dec!(0.25),
            floor_amount: Decimal::ZERO,
            special_rate: dec!(0.40),
        }
    }
}

// ---------------------------------------------------------------------------
// Behavioral response
// ---------------------------------------------------------------------------

/// Three income bands split by two ascending thresholds, one elasticity per band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElasticityBands {
    pub thresholds: [Money; 2],
    pub values: [Decimal; 3],
}

impl Default for ElasticityBands {
    fn default() -> Self {
        Self {
            thresholds: [dec!(100_000_000), dec!(1_000_000_000)],
            values: [dec!(0.1), dec!(0.2), dec!(0.3)],
        }
    }
}

// ---------------------------------------------------------------------------
// Rates and schedules
// ---------------------------------------------------------------------------

/// Flat statutory rates per regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatutoryRates {
    pub standard: Rate,
    pub mining: Rate,
    pub insurance: Rate,
    pub qip: Rate,
}

impl StatutoryRates {
    pub fn rate_for(&self, regime: RateRegime) -> Rate {
        match regime {
            RateRegime::Standard => self.standard,
            RateRegime::Mining => self.mining,
            RateRegime::Insurance => self.insurance,
            RateRegime::Qip => self.qip,
        }
    }
}

impl Default for StatutoryRates {
    fn default() -> Self {
        Self {
            standard: dec!(0.20),
            mining: dec!(0.30),
            insurance: dec!(0.05),
            qip: dec!(0.09),
        }
    }
}

/// Five-bracket marginal schedule: `rates[k]` applies to the band between
/// `thresholds[k-1]` and `thresholds[k]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressiveSchedule {
    pub thresholds: [Money; 4],
    pub rates: [Rate; 5],
}

impl Default for ProgressiveSchedule {
    fn default() -> Self {
        Self {
            thresholds: [
                dec!(18_000_000),
                dec!(24_000_000),
                dec!(102_000_000),
                dec!(150_000_000),
            ],
            rates: [dec!(0), dec!(0.05), dec!(0.10), dec!(0.15), dec!(0.20)],
        }
    }
}

/// Tiered surcharge on extractive-sector accumulation ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcessTaxSchedule {
    pub thresholds: [Rate; 3],
    pub rates: [Rate; 3],
}

impl Default for ExcessTaxSchedule {
    fn default() -> Self {
        Self {
            thresholds: [dec!(1.3), dec!(1.6), dec!(2.0)],
            rates: [dec!(0.10), dec!(0.20), dec!(0.30)],
        }
    }
}

/// Turnover-based minimum tax. Disabled unless a policy file turns it on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimumTaxPolicy {
    pub enabled: bool,
    pub rate: Rate,
}

impl Default for MinimumTaxPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            rate: dec!(0.01),
        }
    }
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// The record-independent policy bundle shared by every record in a run.
///
/// Missing fields in a policy file fall back to the defaults below, so a
/// reform file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyParameters {
    pub size_thresholds: SizeThresholds,
    pub depreciation: DepreciationPolicy,
    /// Cap on deductible charity as a share of profit including the contribution
    pub charity_deduction_rate: Rate,
    /// Share of net non-interest income allowed as interest deduction
    pub interest_deduction_rate: Rate,
    /// Number of prior-year loss vintages usable this period (0..=10)
    pub loss_carryforward_years: u8,
    pub elasticity: ElasticityBands,
    /// Rates in force before the simulated change
    pub current_law_rates: StatutoryRates,
    /// Rates under the simulated policy; these are the rates applied
    pub rates: StatutoryRates,
    pub progressive: ProgressiveSchedule,
    /// Blend weight between the progressive and flat schedules
    pub switch_prog: Rate,
    pub excess_tax: ExcessTaxSchedule,
    pub minimum_tax: MinimumTaxPolicy,
}

impl Default for PolicyParameters {
    fn default() -> Self {
        Self {
            size_thresholds: SizeThresholds::default(),
            depreciation: DepreciationPolicy::default(),
            charity_deduction_rate: dec!(0.05),
            interest_deduction_rate: dec!(0.50),
            loss_carryforward_years: 5,
            elasticity: ElasticityBands::default(),
            current_law_rates: StatutoryRates::default(),
            rates: StatutoryRates::default(),
            progressive: ProgressiveSchedule::default(),
            switch_prog: Decimal::ONE,
            excess_tax: ExcessTaxSchedule::default(),
            minimum_tax: MinimumTaxPolicy::default(),
        }
    }
}
