use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CitError;
use crate::CitResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.20 = 20%). Never as percentages.
pub type Rate = Decimal;

/// Economic sector of the entity, carried on the record as a numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    Agriculture,
    Service,
    Manufacturing,
    Mining,
    Insurance,
}

impl Sector {
    /// Map the raw classification code (1..=5) onto a sector.
    pub fn from_code(code: u8) -> CitResult<Self> {
        match code {
            1 => Ok(Sector::Agriculture),
            2 => Ok(Sector::Service),
            3 => Ok(Sector::Manufacturing),
            4 => Ok(Sector::Mining),
            5 => Ok(Sector::Insurance),
            _ => Err(CitError::UnclassifiedSector { code }),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Sector::Agriculture => 1,
            Sector::Service => 2,
            Sector::Manufacturing => 3,
            Sector::Mining => 4,
            Sector::Insurance => 5,
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sector::Agriculture => "Agriculture",
            Sector::Service => "Service",
            Sector::Manufacturing => "Manufacturing",
            Sector::Mining => "Mining",
            Sector::Insurance => "Insurance",
        };
        write!(f, "{}", s)
    }
}

/// Firm size tier derived from turnover and total assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FirmSize {
    Small,
    Medium,
    Large,
}

impl fmt::Display for FirmSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FirmSize::Small => "Small",
            FirmSize::Medium => "Medium",
            FirmSize::Large => "Large",
        };
        write!(f, "{}", s)
    }
}

/// Legal form of the business. Sole proprietorships are taxed on the
/// progressive bracket schedule; every other form uses flat rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegalForm {
    SoleProprietorship,
    Partnership,
    PrivateLimited,
    PublicLimited,
    Other,
}

impl LegalForm {
    pub fn is_progressive(self) -> bool {
        matches!(self, LegalForm::SoleProprietorship)
    }
}

/// Flat-rate regime a record falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateRegime {
    Standard,
    Mining,
    Insurance,
    Qip,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
