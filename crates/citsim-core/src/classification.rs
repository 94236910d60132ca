use serde::{Deserialize, Serialize};

use crate::policy::SizeThresholds;
use crate::record::EntityRecord;
use crate::types::{FirmSize, Money, Sector};
use crate::CitResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub sector: Sector,
    pub size: FirmSize,
    pub turnover: Money,
    pub total_assets: Money,
}

/// Resolve sector, turnover, total assets and firm size for a record.
///
/// A sector code outside 1..=5 fails the record with
/// `CitError::UnclassifiedSector` instead of leaving size unset. Amounts
/// beyond `MAX_INPUT_AMOUNT` fail it with `CitError::InvalidInput`.
pub fn classify_entity(
    record: &EntityRecord,
    thresholds: &SizeThresholds,
) -> CitResult<Classification> {
    record.check_amounts()?;

    let sector = Sector::from_code(record.sector_code)?;
    let turnover = record.turnover();
    let total_assets = record.total_assets();
    let size = determine_size(sector, turnover, total_assets, thresholds);

    Ok(Classification {
        sector,
        size,
        turnover,
        total_assets,
    })
}

/// Large if either axis exceeds the large pair, else medium if either axis
/// exceeds the medium pair, else small. Thresholds themselves are inclusive
/// of the lower tier.
pub fn determine_size(
    sector: Sector,
    turnover: Money,
    total_assets: Money,
    thresholds: &SizeThresholds,
) -> FirmSize {
    let tiers = thresholds.for_sector(sector);
    if turnover > tiers.large.turnover || total_assets > tiers.large.assets {
        FirmSize::Large
    } else if turnover > tiers.medium.turnover || total_assets > tiers.medium.assets {
        FirmSize::Medium
    } else {
        FirmSize::Small
    }
}
