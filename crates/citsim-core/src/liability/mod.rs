pub mod brackets;
pub mod cit;
pub mod excess_tax;

pub use brackets::{progressive_breakdown, progressive_tax, BracketSlice};
pub use cit::{calculate_liability, liability_regime, LiabilityInput, LiabilityOutput, LiabilityRegime};
pub use excess_tax::{accumulation_proportion, calculate_excess_tax, ExcessTaxOutput};
