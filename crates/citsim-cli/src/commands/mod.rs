pub mod carryforward;
pub mod liability;
pub mod policy;
pub mod population;
