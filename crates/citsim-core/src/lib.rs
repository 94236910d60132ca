pub mod error;
pub mod types;

pub mod policy;
pub mod record;

pub mod behavioral;
pub mod classification;
pub mod depreciation;
pub mod liability;
pub mod losses;
pub mod profit;

pub mod pipeline;
pub mod population;

pub use error::CitError;
pub use types::*;

/// Standard result type for all citsim operations
pub type CitResult<T> = Result<T, CitError>;
