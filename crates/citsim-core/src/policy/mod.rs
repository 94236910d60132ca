pub mod parameters;
pub mod validation;

pub use parameters::*;
pub use validation::validate_policy;
