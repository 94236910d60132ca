pub mod elasticity;

pub use elasticity::{
    adjust_for_behavior, net_of_tax_rate_change, response_regime, select_elasticity,
    BehavioralOutput,
};
