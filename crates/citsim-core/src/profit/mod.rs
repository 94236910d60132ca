pub mod adjustment;
pub mod limitations;

pub use adjustment::{adjust_profit, AdjustedProfit};
pub use limitations::{
    apply_charity_cap, apply_interest_cap, apply_limitations, CharityCap, InterestCap,
    LimitationOutput,
};
