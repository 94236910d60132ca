pub mod carryforward;

pub use carryforward::{
    apply_loss_carryforward, calculate_loss_carryforward, LossCarryforwardInput,
    LossCarryforwardOutput,
};
