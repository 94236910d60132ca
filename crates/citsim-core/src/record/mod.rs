pub mod entity;
pub mod loss_history;

pub use entity::*;
pub use loss_history::{LossHistory, LOSS_HISTORY_SLOTS};
