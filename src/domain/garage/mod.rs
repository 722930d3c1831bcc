mod new_garage_car;
mod types;

pub use new_garage_car::{GarageCarDetails, NewGarageCar};
pub use types::*;
