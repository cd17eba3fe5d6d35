mod controller;
mod input;

pub use controller::*;
pub use input::*;
