pub mod trampoline;
pub mod vegetation;

pub use trampoline::*;
pub use vegetation::*;
