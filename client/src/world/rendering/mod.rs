mod grass;
mod materials;
mod props;
mod surface;

pub use grass::*;
pub use materials::*;
pub use props::*;
pub use surface::*;
