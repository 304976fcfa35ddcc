pub mod signals;
pub mod weights;

pub use signals::*;
pub use weights::*;
