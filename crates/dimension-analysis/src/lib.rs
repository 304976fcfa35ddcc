pub mod indicators;
pub mod scorers;


pub use indicators::*;
pub use scorers::*;
