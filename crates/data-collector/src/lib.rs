pub mod collector;
pub mod config;
pub mod sec;
pub mod whale;
pub mod yahoo;

pub use collector::*;
pub use config::*;
pub use sec::*;
pub use whale::*;
pub use yahoo::*;
