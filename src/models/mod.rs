pub mod emotion;
pub mod sample;

pub use emotion::*;
pub use sample::*;
