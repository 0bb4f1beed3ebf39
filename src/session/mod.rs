pub mod aggregate;
pub mod charts;
pub mod history;
pub mod sampler;

pub use aggregate::*;
pub use charts::*;
pub use history::*;
pub use sampler::*;
