pub mod input;
pub mod output;
pub mod storage;

pub use input::*;
pub use output::*;
pub use storage::*;
