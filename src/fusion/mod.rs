pub mod audio;
pub mod engine;
pub mod normalize;
pub mod visual;

pub use audio::*;
pub use engine::*;
pub use normalize::*;
pub use visual::*;
