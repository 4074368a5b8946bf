//! Systems - logic that operates on components

mod color_cycle;
mod elimination;
mod spawning;

pub use color_cycle::*;
pub use elimination::*;
pub use spawning::*;
