//! Utility functions and helpers

pub mod display;
pub mod logging;
pub mod math;

pub use display::*;
pub use logging::*;
pub use math::*;
