//! Execution boundary: admission, funds custody, swaps, settlement

pub mod executor;
pub mod guard;
pub mod settlement;
pub mod treasury;

pub use executor::*;
pub use guard::*;
pub use settlement::*;
pub use treasury::*;
