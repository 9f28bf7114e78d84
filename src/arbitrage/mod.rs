//! Arbitrage decision making and orchestration

pub mod engine;
pub mod profitability;
pub mod quote;

pub use engine::*;
pub use profitability::*;
pub use quote::*;
