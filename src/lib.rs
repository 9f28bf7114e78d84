//! Round-trip arbitrage bot - two-venue arbitrage engine with simulated AMMs
//!
//! The engine quotes a base → token → base round trip across two approved
//! venues, executes both legs atomically when the margin clears the
//! configured minimum, and pays the full settled balance back out. A
//! keeper binary drives it against simulated constant-product venues.

pub mod admin;
pub mod arbitrage;
pub mod config;
pub mod errors;
pub mod execution;
pub mod network;
pub mod registry;
pub mod storage;
pub mod types;
pub mod utils;
pub mod venues;

// Re-export commonly used items
pub use arbitrage::{ArbEngine, EngineSettings};
pub use config::{CONFIG, Config};
pub use errors::{ArbError, ArbResult};
pub use types::*;
