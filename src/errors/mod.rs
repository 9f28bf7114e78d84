//! Error types for the engine and its venue connectors

pub mod arb_error;
pub mod venue_error;

pub use arb_error::*;
pub use venue_error::*;
