//! Core data types and identifiers

pub mod assets;
pub mod params;
pub mod quote;
pub mod trade;

pub use assets::*;
pub use params::*;
pub use quote::*;
pub use trade::*;
