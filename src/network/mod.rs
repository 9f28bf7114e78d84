//! Outbound network access: reference rates and retry plumbing

pub mod reference;
pub mod retry;

pub use reference::*;
pub use retry::*;
