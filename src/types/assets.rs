//! Venue and asset identifiers

use alloy::primitives::{Address, address};

/// Identifier of an external liquidity venue (its router address).
pub type VenueId = Address;

/// Identifier of a tradable asset (its token address).
pub type AssetId = Address;

// Base-network identifiers used by the default keeper setup
pub const WETH: AssetId = address!("4200000000000000000000000000000000000006");
pub const USDC: AssetId = address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");

// Router addresses standing in for the two simulated venues
pub const VENUE_ALPHA_ROUTER: VenueId = address!("cF77a3Ba9A5CA399B7c97c74d54e5b1Beb874E43");
pub const VENUE_BETA_ROUTER: VenueId = address!("327Df1E6de05895d2ab08513aaDD9313Fe505d86");
