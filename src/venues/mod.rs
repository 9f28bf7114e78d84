//! Venue connector seam and implementations

pub mod amm;
pub mod fixed;

pub use amm::*;
pub use fixed::*;

use alloy::primitives::U256;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{ArbError, ArbResult, VenueError, VenueResult};
use crate::types::{AssetId, VenueId};

/// Which way funds moved through a venue's base/token pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    BaseToToken,
    TokenToBase,
}

/// Parameters for one effectful swap.
#[derive(Debug, Clone)]
pub struct SwapRequest {
    pub amount_in: U256,
    /// Slippage floor: the venue must refuse to deliver less than this.
    pub min_amount_out: U256,
    /// Two-hop path `[asset_in, asset_out]`.
    pub path: Vec<AssetId>,
    /// Validity window; the venue must refuse the swap once this passes.
    pub deadline: DateTime<Utc>,
}

/// Proof of a completed swap, sufficient to undo it exactly.
#[derive(Debug, Clone)]
pub struct SwapReceipt {
    pub venue: VenueId,
    /// The non-base side of the pair that was traded.
    pub asset: AssetId,
    pub direction: SwapDirection,
    pub amount_in: U256,
    pub amount_out: U256,
}

/// External liquidity venue offering pairwise rates against its native
/// base asset.
///
/// `quote` is a pure view: it must not move funds or mutate venue state.
/// Swap calls either deliver at least `min_amount_out` within the deadline
/// or fail without effect. `unwind` reverses a swap this venue previously
/// receipted and must not fail; it is the substrate guarantee the
/// two-leg execution boundary is built on.
#[async_trait]
pub trait Venue: Send + Sync {
    fn id(&self) -> VenueId;

    fn name(&self) -> &str;

    /// Identifier of the venue's native base asset (its WETH analogue).
    fn native_asset(&self) -> AssetId;

    /// Quote a path without side effects. Returns the amounts at every
    /// hop, input first, final output last.
    async fn quote(&self, amount_in: U256, path: &[AssetId]) -> VenueResult<Vec<U256>>;

    /// Effectful: convert base into token along `request.path`.
    async fn swap_base_for_token(&self, request: SwapRequest) -> VenueResult<SwapReceipt>;

    /// Effectful: convert token back into base along `request.path`.
    async fn swap_token_for_base(&self, request: SwapRequest) -> VenueResult<SwapReceipt>;

    /// Undo a previously receipted swap exactly. Infallible by contract.
    async fn unwind(&self, receipt: &SwapReceipt);
}

/// The fixed set of venues the engine can transact against, keyed by id.
/// Approval is layered on top by the registry; membership here never
/// changes at runtime.
pub type VenueDirectory = HashMap<VenueId, Arc<dyn Venue>>;

/// Look up a venue, treating an unknown id as an unapproved participant.
pub fn resolve_venue(venues: &VenueDirectory, id: VenueId) -> ArbResult<Arc<dyn Venue>> {
    venues
        .get(&id)
        .cloned()
        .ok_or(ArbError::VenueUnapproved { venue: id })
}

/// Validate a two-hop path against the venue's native asset and work out
/// which pair and direction it names.
pub fn resolve_direction(
    native: AssetId,
    path: &[AssetId],
) -> VenueResult<(AssetId, SwapDirection)> {
    if path.len() != 2 {
        return Err(VenueError::MalformedPath { hops: path.len() });
    }
    let (asset_in, asset_out) = (path[0], path[1]);
    if asset_in == asset_out {
        return Err(VenueError::UnknownPair {
            asset_in,
            asset_out,
        });
    }
    if asset_in == native {
        Ok((asset_out, SwapDirection::BaseToToken))
    } else if asset_out == native {
        Ok((asset_in, SwapDirection::TokenToBase))
    } else {
        Err(VenueError::UnknownPair {
            asset_in,
            asset_out,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{USDC, WETH};

    #[test]
    fn direction_follows_path_order() {
        let (asset, dir) = resolve_direction(WETH, &[WETH, USDC]).unwrap();
        assert_eq!(asset, USDC);
        assert_eq!(dir, SwapDirection::BaseToToken);

        let (asset, dir) = resolve_direction(WETH, &[USDC, WETH]).unwrap();
        assert_eq!(asset, USDC);
        assert_eq!(dir, SwapDirection::TokenToBase);
    }

    #[test]
    fn paths_must_touch_the_native_asset() {
        let err = resolve_direction(WETH, &[USDC, USDC]).unwrap_err();
        assert!(matches!(err, VenueError::UnknownPair { .. }));
    }

    #[test]
    fn paths_must_have_exactly_two_hops() {
        let err = resolve_direction(WETH, &[WETH]).unwrap_err();
        assert!(matches!(err, VenueError::MalformedPath { hops: 1 }));

        let err = resolve_direction(WETH, &[WETH, USDC, WETH]).unwrap_err();
        assert!(matches!(err, VenueError::MalformedPath { hops: 3 }));
    }
}
