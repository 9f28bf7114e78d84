//! Allow-list registry for venues and tradable assets

use std::collections::HashMap;

use crate::types::{AssetId, VenueId};

/// Authoritative approval set consulted before every quote and every
/// execution. Default-deny: an address never added is not approved.
/// Administration may flip entries at any time, so callers must re-check
/// on every use rather than caching a verdict.
#[derive(Debug, Default)]
pub struct ApprovalRegistry {
    venues: HashMap<VenueId, bool>,
    assets: HashMap<AssetId, bool>,
}

impl ApprovalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_venue(&mut self, venue: VenueId, approved: bool) {
        self.venues.insert(venue, approved);
    }

    pub fn set_asset(&mut self, asset: AssetId, approved: bool) {
        self.assets.insert(asset, approved);
    }

    pub fn is_venue_approved(&self, venue: VenueId) -> bool {
        self.venues.get(&venue).copied().unwrap_or(false)
    }

    pub fn is_asset_approved(&self, asset: AssetId) -> bool {
        self.assets.get(&asset).copied().unwrap_or(false)
    }
}
