//! Administration surface: approvals, parameters, pause and recovery
//!
//! The engine core never mutates its own configuration; every change
//! arrives through an [`AdminHandle`]. Handles are cheap clones over the
//! shared state and can be used from any task.

use alloy::primitives::U256;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::config::{MAX_PROFIT_MARGIN_BPS, MIN_PROFIT_MARGIN_BPS};
use crate::execution::{ExecutionState, Treasury};
use crate::registry::ApprovalRegistry;
use crate::types::{ArbitrageParameters, AssetId, VenueId};

#[derive(Clone)]
pub struct AdminHandle {
    registry: Arc<RwLock<ApprovalRegistry>>,
    params: Arc<RwLock<ArbitrageParameters>>,
    state: Arc<RwLock<ExecutionState>>,
    treasury: Arc<RwLock<Treasury>>,
    execution_lock: Arc<Mutex<()>>,
}

impl AdminHandle {
    pub(crate) fn new(
        registry: Arc<RwLock<ApprovalRegistry>>,
        params: Arc<RwLock<ArbitrageParameters>>,
        state: Arc<RwLock<ExecutionState>>,
        treasury: Arc<RwLock<Treasury>>,
        execution_lock: Arc<Mutex<()>>,
    ) -> Self {
        Self {
            registry,
            params,
            state,
            treasury,
            execution_lock,
        }
    }

    pub async fn set_venue_approval(&self, venue: VenueId, approved: bool) {
        self.registry.write().await.set_venue(venue, approved);
        info!(venue = %venue, approved, "Venue approval updated");
    }

    pub async fn set_token_approval(&self, asset: AssetId, approved: bool) {
        self.registry.write().await.set_asset(asset, approved);
        info!(asset = %asset, approved, "Asset approval updated");
    }

    /// Update the minimum profit margin, clamped to the legal band the
    /// same way configuration loading clamps it. Returns the applied
    /// value.
    pub async fn set_min_profit_margin(&self, margin_bps: u64) -> u64 {
        let applied = margin_bps.clamp(MIN_PROFIT_MARGIN_BPS, MAX_PROFIT_MARGIN_BPS);
        self.params.write().await.min_profit_margin_bps = applied;
        info!(margin_bps = applied, requested = margin_bps, "Minimum profit margin updated");
        applied
    }

    pub async fn set_min_base_balance(&self, min_base_balance: U256) {
        self.params.write().await.min_base_balance = min_base_balance;
        info!(min_base_balance = %min_base_balance, "Minimum base balance updated");
    }

    pub async fn set_auto_trade_enabled(&self, enabled: bool) {
        self.state.write().await.auto_trade_enabled = enabled;
        info!(enabled, "Auto-trade flag updated");
    }

    pub async fn pause(&self) {
        self.state.write().await.paused = true;
        info!("⏸️  Executions paused");
    }

    pub async fn unpause(&self) {
        self.state.write().await.paused = false;
        info!("▶️  Executions resumed");
    }

    /// Emergency extraction of the full base balance. Unconditional in
    /// the sense that no profitability or pause check applies, but it
    /// queues on the execution lock so it never interleaves with an
    /// in-flight trade.
    pub async fn sweep_base(&self) -> U256 {
        let _lock = self.execution_lock.lock().await;
        let swept = self.treasury.write().await.drain_base();
        info!(amount = %swept, "🧹 Swept base balance");
        swept
    }

    /// Emergency extraction of the full balance of one token.
    pub async fn sweep_token(&self, asset: AssetId) -> U256 {
        let _lock = self.execution_lock.lock().await;
        let swept = self.treasury.write().await.drain_token(asset);
        info!(asset = %asset, amount = %swept, "🧹 Swept token balance");
        swept
    }
}
