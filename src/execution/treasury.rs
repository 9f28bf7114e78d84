//! Base and token holdings of the engine

use alloy::primitives::U256;
use std::collections::HashMap;

use crate::errors::{ArbError, ArbResult};
use crate::types::AssetId;

/// Funds the engine currently holds. During an attempt all mutation runs
/// on a cloned working copy committed back in one assignment at
/// settlement, so a failed attempt leaves the real holdings untouched.
#[derive(Debug, Clone, Default)]
pub struct Treasury {
    base: U256,
    tokens: HashMap<AssetId, U256>,
}

impl Treasury {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_balance(&self) -> U256 {
        self.base
    }

    pub fn token_balance(&self, asset: AssetId) -> U256 {
        self.tokens.get(&asset).copied().unwrap_or(U256::ZERO)
    }

    pub fn credit_base(&mut self, amount: U256) {
        self.base += amount;
    }

    pub fn debit_base(&mut self, amount: U256) -> ArbResult<()> {
        if amount > self.base {
            return Err(ArbError::FundTransferFailed {
                details: format!("base debit {amount} exceeds balance {}", self.base),
            });
        }
        self.base -= amount;
        Ok(())
    }

    pub fn credit_token(&mut self, asset: AssetId, amount: U256) {
        *self.tokens.entry(asset).or_insert(U256::ZERO) += amount;
    }

    pub fn debit_token(&mut self, asset: AssetId, amount: U256) -> ArbResult<()> {
        let balance = self.tokens.entry(asset).or_insert(U256::ZERO);
        if amount > *balance {
            return Err(ArbError::FundTransferFailed {
                details: format!("token debit {amount} exceeds balance {balance}"),
            });
        }
        *balance -= amount;
        Ok(())
    }

    /// Remove and return the entire base balance.
    pub fn drain_base(&mut self) -> U256 {
        std::mem::take(&mut self.base)
    }

    /// Remove and return the entire balance of `asset`.
    pub fn drain_token(&mut self, asset: AssetId) -> U256 {
        self.tokens.remove(&asset).unwrap_or(U256::ZERO)
    }
}
