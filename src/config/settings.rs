//! Engine configuration settings and environment variable handling

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::env;
use std::str::FromStr;

// Profitability constants
pub const MARGIN_SCALE: u64 = 1000; // margin is expressed in tenths of a percent
pub const MIN_PROFIT_MARGIN_BPS: u64 = 1;
pub const MAX_PROFIT_MARGIN_BPS: u64 = 500; // 50%

// Execution constants
pub const TRADE_COOLDOWN_SECS: i64 = 60;
pub const SWAP_DEADLINE_SECS: i64 = 300; // 5 minutes per leg
pub const BPS_DENOMINATOR: u64 = 10_000;
pub const MAX_LEG1_SLIPPAGE_BPS: u32 = 10_000; // 10000 disables the leg-1 floor

// Simulated venue constants
pub const DEFAULT_AMM_FEE_BPS: u32 = 30; // 0.3%
pub const MAX_AMM_FEE_BPS: u32 = 1_000;
pub const MAX_RESERVE_DRIFT_BPS: u32 = 500;

#[derive(Debug, Clone)]
pub struct Config {
    // Arbitrage configuration
    pub min_profit_margin_bps: u64,
    pub min_base_balance_eth: Decimal,
    pub deposit_size_eth: Decimal,
    pub leg1_slippage_tolerance_bps: u32,
    // Keeper configuration
    pub auto_trade_enabled: bool,
    pub keeper_interval_secs: u64,
    pub reference_rate_url: Option<String>,
    // Simulated venue configuration
    pub amm_fee_bps: u32,
    pub reserve_drift_bps: u32,
    pub venue_alpha_base_reserve_eth: Decimal,
    pub venue_alpha_token_reserve: Decimal,
    pub venue_beta_base_reserve_eth: Decimal,
    pub venue_beta_token_reserve: Decimal,
}

impl Config {
    pub fn load() -> Self {
        Self {
            min_profit_margin_bps: env::var("MIN_PROFIT_MARGIN_BPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10) // 1%
                .max(MIN_PROFIT_MARGIN_BPS)
                .min(MAX_PROFIT_MARGIN_BPS),
            min_base_balance_eth: env::var("MIN_BASE_BALANCE_ETH")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(0.01))
                .max(dec!(0)),
            deposit_size_eth: env::var("DEPOSIT_SIZE_ETH")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(1.0))
                .max(dec!(0.001)),
            leg1_slippage_tolerance_bps: env::var("LEG1_SLIPPAGE_TOLERANCE_BPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100) // 1%
                .min(MAX_LEG1_SLIPPAGE_BPS),
            auto_trade_enabled: env::var("AUTO_TRADE_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            keeper_interval_secs: env::var("KEEPER_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2)
                .max(1),
            reference_rate_url: env::var("REFERENCE_RATE_URL").ok(),
            amm_fee_bps: env::var("AMM_FEE_BPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_AMM_FEE_BPS)
                .min(MAX_AMM_FEE_BPS),
            reserve_drift_bps: env::var("RESERVE_DRIFT_BPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20) // 0.2% per tick
                .min(MAX_RESERVE_DRIFT_BPS),
            venue_alpha_base_reserve_eth: env::var("VENUE_ALPHA_BASE_RESERVE_ETH")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(1000)),
            venue_alpha_token_reserve: env::var("VENUE_ALPHA_TOKEN_RESERVE")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(100000)),
            venue_beta_base_reserve_eth: env::var("VENUE_BETA_BASE_RESERVE_ETH")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(1010)),
            venue_beta_token_reserve: env::var("VENUE_BETA_TOKEN_RESERVE")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(98000)),
        }
    }
}
