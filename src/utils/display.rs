//! Display and printing utilities

use alloy::primitives::U256;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{info, warn};

use crate::types::{TradeQuote, TradeResult};
use crate::utils::math::wei_to_eth;

pub fn print_trade_result(result: &TradeResult, payout: U256) {
    warn!("\n✅ ARBITRAGE EXECUTED");
    warn!("📍 Asset: {}", result.asset);
    warn!("💰 Settlement:");
    warn!("   Base In:  {:.6} ETH", wei_to_eth(result.base_in));
    warn!("   Base Out: {:.6} ETH", wei_to_eth(result.base_out));
    warn!("   Profit:   {:.6} ETH", wei_to_eth(result.profit));
    warn!("   Payout:   {:.6} ETH", wei_to_eth(payout));
}

pub fn print_declined_quote(quote: &TradeQuote) {
    info!("📉 Declined: {:.6} ETH in → {:.6} ETH back (asset {})",
        wei_to_eth(quote.amount_in),
        wei_to_eth(quote.round_trip_out),
        quote.asset,
    );
}

pub fn print_session_stats(
    start_time: Instant,
    total_attempts: u64,
    executed_trades: u64,
    declined_quotes: u64,
    total_profit_eth: Decimal,
    error_counts: &HashMap<String, u32>,
) {
    let runtime = start_time.elapsed().as_secs() / 60;

    info!("\n📊 Session Statistics ({} minutes)", runtime);
    info!("   📈 ROUND TRIPS:");
    info!("     Total attempts: {}", total_attempts);
    info!("     Executed: {}", executed_trades);
    info!("     Declined: {}", declined_quotes);
    info!("     Execution rate: {:.1}%",
        if total_attempts > 0 {
            (executed_trades as f64 / total_attempts as f64) * 100.0
        } else {
            0.0
        }
    );
    info!("   💰 PROFIT:");
    info!("     Total realized: {:.6} ETH", total_profit_eth);
    info!("     Per hour: {:.6} ETH",
        if runtime > 0 {
            total_profit_eth * Decimal::from(60) / Decimal::from(runtime)
        } else {
            Decimal::ZERO
        }
    );

    if !error_counts.is_empty() {
        info!("   ⚠️  Error summary:");
        for (kind, count) in error_counts.iter() {
            info!("       {}: {}", kind, count);
        }
    }

    info!("");
}
