//! Round-trip arbitrage keeper - main entry point
//!
//! Drives the engine against two simulated constant-product venues on a
//! fixed interval, drifting reserves between attempts.

use roundtrip_arb_bot::*;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time;
use tracing::{debug, error, info, warn};
use roundtrip_arb_bot::venues::{ConstantProductVenue, VenueDirectory};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    let _logging_guard = utils::setup_logging()?;
    utils::setup_output_directories()?;

    // Load configuration
    let config = CONFIG.clone();

    info!("🔁 Round-Trip Arbitrage Bot v0.3.0 - Two-Venue Engine");
    info!("📋 Configuration:");
    info!("   Min Profit Margin: {} ({:.1}%)",
        config.min_profit_margin_bps,
        config.min_profit_margin_bps as f64 / 10.0
    );
    info!("   Min Base Balance: {} ETH", config.min_base_balance_eth);
    info!("   Deposit Size: {} ETH", config.deposit_size_eth);
    info!("   Leg-1 Slippage Tolerance: {} bps", config.leg1_slippage_tolerance_bps);
    info!("   Auto Trade: {}", config.auto_trade_enabled);
    info!("   Keeper Interval: {}s", config.keeper_interval_secs);
    info!("   AMM Fee: {} bps", config.amm_fee_bps);
    info!("   Reserve Drift: {} bps per tick", config.reserve_drift_bps);

    // pause briefly so the configuration is readable before the loop starts
    tokio::time::sleep(Duration::from_secs(2)).await;

    // Build the simulated venues. Concrete handles are kept alongside the
    // directory so the keeper can drift their reserves between attempts.
    let venue_alpha = Arc::new(
        ConstantProductVenue::new(VENUE_ALPHA_ROUTER, "venue-alpha", WETH, config.amm_fee_bps)
            .with_pool(
                USDC,
                utils::eth_to_wei(config.venue_alpha_base_reserve_eth),
                utils::eth_to_wei(config.venue_alpha_token_reserve),
            ),
    );
    let venue_beta = Arc::new(
        ConstantProductVenue::new(VENUE_BETA_ROUTER, "venue-beta", WETH, config.amm_fee_bps)
            .with_pool(
                USDC,
                utils::eth_to_wei(config.venue_beta_base_reserve_eth),
                utils::eth_to_wei(config.venue_beta_token_reserve),
            ),
    );

    let mut venues: VenueDirectory = HashMap::new();
    venues.insert(VENUE_ALPHA_ROUTER, venue_alpha.clone());
    venues.insert(VENUE_BETA_ROUTER, venue_beta.clone());

    let engine = ArbEngine::new(venues, EngineSettings::from_config(&config));

    // Approve the working pair; everything else stays default-deny
    let admin = engine.admin();
    admin.set_venue_approval(VENUE_ALPHA_ROUTER, true).await;
    admin.set_venue_approval(VENUE_BETA_ROUTER, true).await;
    admin.set_token_approval(USDC, true).await;

    info!("✅ Initialized 2 venues, trading WETH → USDC → WETH");

    // Setup session state
    let start_time = Instant::now();
    let mut stats = SessionStats::new();

    // Setup shutdown handler
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::oneshot::channel();
    let shutdown_tx = Arc::new(tokio::sync::Mutex::new(Some(shutdown_tx)));

    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
        info!("\n📛 Received shutdown signal (Ctrl+C)...");
        if let Some(tx) = shutdown_tx.lock().await.take() {
            let _ = tx.send(());
        }
    });

    info!("\n🚀 Starting keeper loop...\n");

    let mut interval = time::interval(Duration::from_secs(config.keeper_interval_secs));

    // Main keeper loop
    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = run_keeper_cycle(
                    &engine,
                    &venue_alpha,
                    &venue_beta,
                    &config,
                    &mut stats,
                    start_time,
                ).await {
                    error!("Keeper cycle error: {}", e);
                }
            }
            _ = &mut shutdown_rx => {
                info!("Shutdown signal received, exiting keeper loop...");
                break;
            }
        }
    }

    // Print final statistics
    print_final_statistics(start_time, &stats);

    Ok(())
}

/// Session statistics tracked across keeper cycles
struct SessionStats {
    total_attempts: u64,
    executed_trades: u64,
    declined_quotes: u64,
    cooldown_skips: u64,
    total_profit_eth: rust_decimal::Decimal,
    last_reference_rate: Option<rust_decimal::Decimal>,
    reference_last_update: Option<Instant>,
    consecutive_reference_failures: u32,
    error_counts: HashMap<String, u32>,
}

impl SessionStats {
    fn new() -> Self {
        Self {
            total_attempts: 0,
            executed_trades: 0,
            declined_quotes: 0,
            cooldown_skips: 0,
            total_profit_eth: rust_decimal_macros::dec!(0),
            last_reference_rate: None,
            reference_last_update: None,
            consecutive_reference_failures: 0,
            error_counts: HashMap::new(),
        }
    }
}

/// Run a single keeper cycle
async fn run_keeper_cycle(
    engine: &ArbEngine,
    venue_alpha: &Arc<ConstantProductVenue>,
    venue_beta: &Arc<ConstantProductVenue>,
    config: &Config,
    stats: &mut SessionStats,
    start_time: Instant,
) -> Result<()> {
    // Background market movement between attempts
    venue_alpha.apply_drift(config.reserve_drift_bps).await;
    venue_beta.apply_drift(config.reserve_drift_bps).await;

    // Optional reference rate telemetry
    if let Some(url) = &config.reference_rate_url {
        match network::get_reference_rate(url).await {
            Ok(rate) => {
                stats.last_reference_rate = Some(rate);
                stats.reference_last_update = Some(Instant::now());
                stats.consecutive_reference_failures = 0;
                info!("💹 Reference rate: ${:.2}", rate);
            }
            Err(e) => {
                stats.consecutive_reference_failures += 1;
                *stats.error_counts.entry("reference_rate".to_string()).or_insert(0) += 1;

                if let Some(last) = stats.last_reference_rate {
                    warn!("Reference rate fetch failed (attempt {}): {}. Last known ${:.2} (age: {:?})",
                        stats.consecutive_reference_failures,
                        e,
                        last,
                        stats.reference_last_update.map(|t| t.elapsed()).unwrap_or(Duration::MAX)
                    );
                } else {
                    warn!("Reference rate fetch failed: {}", e);
                }
            }
        }
    }

    if !engine.auto_trade_enabled().await {
        debug!("Auto-trade disabled, skipping attempt");
        return Ok(());
    }

    stats.total_attempts += 1;
    let deposit = utils::eth_to_wei(config.deposit_size_eth);

    match engine
        .attempt_arbitrage(VENUE_ALPHA_ROUTER, VENUE_BETA_ROUTER, USDC, deposit)
        .await
    {
        Ok(outcome) => {
            let record =
                storage::TradeRecord::from_outcome(VENUE_ALPHA_ROUTER, VENUE_BETA_ROUTER, &outcome);
            match &outcome {
                TradeOutcome::Executed { result, payout } => {
                    stats.executed_trades += 1;
                    stats.total_profit_eth += utils::wei_to_eth(result.profit);
                    utils::print_trade_result(result, *payout);
                }
                TradeOutcome::Declined { quote, .. } => {
                    stats.declined_quotes += 1;
                    utils::print_declined_quote(quote);
                }
            }

            if let Err(e) = storage::save_trade_record(&record) {
                error!("Failed to save trade record: {}", e);
                *stats.error_counts.entry("save_record".to_string()).or_insert(0) += 1;
            }
        }
        Err(ArbError::CooldownActive { until }) => {
            stats.cooldown_skips += 1;
            debug!("⏳ Cooldown active until {}", until.format("%H:%M:%S"));
        }
        Err(e) => {
            warn!("Attempt rejected: {}", e);
            *stats.error_counts.entry(e.kind().to_string()).or_insert(0) += 1;
        }
    }

    // Print periodic statistics
    if should_print_statistics(stats) {
        utils::print_session_stats(
            start_time,
            stats.total_attempts,
            stats.executed_trades,
            stats.declined_quotes,
            stats.total_profit_eth,
            &stats.error_counts,
        );
    }

    Ok(())
}

/// Check if we should print statistics
fn should_print_statistics(stats: &SessionStats) -> bool {
    (stats.total_attempts > 0 && stats.total_attempts % 30 == 0)
        || (stats.executed_trades > 0 && stats.executed_trades % 5 == 0)
}

/// Print final statistics on shutdown
fn print_final_statistics(start_time: Instant, stats: &SessionStats) {
    info!("\n🛑 Shutting down gracefully...");
    info!("Final statistics:");
    info!("   Total runtime: {:?}", start_time.elapsed());
    info!("   Attempts: {}", stats.total_attempts);
    info!("   Executed trades: {}", stats.executed_trades);
    info!("   Declined quotes: {}", stats.declined_quotes);
    info!("   Cooldown skips: {}", stats.cooldown_skips);
    info!("   Total realized profit: {:.6} ETH", stats.total_profit_eth);
    info!("   Total errors: {:?}", stats.error_counts);
}
