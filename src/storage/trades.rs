//! Trade outcome storage

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use tracing::info;
use uuid::Uuid;

use crate::types::{AssetId, TradeOutcome, VenueId};
use crate::utils::math::wei_to_eth;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
    Executed,
    Declined,
}

/// One persisted attempt, amounts already converted to whole units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub venue_a: VenueId,
    pub venue_b: VenueId,
    pub asset: AssetId,
    pub status: RecordStatus,
    pub base_in_eth: Decimal,
    pub base_out_eth: Decimal,
    pub profit_eth: Decimal,
    /// What went back to the caller: the full payout when executed, the
    /// refunded deposit when declined.
    pub payout_eth: Decimal,
}

impl TradeRecord {
    pub fn from_outcome(venue_a: VenueId, venue_b: VenueId, outcome: &TradeOutcome) -> Self {
        match outcome {
            TradeOutcome::Executed { result, payout } => Self {
                id: Uuid::new_v4().to_string(),
                timestamp: Utc::now(),
                venue_a,
                venue_b,
                asset: result.asset,
                status: RecordStatus::Executed,
                base_in_eth: wei_to_eth(result.base_in),
                base_out_eth: wei_to_eth(result.base_out),
                profit_eth: wei_to_eth(result.profit),
                payout_eth: wei_to_eth(*payout),
            },
            TradeOutcome::Declined { quote, refund } => Self {
                id: Uuid::new_v4().to_string(),
                timestamp: Utc::now(),
                venue_a,
                venue_b,
                asset: quote.asset,
                status: RecordStatus::Declined,
                base_in_eth: wei_to_eth(quote.amount_in),
                base_out_eth: wei_to_eth(quote.round_trip_out),
                profit_eth: Decimal::ZERO,
                payout_eth: wei_to_eth(*refund),
            },
        }
    }
}

pub fn save_trade_record(record: &TradeRecord) -> Result<()> {
    let filename = format!("output/trades/trades_{}.jsonl", Utc::now().format("%Y-%m-%d"));

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&filename)?;

    writeln!(file, "{}", serde_json::to_string(record)?)?;

    info!(
        record_id = %record.id,
        status = ?record.status,
        profit_eth = %record.profit_eth,
        "Saved trade record"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TradeQuote, TradeResult, USDC, VENUE_ALPHA_ROUTER, VENUE_BETA_ROUTER};
    use alloy::primitives::U256;
    use rust_decimal_macros::dec;

    fn eth_wei(milli: u64) -> U256 {
        U256::from(milli) * U256::from(1_000_000_000_000_000u128)
    }

    #[test]
    fn executed_outcome_maps_to_a_record() {
        let outcome = TradeOutcome::Executed {
            result: TradeResult {
                asset: USDC,
                base_in: eth_wei(1000),
                base_out: eth_wei(1020),
                profit: eth_wei(20),
            },
            payout: eth_wei(1020),
        };

        let record = TradeRecord::from_outcome(VENUE_ALPHA_ROUTER, VENUE_BETA_ROUTER, &outcome);
        assert_eq!(record.status, RecordStatus::Executed);
        assert_eq!(record.base_in_eth, dec!(1.0));
        assert_eq!(record.base_out_eth, dec!(1.02));
        assert_eq!(record.profit_eth, dec!(0.02));
        assert_eq!(record.payout_eth, dec!(1.02));
    }

    #[test]
    fn declined_outcome_records_the_refund() {
        let outcome = TradeOutcome::Declined {
            quote: TradeQuote {
                venue_a: VENUE_ALPHA_ROUTER,
                venue_b: VENUE_BETA_ROUTER,
                asset: USDC,
                amount_in: eth_wei(1000),
                token_out: eth_wei(100_000),
                round_trip_out: eth_wei(1005),
            },
            refund: eth_wei(1000),
        };

        let record = TradeRecord::from_outcome(VENUE_ALPHA_ROUTER, VENUE_BETA_ROUTER, &outcome);
        assert_eq!(record.status, RecordStatus::Declined);
        assert_eq!(record.profit_eth, dec!(0));
        assert_eq!(record.payout_eth, dec!(1.0));
    }
}
