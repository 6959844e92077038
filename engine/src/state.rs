//! Live derived state for the monitored instrument.
//!
//! Owned exclusively by [`MetricsEngine`](crate::engine::MetricsEngine);
//! mutated only by the processors in this crate.

use serde::Serialize;

use corelib::models::{DEFAULT_TOKEN_SUPPLY, TransactionRecord};

/// Pulse-derived statistics, fully replaced by each valid snapshot.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PulseStats {
    pub market_cap_usd: f64,
    pub volume_usd: f64,
    pub num_holders: u64,
    pub liquidity_usd: f64,
    /// Receive-side stamp for freshness tracking by consumers.
    pub received_at_ms: u64,
}

#[derive(Debug)]
pub struct MetricsState {
    /// Circulating supply; replaced only by a valid pulse snapshot.
    pub token_supply: f64,

    pub last_price: Option<f64>,
    pub last_market_cap: Option<f64>,

    /// Highest market cap seen from live trades. Monotonic: only ever
    /// raised via `max`, so out-of-order delivery cannot lower it.
    pub session_ath_market_cap: f64,

    pub pulse: Option<PulseStats>,

    /// Broad-market 5-minute volume across all tracked pairs.
    pub broad_market_5m_volume: Option<f64>,

    /// Highest market cap derived from historical chart bars. Monotonic and
    /// independent of the session ATH.
    pub chart_ath_market_cap: f64,

    /// Append-only normalized trade log, kept for export.
    pub transactions: Vec<TransactionRecord>,
}

impl Default for MetricsState {
    fn default() -> Self {
        Self {
            token_supply: DEFAULT_TOKEN_SUPPLY,
            last_price: None,
            last_market_cap: None,
            session_ath_market_cap: 0.0,
            pulse: None,
            broad_market_5m_volume: None,
            chart_ath_market_cap: 0.0,
            transactions: Vec::new(),
        }
    }
}
