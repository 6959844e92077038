use serde::{Deserialize, Serialize};

use super::TradeSide;

/// Supply assumed until the first pulse snapshot reports the real one.
pub const DEFAULT_TOKEN_SUPPLY: f64 = 1_000_000_000.0;

/// A single executed trade for the monitored instrument.
///
/// Immutable once produced by the decode boundary; appended verbatim to the
/// engine's transaction log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeEvent {
    /// Trade timestamp in milliseconds (receive time when the venue omits it).
    pub ts_ms: u64,
    pub price_usd: f64,
    /// Fiat value of the trade; 0 when the venue did not report it.
    pub total_usd: f64,
    pub pair_address: String,
    pub signature: String,
    pub side: TradeSide,
    pub maker_address: String,
    pub liquidity_native: f64,
    pub liquidity_token: f64,
}

/// Periodic aggregate snapshot for the instrument, native-asset denominated.
///
/// Each snapshot fully replaces the previously derived pulse fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PulseSnapshot {
    /// Circulating supply; `None` when the feed did not carry a usable value.
    pub supply: Option<f64>,
    pub market_cap_native: f64,
    pub volume_native: f64,
    pub num_holders: u64,
    pub liquidity_native: f64,
}

/// Broad-market aggregate: total volume across all tracked pairs over the
/// trailing five minutes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LighthouseSnapshot {
    pub five_min_total_volume: f64,
}

/// One historical price bar. `time` is the identity key and sort key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub time: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Normalized trade record kept for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub ts_ms: u64,
    pub price_usd: f64,
    pub market_cap_usd: f64,
    pub value_usd: f64,
    pub side: TradeSide,
    pub signature: String,
    pub maker_address: String,
}

/// Tagged event produced by the ingestion boundary.
///
/// The engine exposes one handler per variant; raw payload shapes never
/// cross into it.
#[derive(Debug, Clone)]
pub enum MarketEvent {
    Trade(TradeEvent),
    Pulse(PulseSnapshot),
    Lighthouse(LighthouseSnapshot),
    ChartBatch(Vec<ChartBar>),
}
