//! Loose wire shapes for captured feed payloads.
//!
//! Real captures deliver numeric fields as either JSON numbers or numeric
//! strings; everything here deserializes through [`FlexNum`] and converts
//! into the strongly typed `corelib` events with explicit parse-with-
//! fallback. This module is the only place coercion happens — the engine
//! never sees a stringly-typed number.

use serde::Deserialize;

use corelib::models::{ChartBar, PulseSnapshot, TradeEvent, TradeSide};

/// A numeric field that may arrive as a number, a numeric string, or junk.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(from = "RawNum")]
pub struct FlexNum(Option<f64>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNum {
    Num(f64),
    Text(String),
    Other(serde_json::Value),
}

impl From<RawNum> for FlexNum {
    fn from(raw: RawNum) -> Self {
        match raw {
            RawNum::Num(v) => FlexNum(Some(v)),
            RawNum::Text(s) => FlexNum(s.trim().parse().ok()),
            RawNum::Other(_) => FlexNum(None),
        }
    }
}

impl FlexNum {
    pub fn get(self) -> Option<f64> {
        self.0.filter(|v| v.is_finite())
    }

    pub fn or_zero(self) -> f64 {
        self.get().unwrap_or(0.0)
    }
}

#[derive(Debug, Deserialize)]
pub struct TradeMessage {
    #[serde(default)]
    pub price_usd: FlexNum,
    #[serde(default)]
    pub total_usd: FlexNum,
    #[serde(default)]
    pub pair_address: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub maker_address: String,
    #[serde(default)]
    pub liquidity_sol: FlexNum,
    #[serde(default)]
    pub liquidity_token: FlexNum,
    #[serde(default)]
    pub timestamp: Option<u64>,
}

impl TradeMessage {
    /// Convert into the typed event. Trades without a usable positive price
    /// are dropped here, before the engine ever sees them.
    pub fn into_event(self, received_at_ms: u64) -> Option<TradeEvent> {
        let price = self.price_usd.get().filter(|p| *p > 0.0)?;

        Some(TradeEvent {
            ts_ms: self.timestamp.unwrap_or(received_at_ms),
            price_usd: price,
            total_usd: self.total_usd.or_zero(),
            pair_address: self.pair_address,
            signature: self.signature,
            side: match self.kind.as_str() {
                "buy" => TradeSide::Buy,
                "sell" => TradeSide::Sell,
                _ => TradeSide::Unknown,
            },
            maker_address: self.maker_address,
            liquidity_native: self.liquidity_sol.or_zero(),
            liquidity_token: self.liquidity_token.or_zero(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PulseMessage {
    #[serde(default)]
    pub supply: FlexNum,
    #[serde(default)]
    pub market_cap_sol: FlexNum,
    #[serde(default)]
    pub volume_sol: FlexNum,
    #[serde(default)]
    pub num_holders: FlexNum,
    #[serde(default)]
    pub liquidity_sol: FlexNum,
}

impl PulseMessage {
    pub fn into_event(self) -> PulseSnapshot {
        PulseSnapshot {
            supply: self.supply.get().filter(|s| *s > 0.0),
            market_cap_native: self.market_cap_sol.or_zero(),
            volume_native: self.volume_sol.or_zero(),
            num_holders: self
                .num_holders
                .get()
                .filter(|v| *v >= 0.0)
                .map(|v| v as u64)
                .unwrap_or(0),
            liquidity_native: self.liquidity_sol.or_zero(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BarMessage {
    pub time: u64,
    #[serde(default)]
    pub open: FlexNum,
    #[serde(default)]
    pub high: FlexNum,
    #[serde(default)]
    pub low: FlexNum,
    #[serde(default)]
    pub close: FlexNum,
    #[serde(default)]
    pub volume: FlexNum,
}

impl BarMessage {
    pub fn into_bar(self) -> ChartBar {
        ChartBar {
            time: self.time,
            open: self.open.or_zero(),
            high: self.high.or_zero(),
            low: self.low.or_zero(),
            close: self.close.or_zero(),
            volume: self.volume.or_zero(),
        }
    }
}
