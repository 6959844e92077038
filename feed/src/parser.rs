//! Shape router for captured feed payloads.
//!
//! The upstream transport multiplexes every message kind through one
//! channel; this router probes the decoded JSON for the discriminating
//! fields of each shape and produces the tagged [`MarketEvent`] the engine
//! consumes:
//!
//! - bare array (or `{"bars": [...]}`) → **ChartBatch**
//! - `price_usd` / `pair_address`      → **Trade**
//! - `marketCapSol` / `supply`         → **Pulse**
//! - nested `{"5m": {"all": {"totalVolume": ...}}}` → **Lighthouse**
//!
//! Unknown shapes return `Ok(None)` (ignored, forward-compatible);
//! malformed JSON is an error the caller logs and skips. One bad payload
//! never halts the stream.

use anyhow::Context;
use serde_json::Value;

use corelib::models::{ChartBar, LighthouseSnapshot, MarketEvent};

use crate::wire::{BarMessage, PulseMessage, TradeMessage};

/// Lighthouse envelope keys: window size, then protocol scope.
const LIGHTHOUSE_WINDOW: &str = "5m";
const LIGHTHOUSE_SCOPE: &str = "all";

pub fn parse_market_event(raw: &str, received_at_ms: u64) -> anyhow::Result<Option<MarketEvent>> {
    let json: Value = serde_json::from_str(raw).context("malformed feed payload")?;

    if let Some(values) = bar_array(&json) {
        return Ok(parse_bars(values));
    }

    if json.get("price_usd").is_some() || json.get("pair_address").is_some() {
        let msg: TradeMessage =
            serde_json::from_value(json).context("decoding trade payload")?;

        return Ok(match msg.into_event(received_at_ms) {
            Some(ev) => Some(MarketEvent::Trade(ev)),
            None => {
                tracing::warn!("trade payload dropped: unusable price");
                None
            }
        });
    }

    if json.get("marketCapSol").is_some() || json.get("supply").is_some() {
        let msg: PulseMessage =
            serde_json::from_value(json).context("decoding pulse payload")?;
        return Ok(Some(MarketEvent::Pulse(msg.into_event())));
    }

    if let Some(volume) = lighthouse_volume(&json) {
        return Ok(Some(MarketEvent::Lighthouse(LighthouseSnapshot {
            five_min_total_volume: volume,
        })));
    }

    Ok(None)
}

fn bar_array(json: &Value) -> Option<&Vec<Value>> {
    if let Some(arr) = json.as_array() {
        return Some(arr);
    }
    json.get("bars").and_then(Value::as_array)
}

fn parse_bars(values: &[Value]) -> Option<MarketEvent> {
    let bars: Vec<ChartBar> = values
        .iter()
        .filter_map(|v| {
            serde_json::from_value::<BarMessage>(v.clone())
                .map_err(|e| tracing::debug!(error = %e, "skipping unparseable bar"))
                .ok()
                .map(BarMessage::into_bar)
        })
        .collect();

    if bars.is_empty() { None } else { Some(MarketEvent::ChartBatch(bars)) }
}

fn lighthouse_volume(json: &Value) -> Option<f64> {
    let raw = json
        .get(LIGHTHOUSE_WINDOW)?
        .get(LIGHTHOUSE_SCOPE)?
        .get("totalVolume")?;

    raw.as_f64()
        .or_else(|| raw.as_str().and_then(|s| s.trim().parse().ok()))
}
