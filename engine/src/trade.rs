//! Trade event processor.
//!
//! One trade updates the live price, market cap, session ATH, the trailing
//! volume window, the RSI stream, and the append-only transaction log.

use corelib::models::{TradeEvent, TransactionRecord};

use crate::rsi::RsiEngine;
use crate::state::MetricsState;
use crate::volume_window::VolumeWindow;

/// Apply one trade to the live state.
///
/// Trades whose price is not a finite positive number are rejected with a
/// diagnostic and leave every field untouched. Returns `true` when state
/// was mutated.
pub fn apply_trade(
    state: &mut MetricsState,
    window: &mut VolumeWindow,
    rsi: &mut RsiEngine,
    ev: &TradeEvent,
) -> bool {
    if !ev.price_usd.is_finite() || ev.price_usd <= 0.0 {
        tracing::warn!(
            price = ev.price_usd,
            signature = %ev.signature,
            "trade rejected: non-positive price"
        );
        return false;
    }

    let market_cap = ev.price_usd * state.token_supply;

    window.record(ev.ts_ms, ev.total_usd);
    rsi.add_price(ev.price_usd, ev.ts_ms);

    state.last_price = Some(ev.price_usd);
    state.last_market_cap = Some(market_cap);

    if market_cap > state.session_ath_market_cap {
        state.session_ath_market_cap = market_cap;
        tracing::info!(market_cap, "new session ATH market cap");
    }

    state.transactions.push(TransactionRecord {
        ts_ms: ev.ts_ms,
        price_usd: ev.price_usd,
        market_cap_usd: market_cap,
        value_usd: ev.total_usd,
        side: ev.side,
        signature: ev.signature.clone(),
        maker_address: ev.maker_address.clone(),
    });

    true
}
