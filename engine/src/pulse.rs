//! Pulse snapshot processor.
//!
//! Pulses are periodic aggregate snapshots denominated in the native asset.
//! A valid `supply` replaces the token supply before anything else; the
//! remaining fields convert to fiat through the configured exchange rate
//! and fully replace the previous pulse stats (no merge).

use corelib::models::PulseSnapshot;

use crate::state::{MetricsState, PulseStats};

/// Apply one aggregate snapshot.
///
/// With no exchange rate configured the fiat-denominated fields are left
/// untouched; a valid `supply` still applies, since supply is not
/// rate-denominated.
pub fn apply_pulse(
    state: &mut MetricsState,
    snap: &PulseSnapshot,
    rate: Option<f64>,
    now_ms: u64,
) {
    if let Some(supply) = snap.supply {
        if supply.is_finite() && supply > 0.0 {
            state.token_supply = supply;
        } else {
            tracing::warn!(supply, "pulse supply rejected: not a positive number");
        }
    }

    let Some(rate) = rate else {
        tracing::warn!("pulse before exchange rate was set; fiat fields unchanged");
        return;
    };

    state.pulse = Some(PulseStats {
        market_cap_usd: sanitize(snap.market_cap_native) * rate,
        volume_usd: sanitize(snap.volume_native) * rate,
        num_holders: snap.num_holders,
        liquidity_usd: sanitize(snap.liquidity_native) * rate,
        received_at_ms: now_ms,
    });
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v >= 0.0 { v } else { 0.0 }
}
