//! Broad-market aggregate processor.

use corelib::models::LighthouseSnapshot;

use crate::state::MetricsState;

/// Replace the stored broad-market 5-minute volume. A value that is not
/// finite and non-negative leaves the previous reading in place.
pub fn apply_lighthouse(state: &mut MetricsState, snap: &LighthouseSnapshot) {
    let v = snap.five_min_total_volume;

    if v.is_finite() && v >= 0.0 {
        state.broad_market_5m_volume = Some(v);
    } else {
        tracing::debug!(value = v, "lighthouse volume ignored");
    }
}
