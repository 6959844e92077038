//! Trailing-horizon volume accumulator.
//!
//! Retains every `(timestamp, value)` pair recorded within a fixed horizon
//! (24 hours by default) and answers arbitrary sub-window queries
//! ("volume in the last N minutes") by scanning the retained entries. The
//! queue is horizon-bounded, so the scan cost is proportional to one day of
//! traffic, not the session length.
//!
//! Eviction is front-stop: entries are dropped from the front until the
//! first one inside the horizon. Under out-of-order arrival a stale entry
//! sitting behind a fresh one can survive until the fresh one expires;
//! `sum_within` re-filters by timestamp, so query results never include
//! out-of-range entries regardless.

use std::collections::VecDeque;

/// Default retention horizon: 24 hours.
pub const DEFAULT_HORIZON_MS: u64 = 24 * 60 * 60 * 1000;

/// A timestamped value retained by the window.
#[derive(Clone, Copy, Debug)]
struct TimedValue {
    ts_ms: u64,
    value: f64,
}

#[derive(Debug)]
pub struct VolumeWindow {
    entries: VecDeque<TimedValue>,
    horizon_ms: u64,

    /// Highest timestamp seen so far. The eviction cutoff is relative to
    /// this watermark, so a late event can never resurrect expired entries.
    watermark_ms: u64,
}

impl Default for VolumeWindow {
    fn default() -> Self {
        Self::new(DEFAULT_HORIZON_MS)
    }
}

impl VolumeWindow {
    pub fn new(horizon_ms: u64) -> Self {
        Self {
            entries: VecDeque::new(),
            horizon_ms,
            watermark_ms: 0,
        }
    }

    /// Record a value. Non-finite or negative values are coerced to 0 so a
    /// single bad field cannot poison the running sums.
    pub fn record(&mut self, ts_ms: u64, value: f64) {
        let value = if value.is_finite() && value >= 0.0 {
            value
        } else {
            tracing::warn!(ts_ms, value, "volume value coerced to 0");
            0.0
        };

        self.entries.push_back(TimedValue { ts_ms, value });
        self.watermark_ms = self.watermark_ms.max(ts_ms);
        self.evict_old();
    }

    fn evict_old(&mut self) {
        let cutoff = self.watermark_ms.saturating_sub(self.horizon_ms);

        while let Some(front) = self.entries.front() {
            if front.ts_ms < cutoff {
                self.entries.pop_front();
            } else {
                break;
            }
        }
    }

    /// Sum of values with `ts >= now_ms - window_ms`. Zero when nothing is
    /// in range; never negative.
    pub fn sum_within(&self, now_ms: u64, window_ms: u64) -> f64 {
        let cutoff = now_ms.saturating_sub(window_ms);

        self.entries
            .iter()
            .filter(|e| e.ts_ms >= cutoff)
            .map(|e| e.value)
            .sum()
    }

    pub fn horizon_ms(&self) -> u64 {
        self.horizon_ms
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.watermark_ms = 0;
    }
}
