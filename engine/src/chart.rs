//! Historical chart-bar aggregation.
//!
//! Bars arrive in overlapping batches as the upstream site refetches
//! history; identity is the `time` key, so a batch that repeats known bars
//! contributes nothing. The stored list stays sorted ascending by time.

use std::collections::HashSet;

use corelib::models::ChartBar;

#[derive(Debug, Default)]
pub struct ChartAggregator {
    bars: Vec<ChartBar>,
    seen: HashSet<u64>,
}

impl ChartAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert bars whose `time` key is not already stored; duplicates are
    /// dropped by key, not by full-object equality. Returns the accepted
    /// bars (callers bootstrap indicators from fresh closes).
    pub fn ingest(&mut self, batch: &[ChartBar]) -> Vec<ChartBar> {
        let mut accepted = Vec::new();

        for bar in batch {
            if self.seen.insert(bar.time) {
                self.bars.push(*bar);
                accepted.push(*bar);
            } else {
                tracing::debug!(time = bar.time, "duplicate chart bar dropped");
            }
        }

        if !accepted.is_empty() {
            self.bars.sort_by_key(|b| b.time);
        }

        accepted
    }

    /// Maximum `high` across all stored bars.
    pub fn max_high(&self) -> Option<f64> {
        self.bars
            .iter()
            .map(|b| b.high)
            .fold(None, |acc: Option<f64>, h| Some(acc.map_or(h, |m| m.max(h))))
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    /// First and last bar timestamps, or `None` when no bars are stored.
    pub fn time_range(&self) -> Option<(u64, u64)> {
        match (self.bars.first(), self.bars.last()) {
            (Some(first), Some(last)) => Some((first.time, last.time)),
            _ => None,
        }
    }

    pub fn bars(&self) -> &[ChartBar] {
        &self.bars
    }

    pub fn clear(&mut self) {
        self.bars.clear();
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(time: u64, high: f64) -> ChartBar {
        ChartBar {
            time,
            open: high - 0.5,
            high,
            low: high - 1.0,
            close: high - 0.2,
            volume: 10.0,
        }
    }

    #[test]
    fn overlapping_batches_dedup_by_time_key() {
        let mut agg = ChartAggregator::new();

        agg.ingest(&[bar(1, 2.0), bar(2, 3.0)]);
        let accepted = agg.ingest(&[bar(2, 3.0), bar(3, 1.0)]);

        assert_eq!(accepted.len(), 1);
        assert_eq!(agg.bar_count(), 3);

        let times: Vec<u64> = agg.bars().iter().map(|b| b.time).collect();
        assert_eq!(times, vec![1, 2, 3]);
    }

    #[test]
    fn superset_reingestion_is_idempotent() {
        let mut agg = ChartAggregator::new();
        let first = [bar(1, 1.0), bar(2, 2.0)];
        let superset = [bar(1, 1.0), bar(2, 2.0), bar(3, 3.0)];

        agg.ingest(&first);
        agg.ingest(&superset);
        agg.ingest(&superset);

        assert_eq!(agg.bar_count(), 3);
    }

    #[test]
    fn bars_are_kept_sorted_ascending() {
        let mut agg = ChartAggregator::new();

        agg.ingest(&[bar(30, 1.0), bar(10, 2.0), bar(20, 3.0)]);

        let times: Vec<u64> = agg.bars().iter().map(|b| b.time).collect();
        assert_eq!(times, vec![10, 20, 30]);
        assert_eq!(agg.time_range(), Some((10, 30)));
    }

    #[test]
    fn max_high_spans_all_stored_bars() {
        let mut agg = ChartAggregator::new();

        assert_eq!(agg.max_high(), None);

        agg.ingest(&[bar(1, 2.0), bar(2, 3.0)]);
        agg.ingest(&[bar(3, 1.0)]);

        assert_eq!(agg.max_high(), Some(3.0));
    }

    #[test]
    fn empty_aggregator_queries() {
        let agg = ChartAggregator::new();

        assert_eq!(agg.bar_count(), 0);
        assert_eq!(agg.time_range(), None);
        assert!(agg.bars().is_empty());
    }
}
