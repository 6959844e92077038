//! Incremental Relative Strength Index.
//!
//! Wilder's smoothing method, matching what the common charting platforms
//! display: the first `period` deltas are averaged with a plain SMA, after
//! which each new gain/loss folds in through
//!
//! ```text
//! avg = (avg * (period - 1) + current) / period
//! ```
//!
//! The engine is purely sequential state; one price in, at most one RSI
//! value out. Histories are bounded deques so a long session cannot grow
//! memory without limit.

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;

use crate::error::EngineError;

pub const DEFAULT_PERIOD: usize = 14;
pub const DEFAULT_OVERSOLD: f64 = 30.0;
pub const DEFAULT_OVERBOUGHT: f64 = 70.0;

const RSI_HISTORY_CAP: usize = 100;
const PRICE_HISTORY_CAP: usize = 200;

/// Spacing assigned to bare historical closes without timestamps.
const SYNTHETIC_STEP_MS: u64 = 60_000;

/// Market condition derived from the current RSI reading.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum RsiStatus {
    Oversold,
    Overbought,
    Neutral,
    Calculating,
}

impl RsiStatus {
    /// Pure classification; `None` means the RSI is still warming up.
    pub fn classify(rsi: Option<f64>, oversold: f64, overbought: f64) -> Self {
        match rsi {
            None => RsiStatus::Calculating,
            Some(v) if v < oversold => RsiStatus::Oversold,
            Some(v) if v > overbought => RsiStatus::Overbought,
            Some(_) => RsiStatus::Neutral,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RsiStatus::Oversold => "Oversold",
            RsiStatus::Overbought => "Overbought",
            RsiStatus::Neutral => "Neutral",
            RsiStatus::Calculating => "Calculating",
        }
    }
}

impl fmt::Display for RsiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A computed RSI sample kept in the bounded history.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RsiPoint {
    pub price: f64,
    pub rsi: f64,
    pub avg_gain: f64,
    pub avg_loss: f64,
    pub ts_ms: u64,
}

/// A raw price observation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PricePoint {
    pub price: f64,
    pub ts_ms: u64,
}

#[derive(Debug)]
pub struct RsiEngine {
    period: usize,
    previous_close: Option<f64>,
    avg_gain: f64,
    avg_loss: f64,
    initialized: bool,
    init_gains: Vec<f64>,
    init_losses: Vec<f64>,
    history: VecDeque<RsiPoint>,
    prices: VecDeque<PricePoint>,
}

impl Default for RsiEngine {
    fn default() -> Self {
        Self::with_valid_period(DEFAULT_PERIOD)
    }
}

impl RsiEngine {
    pub fn new(period: usize) -> Result<Self, EngineError> {
        if period == 0 {
            return Err(EngineError::InvalidRsiPeriod(period));
        }
        Ok(Self::with_valid_period(period))
    }

    fn with_valid_period(period: usize) -> Self {
        Self {
            period,
            previous_close: None,
            avg_gain: 0.0,
            avg_loss: 0.0,
            initialized: false,
            init_gains: Vec::with_capacity(period),
            init_losses: Vec::with_capacity(period),
            history: VecDeque::new(),
            prices: VecDeque::new(),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Feed one price. Returns the RSI once `period` deltas have been
    /// observed; `None` while warming up or for an unusable price.
    pub fn add_price(&mut self, price: f64, ts_ms: u64) -> Option<f64> {
        if !price.is_finite() || price <= 0.0 {
            tracing::debug!(price, "rsi input rejected: non-positive price");
            return None;
        }

        self.prices.push_back(PricePoint { price, ts_ms });
        if self.prices.len() > PRICE_HISTORY_CAP {
            self.prices.pop_front();
        }

        let Some(prev) = self.previous_close else {
            // First observation only seeds the baseline; no delta exists yet.
            self.previous_close = Some(price);
            return None;
        };

        let change = price - prev;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if self.initialized {
            let p = self.period as f64;
            self.avg_gain = (self.avg_gain * (p - 1.0) + gain) / p;
            self.avg_loss = (self.avg_loss * (p - 1.0) + loss) / p;
        } else {
            self.init_gains.push(gain);
            self.init_losses.push(loss);

            if self.init_gains.len() == self.period {
                let p = self.period as f64;
                self.avg_gain = self.init_gains.iter().sum::<f64>() / p;
                self.avg_loss = self.init_losses.iter().sum::<f64>() / p;
                self.initialized = true;
                self.init_gains.clear();
                self.init_losses.clear();
            }
        }

        self.previous_close = Some(price);

        if !self.initialized {
            return None;
        }

        // avg_loss == 0 means an uninterrupted advance: RSI pegs at 100.
        let rsi = if self.avg_loss == 0.0 {
            100.0
        } else {
            let rs = self.avg_gain / self.avg_loss;
            100.0 - 100.0 / (1.0 + rs)
        };

        self.history.push_back(RsiPoint {
            price,
            rsi,
            avg_gain: self.avg_gain,
            avg_loss: self.avg_loss,
            ts_ms,
        });
        if self.history.len() > RSI_HISTORY_CAP {
            self.history.pop_front();
        }

        Some(rsi)
    }

    /// Replay historical `(price, timestamp)` points in order.
    pub fn process_history(&mut self, points: &[PricePoint]) {
        for p in points {
            self.add_price(p.price, p.ts_ms);
        }

        if let Some(rsi) = self.current() {
            tracing::debug!(points = points.len(), rsi, "historical rsi bootstrap complete");
        }
    }

    /// Replay bare closes, assigning synthetic timestamps one step apart and
    /// ending at `end_ts_ms`.
    pub fn process_history_closes(&mut self, closes: &[f64], end_ts_ms: u64) {
        let n = closes.len() as u64;
        for (i, &close) in closes.iter().enumerate() {
            let ts_ms = end_ts_ms.saturating_sub((n - i as u64) * SYNTHETIC_STEP_MS);
            self.add_price(close, ts_ms);
        }
    }

    /// Most recent RSI value, if any has been produced.
    pub fn current(&self) -> Option<f64> {
        self.history.back().map(|p| p.rsi)
    }

    pub fn history(&self) -> &VecDeque<RsiPoint> {
        &self.history
    }

    pub fn price_history(&self) -> &VecDeque<PricePoint> {
        &self.prices
    }

    /// Clear all state back to construction defaults; the period survives.
    pub fn reset(&mut self) {
        *self = Self::with_valid_period(self.period);
    }
}
