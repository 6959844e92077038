//! MetricsEngine
//!
//! Aggregate root for the single-instrument metrics pipeline.
//! Responsibilities:
//!   • Own MetricsState and the stateful indicator components
//!   • Dispatch typed MarketEvents to the per-variant processors
//!   • Keep the session and chart ATHs monotonic
//!   • Produce read-only summaries for presentation and export
//!
//! The engine assumes single-writer semantics: callers serialize every
//! mutating call (one dispatch task, or a mutex around the instance); it
//! performs no internal synchronization.

use corelib::models::{
    ChartBar, LighthouseSnapshot, MarketEvent, PulseSnapshot, TradeEvent, TransactionRecord,
};

use crate::chart::ChartAggregator;
use crate::error::EngineError;
use crate::lighthouse::apply_lighthouse;
use crate::pulse::apply_pulse;
use crate::rsi::{
    DEFAULT_OVERBOUGHT, DEFAULT_OVERSOLD, DEFAULT_PERIOD, PricePoint, RsiEngine, RsiStatus,
};
use crate::state::MetricsState;
use crate::summary::MetricsSummary;
use crate::trade::apply_trade;
use crate::volume_window::{DEFAULT_HORIZON_MS, VolumeWindow};

#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    /// RSI lookback period (Wilder). Must be at least 1.
    pub rsi_period: usize,

    /// Trade-volume retention horizon in milliseconds.
    pub volume_horizon_ms: u64,

    /// RSI threshold below which the market reads as oversold.
    pub oversold: f64,

    /// RSI threshold above which the market reads as overbought.
    pub overbought: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rsi_period: DEFAULT_PERIOD,
            volume_horizon_ms: DEFAULT_HORIZON_MS,
            oversold: DEFAULT_OVERSOLD,
            overbought: DEFAULT_OVERBOUGHT,
        }
    }
}

pub struct MetricsEngine {
    cfg: EngineConfig,
    state: MetricsState,
    volume: VolumeWindow,
    rsi: RsiEngine,
    chart: ChartAggregator,
    exchange_rate: Option<f64>,
}

impl MetricsEngine {
    pub fn new(cfg: EngineConfig) -> Result<Self, EngineError> {
        if cfg.volume_horizon_ms == 0 {
            return Err(EngineError::InvalidVolumeHorizon(cfg.volume_horizon_ms));
        }

        Ok(Self {
            cfg,
            state: MetricsState::default(),
            volume: VolumeWindow::new(cfg.volume_horizon_ms),
            rsi: RsiEngine::new(cfg.rsi_period)?,
            chart: ChartAggregator::new(),
            exchange_rate: None,
        })
    }

    /// Dispatch one typed event. `now_ms` is the receive-side clock reading,
    /// used to stamp pulse freshness.
    pub fn handle_event(&mut self, event: MarketEvent, now_ms: u64) {
        match event {
            MarketEvent::Trade(ev) => self.handle_trade(&ev),
            MarketEvent::Pulse(snap) => self.handle_pulse(&snap, now_ms),
            MarketEvent::Lighthouse(snap) => self.handle_lighthouse(&snap),
            MarketEvent::ChartBatch(bars) => {
                self.ingest_bars(&bars);
            }
        }
    }

    pub fn handle_trade(&mut self, ev: &TradeEvent) {
        apply_trade(&mut self.state, &mut self.volume, &mut self.rsi, ev);
    }

    pub fn handle_pulse(&mut self, snap: &PulseSnapshot, now_ms: u64) {
        apply_pulse(&mut self.state, snap, self.exchange_rate, now_ms);
    }

    pub fn handle_lighthouse(&mut self, snap: &LighthouseSnapshot) {
        apply_lighthouse(&mut self.state, snap);
    }

    /// Ingest a historical bar batch: dedup by time key, keep the stored
    /// list sorted, raise the chart ATH, and seed the RSI from the fresh
    /// closes while it is still warming up. Returns how many bars were
    /// accepted.
    pub fn ingest_bars(&mut self, batch: &[ChartBar]) -> usize {
        let mut accepted = self.chart.ingest(batch);
        if accepted.is_empty() {
            return 0;
        }

        if let Some(high) = self.chart.max_high() {
            let candidate = high * self.state.token_supply;
            if candidate > self.state.chart_ath_market_cap {
                self.state.chart_ath_market_cap = candidate;
                tracing::info!(market_cap = candidate, "new chart ATH market cap");
            }
        }

        // Live trade prices take over once the RSI is warm; only a cold RSI
        // is bootstrapped from history.
        if !self.rsi.is_initialized() {
            accepted.sort_by_key(|b| b.time);
            let points: Vec<PricePoint> = accepted
                .iter()
                .map(|b| PricePoint { price: b.close, ts_ms: b.time })
                .collect();
            self.rsi.process_history(&points);
        }

        accepted.len()
    }

    /// Set the native→fiat rate used by future pulse conversions. Only
    /// finite positive values are accepted; anything else is logged and the
    /// previous rate is retained. Already-converted values stay as they are.
    pub fn set_exchange_rate(&mut self, rate: f64) {
        if rate.is_finite() && rate > 0.0 {
            self.exchange_rate = Some(rate);
            tracing::info!(rate, "exchange rate updated");
        } else {
            tracing::warn!(rate, "exchange rate rejected: must be finite and positive");
        }
    }

    pub fn exchange_rate(&self) -> Option<f64> {
        self.exchange_rate
    }

    pub fn state(&self) -> &MetricsState {
        &self.state
    }

    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.state.transactions
    }

    pub fn chart_bars(&self) -> &[ChartBar] {
        self.chart.bars()
    }

    pub fn current_rsi(&self) -> Option<f64> {
        self.rsi.current()
    }

    /// Read-only presentation snapshot. Fields that were never populated
    /// stay `None` and render as placeholders.
    pub fn summary(&self, now_ms: u64) -> MetricsSummary {
        let traded = !self.state.transactions.is_empty();
        let rsi = self.rsi.current();

        MetricsSummary {
            price_usd: self.state.last_price,
            market_cap_usd: self.state.last_market_cap,
            volume_1m_usd: traded.then(|| self.volume.sum_within(now_ms, 60_000)),
            volume_5m_usd: traded.then(|| self.volume.sum_within(now_ms, 300_000)),
            session_ath_market_cap_usd: (self.state.session_ath_market_cap > 0.0)
                .then_some(self.state.session_ath_market_cap),
            pulse: self.state.pulse,
            broad_market_5m_volume_usd: self.state.broad_market_5m_volume,
            chart_ath_market_cap_usd: (self.state.chart_ath_market_cap > 0.0)
                .then_some(self.state.chart_ath_market_cap),
            rsi,
            rsi_status: RsiStatus::classify(rsi, self.cfg.oversold, self.cfg.overbought),
        }
    }

    /// Reinitialize the indicator components only; MetricsState survives.
    pub fn reset_indicators(&mut self) {
        self.rsi.reset();
        self.volume.clear();
        tracing::info!("indicator state reset");
    }

    /// Zero everything back to construction defaults. The configured
    /// exchange rate survives: it is configuration, not derived state.
    pub fn reset(&mut self) {
        self.state = MetricsState::default();
        self.chart.clear();
        self.rsi.reset();
        self.volume.clear();
        tracing::info!("engine state reset");
    }
}
