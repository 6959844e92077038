//! End-to-end scenarios against the assembled engine.

use corelib::models::{ChartBar, MarketEvent, PulseSnapshot, TradeEvent, TradeSide};
use engine::volume_window::VolumeWindow;
use engine::{EngineConfig, MetricsEngine};

const HOUR_MS: u64 = 60 * 60 * 1000;

fn trade(price: f64, value: f64, ts_ms: u64) -> TradeEvent {
    TradeEvent {
        ts_ms,
        price_usd: price,
        total_usd: value,
        pair_address: "PAIR".into(),
        signature: format!("SIG-{ts_ms}"),
        side: TradeSide::Buy,
        maker_address: "MAKER".into(),
        liquidity_native: 0.0,
        liquidity_token: 0.0,
    }
}

fn bar(time: u64, high: f64) -> ChartBar {
    ChartBar { time, open: high, high, low: high, close: high, volume: 1.0 }
}

fn supply_pulse(supply: f64) -> PulseSnapshot {
    PulseSnapshot {
        supply: Some(supply),
        market_cap_native: 0.0,
        volume_native: 0.0,
        num_holders: 0,
        liquidity_native: 0.0,
    }
}

#[test]
fn rsi_defined_and_exact_after_period_deltas() {
    // Spec scenario: prices [1.0, 1.1, 1.05, 1.2, 0.9] at period 4.
    let mut eng = MetricsEngine::new(EngineConfig { rsi_period: 4, ..Default::default() }).unwrap();

    for (i, price) in [1.0, 1.1, 1.05, 1.2].iter().enumerate() {
        eng.handle_trade(&trade(*price, 1.0, i as u64));
        assert_eq!(eng.current_rsi(), None, "rsi defined too early at step {i}");
    }

    eng.handle_trade(&trade(0.9, 1.0, 4));

    let avg_gain = (0.1 + 0.0 + 0.15 + 0.0) / 4.0;
    let avg_loss = (0.0 + 0.05 + 0.0 + 0.3) / 4.0;
    let expected = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);

    let rsi = eng.current_rsi().expect("rsi defined after 5th price");
    assert!((rsi - expected).abs() < 1e-9);
    assert!((0.0..=100.0).contains(&rsi));
}

#[test]
fn supply_change_halves_market_cap_at_same_price() {
    let mut eng = MetricsEngine::new(EngineConfig::default()).unwrap();

    eng.handle_event(MarketEvent::Trade(trade(0.002, 1.0, 1)), 1);
    assert_eq!(eng.state().last_market_cap, Some(2_000_000.0));

    eng.handle_event(MarketEvent::Pulse(supply_pulse(500_000_000.0)), 2);

    eng.handle_event(MarketEvent::Trade(trade(0.002, 1.0, 3)), 3);
    assert_eq!(eng.state().last_market_cap, Some(1_000_000.0));
}

#[test]
fn volume_window_sub_window_queries() {
    let mut window = VolumeWindow::new(24 * HOUR_MS);
    let t0 = 10 * HOUR_MS;

    window.record(t0, 100.0);
    window.record(t0 + HOUR_MS, 50.0);

    let now = t0 + HOUR_MS;
    assert_eq!(window.sum_within(now, 60_000), 50.0);
    assert_eq!(window.sum_within(now, 25 * HOUR_MS), 150.0);
}

#[test]
fn overlapping_chart_batches_dedup_and_raise_ath() {
    let mut eng = MetricsEngine::new(EngineConfig::default()).unwrap();

    eng.handle_event(MarketEvent::ChartBatch(vec![bar(1, 2.0), bar(2, 3.0)]), 1);
    eng.handle_event(MarketEvent::ChartBatch(vec![bar(2, 3.0), bar(3, 1.0)]), 2);

    let times: Vec<u64> = eng.chart_bars().iter().map(|b| b.time).collect();
    assert_eq!(times, vec![1, 2, 3]);

    // max high 3.0 against the default 1B supply.
    assert_eq!(eng.state().chart_ath_market_cap, 3.0 * 1_000_000_000.0);
}

#[test]
fn session_ath_is_order_independent() {
    let orders: [&[f64]; 3] = [
        &[0.001, 0.002, 0.003],
        &[0.003, 0.001, 0.002],
        &[0.002, 0.003, 0.001],
    ];

    for prices in orders {
        let mut eng = MetricsEngine::new(EngineConfig::default()).unwrap();
        for (i, price) in prices.iter().enumerate() {
            eng.handle_trade(&trade(*price, 1.0, i as u64));
        }
        assert_eq!(eng.state().session_ath_market_cap, 3_000_000.0);
    }
}

#[test]
fn superset_reingestion_keeps_unique_time_keys() {
    let mut eng = MetricsEngine::new(EngineConfig::default()).unwrap();

    let first: Vec<ChartBar> = (1..=3).map(|i| bar(i, i as f64)).collect();
    let superset: Vec<ChartBar> = (1..=5).map(|i| bar(i, i as f64)).collect();

    eng.ingest_bars(&first);
    eng.ingest_bars(&superset);
    eng.ingest_bars(&superset);

    assert_eq!(eng.chart_bars().len(), 5);
    let times: Vec<u64> = eng.chart_bars().iter().map(|b| b.time).collect();
    assert_eq!(times, vec![1, 2, 3, 4, 5]);
}

#[test]
fn rejected_events_never_halt_the_stream() {
    let mut eng = MetricsEngine::new(EngineConfig::default()).unwrap();

    eng.handle_trade(&trade(-1.0, 1.0, 1));
    eng.handle_trade(&trade(f64::NAN, 1.0, 2));
    eng.handle_trade(&trade(0.005, 1.0, 3));

    assert_eq!(eng.state().last_price, Some(0.005));
    assert_eq!(eng.transactions().len(), 1);
}

#[test]
fn summary_transitions_from_placeholders_to_values() {
    let mut eng = MetricsEngine::new(EngineConfig::default()).unwrap();
    eng.set_exchange_rate(150.0);

    let before = eng.summary(0);
    assert!(before.price_usd.is_none());
    assert!(before.rsi.is_none());
    assert!(before.to_string().contains("---"));

    eng.handle_event(MarketEvent::Trade(trade(0.002, 25.0, 1_000)), 1_000);
    eng.handle_event(
        MarketEvent::Pulse(PulseSnapshot {
            supply: None,
            market_cap_native: 10_000.0,
            volume_native: 100.0,
            num_holders: 42,
            liquidity_native: 5.0,
        }),
        2_000,
    );

    let after = eng.summary(2_000);
    assert_eq!(after.price_usd, Some(0.002));
    assert_eq!(after.market_cap_usd, Some(2_000_000.0));
    assert_eq!(after.volume_1m_usd, Some(25.0));
    assert_eq!(after.session_ath_market_cap_usd, Some(2_000_000.0));

    let pulse = after.pulse.expect("pulse populated");
    assert_eq!(pulse.market_cap_usd, 1_500_000.0);
    assert_eq!(pulse.num_holders, 42);
}

#[test]
fn chart_ath_and_session_ath_are_independent() {
    let mut eng = MetricsEngine::new(EngineConfig::default()).unwrap();

    eng.handle_trade(&trade(0.001, 1.0, 1));
    eng.ingest_bars(&[bar(1, 0.005)]);

    assert_eq!(eng.state().session_ath_market_cap, 1_000_000.0);
    assert_eq!(eng.state().chart_ath_market_cap, 5_000_000.0);
}
