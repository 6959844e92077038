pub mod cli;

use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::Instrument;

use cli::{Cli, engine_config_from_cli};
use common::logger::{TraceId, feed_span, init_logger};
use common::time::now_ms;
use engine::MetricsEngine;
use feed::export;
use feed::replay::{EventSource, JsonlReplay};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger("tickhud");

    let cli = Cli::parse();

    let mut metrics = MetricsEngine::new(engine_config_from_cli(&cli))?;
    if let Some(rate) = cli.exchange_rate {
        metrics.set_exchange_rate(rate);
    }

    let (event_tx, mut event_rx) = mpsc::channel(1024);

    let mut replay = JsonlReplay::new(&cli.replay);
    if cli.pace_ms > 0 {
        replay = replay.with_pace(Duration::from_millis(cli.pace_ms));
    }

    let trace_id = TraceId::default();
    let replay_task =
        tokio::spawn(replay.run(event_tx).instrument(feed_span("jsonl_replay", &trace_id)));

    // Single-writer dispatch: every engine mutation happens in this loop.
    let mut ticker =
        tokio::time::interval(Duration::from_millis(cli.summary_interval_ms.max(100)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            maybe_event = event_rx.recv() => {
                match maybe_event {
                    Some(event) => metrics.handle_event(event, now_ms()),
                    None => break,
                }
            }
            _ = ticker.tick() => {
                println!("{}\n", metrics.summary(now_ms()));
            }
        }
    }

    replay_task.await??;

    println!("{}\n", metrics.summary(now_ms()));

    let stamp = chrono::Utc::now();

    let tx_json = export::transactions_to_json(metrics.transactions())?;
    export::write_export(
        &cli.export_dir,
        &export::export_filename("transactions", "json", stamp),
        &tx_json,
    )?;
    export::write_export(
        &cli.export_dir,
        &export::export_filename("transactions", "csv", stamp),
        &export::transactions_to_csv(metrics.transactions()),
    )?;

    let bars_json = export::chart_bars_to_json(metrics.chart_bars())?;
    export::write_export(
        &cli.export_dir,
        &export::export_filename("chart-bars", "json", stamp),
        &bars_json,
    )?;
    export::write_export(
        &cli.export_dir,
        &export::export_filename("chart-bars", "csv", stamp),
        &export::chart_bars_to_csv(metrics.chart_bars()),
    )?;

    tracing::info!(
        transactions = metrics.transactions().len(),
        chart_bars = metrics.chart_bars().len(),
        export_dir = %cli.export_dir.display(),
        "exports written"
    );

    Ok(())
}
