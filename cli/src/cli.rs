use std::path::PathBuf;

use clap::Parser;

use engine::EngineConfig;

#[derive(Debug, Parser)]
#[clap(name = "tickhud", version)]
pub struct Cli {
    /// JSONL capture file to replay through the engine
    #[clap(long)]
    pub replay: PathBuf,

    /// Delay between replayed events, in milliseconds (0 = no pacing)
    #[clap(long, default_value = "0")]
    pub pace_ms: u64,

    /// Native-asset → USD exchange rate used for pulse conversions
    #[clap(long)]
    pub exchange_rate: Option<f64>,

    /// RSI lookback period
    #[clap(long, default_value = "14")]
    pub rsi_period: usize,

    /// Trade-volume retention horizon, in hours
    #[clap(long, default_value = "24")]
    pub volume_horizon_hours: u64,

    /// How often to print the live summary, in milliseconds
    #[clap(long, default_value = "5000")]
    pub summary_interval_ms: u64,

    /// Directory for the transaction-log and chart-bar exports
    #[clap(long, default_value = "exports")]
    pub export_dir: PathBuf,
}

/// Map CLI flags onto the engine configuration.
pub(crate) fn engine_config_from_cli(cli: &Cli) -> EngineConfig {
    EngineConfig {
        rsi_period: cli.rsi_period,
        volume_horizon_ms: cli.volume_horizon_hours * 60 * 60 * 1000,
        ..Default::default()
    }
}
