//! Export serializers for the engine's collections.
//!
//! The engine only exposes the raw transaction log and bar list; this
//! module owns the format choices: pretty JSON for the hierarchical export
//! and comma-separated rows for the tabular one.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};

use corelib::models::{ChartBar, TransactionRecord};

pub fn transactions_to_json(txs: &[TransactionRecord]) -> anyhow::Result<String> {
    serde_json::to_string_pretty(txs).context("serializing transaction log")
}

pub fn chart_bars_to_json(bars: &[ChartBar]) -> anyhow::Result<String> {
    serde_json::to_string_pretty(bars).context("serializing chart bars")
}

pub fn transactions_to_csv(txs: &[TransactionRecord]) -> String {
    let mut out =
        String::from("timestamp_ms,price_usd,market_cap_usd,value_usd,side,signature,maker_address\n");

    for tx in txs {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{}",
            tx.ts_ms,
            tx.price_usd,
            tx.market_cap_usd,
            tx.value_usd,
            tx.side.as_str(),
            tx.signature,
            tx.maker_address
        );
    }

    out
}

pub fn chart_bars_to_csv(bars: &[ChartBar]) -> String {
    let mut out = String::from("time,open,high,low,close,volume\n");

    for bar in bars {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{}",
            bar.time, bar.open, bar.high, bar.low, bar.close, bar.volume
        );
    }

    out
}

/// `prefix-20260806T101500Z.ext`
pub fn export_filename(prefix: &str, ext: &str, now: DateTime<Utc>) -> String {
    format!("{prefix}-{}.{ext}", now.format("%Y%m%dT%H%M%SZ"))
}

pub fn write_export(dir: &Path, filename: &str, contents: &str) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating export directory {}", dir.display()))?;

    let path = dir.join(filename);
    std::fs::write(&path, contents)
        .with_context(|| format!("writing export {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use corelib::models::TradeSide;

    fn record(ts_ms: u64) -> TransactionRecord {
        TransactionRecord {
            ts_ms,
            price_usd: 0.002,
            market_cap_usd: 2_000_000.0,
            value_usd: 15.5,
            side: TradeSide::Buy,
            signature: format!("SIG-{ts_ms}"),
            maker_address: "MAKER".into(),
        }
    }

    #[test]
    fn transactions_csv_has_header_and_one_row_per_record() {
        let csv = transactions_to_csv(&[record(1), record(2)]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("timestamp_ms,price_usd"));
        assert!(lines[1].starts_with("1,0.002,2000000,15.5,buy,SIG-1"));
    }

    #[test]
    fn transactions_json_round_trips() {
        let json = transactions_to_json(&[record(7)]).unwrap();
        let back: Vec<TransactionRecord> = serde_json::from_str(&json).unwrap();

        assert_eq!(back.len(), 1);
        assert_eq!(back[0].ts_ms, 7);
        assert_eq!(back[0].signature, "SIG-7");
    }

    #[test]
    fn chart_bars_csv_rows_match_bar_fields() {
        let bars = [ChartBar { time: 5, open: 1.0, high: 2.0, low: 0.5, close: 1.5, volume: 9.0 }];
        let csv = chart_bars_to_csv(&bars);

        assert_eq!(csv.lines().nth(1), Some("5,1,2,0.5,1.5,9"));
    }

    #[test]
    fn filenames_are_utc_stamped() {
        let at = Utc.with_ymd_and_hms(2026, 8, 6, 10, 15, 0).unwrap();
        assert_eq!(
            export_filename("transactions", "json", at),
            "transactions-20260806T101500Z.json"
        );
    }
}
