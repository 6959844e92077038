//! Presentation snapshot and number formatting.
//!
//! The summary is the read-only payload handed to whatever renders the
//! HUD. Fields that were never populated are `None` and format as `---`;
//! everything else formats as currency, compact currency, or a grouped
//! integer.

use std::fmt;

use serde::Serialize;

use crate::rsi::RsiStatus;
use crate::state::PulseStats;

/// Placeholder shown for fields that have never been populated.
pub const PLACEHOLDER: &str = "---";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricsSummary {
    pub price_usd: Option<f64>,
    pub market_cap_usd: Option<f64>,
    pub volume_1m_usd: Option<f64>,
    pub volume_5m_usd: Option<f64>,
    pub session_ath_market_cap_usd: Option<f64>,
    pub pulse: Option<PulseStats>,
    pub broad_market_5m_volume_usd: Option<f64>,
    pub chart_ath_market_cap_usd: Option<f64>,
    pub rsi: Option<f64>,
    pub rsi_status: RsiStatus,
}

impl fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Price:          {}", opt(self.price_usd, |v| format_usd(v, 6)))?;
        writeln!(f, "Market Cap:     {}", opt(self.market_cap_usd, format_compact))?;
        writeln!(
            f,
            "Vol (1m / 5m):  {} / {}",
            opt(self.volume_1m_usd, format_compact),
            opt(self.volume_5m_usd, format_compact)
        )?;
        writeln!(
            f,
            "Session ATH MC: {}",
            opt(self.session_ath_market_cap_usd, format_compact)
        )?;

        match &self.pulse {
            Some(p) => writeln!(
                f,
                "Pulse:          MC {}  Vol {}  Holders {}  Liq {}",
                format_compact(p.market_cap_usd),
                format_compact(p.volume_usd),
                format_count(p.num_holders),
                format_compact(p.liquidity_usd)
            )?,
            None => writeln!(f, "Pulse:          {PLACEHOLDER}")?,
        }

        writeln!(
            f,
            "Broad 5m Vol:   {}",
            opt(self.broad_market_5m_volume_usd, format_compact)
        )?;
        writeln!(
            f,
            "Chart ATH MC:   {}",
            opt(self.chart_ath_market_cap_usd, format_compact)
        )?;

        match self.rsi {
            Some(v) => write!(f, "RSI:            {v:.2} ({})", self.rsi_status),
            None => write!(f, "RSI:            {PLACEHOLDER} ({})", self.rsi_status),
        }
    }
}

fn opt(v: Option<f64>, format: impl Fn(f64) -> String) -> String {
    v.map(format).unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// `$12,345.67` style with a fixed number of decimals.
pub fn format_usd(v: f64, decimals: usize) -> String {
    if !v.is_finite() {
        return PLACEHOLDER.to_string();
    }

    let formatted = format!("{:.*}", decimals, v.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, fr)) => (i, Some(fr)),
        None => (formatted.as_str(), None),
    };

    let grouped = group_thousands(int_part);
    let sign = if v < 0.0 { "-" } else { "" };

    match frac_part {
        Some(fr) => format!("{sign}${grouped}.{fr}"),
        None => format!("{sign}${grouped}"),
    }
}

/// Compact `$1.23K` / `M` / `B` / `T` notation for large magnitudes.
pub fn format_compact(v: f64) -> String {
    if !v.is_finite() {
        return PLACEHOLDER.to_string();
    }

    let abs = v.abs();
    let (scaled, suffix) = if abs >= 1e12 {
        (v / 1e12, "T")
    } else if abs >= 1e9 {
        (v / 1e9, "B")
    } else if abs >= 1e6 {
        (v / 1e6, "M")
    } else if abs >= 1e3 {
        (v / 1e3, "K")
    } else {
        return format_usd(v, 2);
    };

    let sign = if scaled < 0.0 { "-" } else { "" };
    format!("{sign}${:.2}{suffix}", scaled.abs())
}

/// Grouped integer, e.g. holder counts: `1,204`.
pub fn format_count(n: u64) -> String {
    group_thousands(&n.to_string())
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;

    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_summary() -> MetricsSummary {
        MetricsSummary {
            price_usd: None,
            market_cap_usd: None,
            volume_1m_usd: None,
            volume_5m_usd: None,
            session_ath_market_cap_usd: None,
            pulse: None,
            broad_market_5m_volume_usd: None,
            chart_ath_market_cap_usd: None,
            rsi: None,
            rsi_status: RsiStatus::Calculating,
        }
    }

    #[test]
    fn usd_formatting_groups_thousands() {
        assert_eq!(format_usd(0.0, 2), "$0.00");
        assert_eq!(format_usd(1234.5, 2), "$1,234.50");
        assert_eq!(format_usd(1_234_567.891, 2), "$1,234,567.89");
        assert_eq!(format_usd(-42.0, 2), "-$42.00");
        assert_eq!(format_usd(0.002, 6), "$0.002000");
    }

    #[test]
    fn compact_formatting_picks_magnitude_suffix() {
        assert_eq!(format_compact(999.0), "$999.00");
        assert_eq!(format_compact(1_500.0), "$1.50K");
        assert_eq!(format_compact(2_000_000.0), "$2.00M");
        assert_eq!(format_compact(3_250_000_000.0), "$3.25B");
        assert_eq!(format_compact(1.2e12), "$1.20T");
    }

    #[test]
    fn count_formatting_groups_digits() {
        assert_eq!(format_count(7), "7");
        assert_eq!(format_count(1_204), "1,204");
        assert_eq!(format_count(1_000_000), "1,000,000");
    }

    #[test]
    fn unset_fields_render_placeholders() {
        let text = empty_summary().to_string();

        assert!(text.contains("Price:          ---"));
        assert!(text.contains("Pulse:          ---"));
        assert!(text.contains("(Calculating)"));
    }

    #[test]
    fn populated_fields_render_values() {
        let s = MetricsSummary {
            price_usd: Some(0.002),
            market_cap_usd: Some(2_000_000.0),
            rsi: Some(41.67),
            rsi_status: RsiStatus::Neutral,
            ..empty_summary()
        };

        let text = s.to_string();
        assert!(text.contains("$0.002000"));
        assert!(text.contains("$2.00M"));
        assert!(text.contains("41.67 (Neutral)"));
    }
}
