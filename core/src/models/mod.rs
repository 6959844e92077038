use serde::{Deserialize, Serialize};

pub mod market_models;

pub use market_models::*;

/// Direction of a trade as reported by the venue.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,

    #[default]
    Unknown,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
            TradeSide::Unknown => "unknown",
        }
    }
}
