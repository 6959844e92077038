//! Capture replay source.
//!
//! The production collaborators of this system intercept live network
//! traffic; ingestion here replays a JSONL capture instead — one raw
//! payload per line, routed through the shape parser into the engine's
//! dispatch channel. Transport is out of scope by design, so the replay
//! file is the only event source this crate ships.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::Sender;

use common::logger::annotate_instrument;
use common::time::now_ms;
use corelib::models::MarketEvent;

use crate::parser::parse_market_event;

/// A source of typed market events.
#[async_trait]
pub trait EventSource {
    /// Drive the source to completion, delivering events into `tx`.
    async fn run(self, tx: Sender<MarketEvent>) -> anyhow::Result<()>;
}

pub struct JsonlReplay {
    path: PathBuf,
    /// Optional delay between delivered events (None = as fast as possible).
    pace: Option<Duration>,
}

impl JsonlReplay {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), pace: None }
    }

    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = Some(pace);
        self
    }
}

#[async_trait]
impl EventSource for JsonlReplay {
    async fn run(self, tx: Sender<MarketEvent>) -> anyhow::Result<()> {
        let file = File::open(&self.path)
            .await
            .with_context(|| format!("opening capture file {}", self.path.display()))?;
        let mut lines = BufReader::new(file).lines();

        let mut delivered = 0u64;
        let mut skipped = 0u64;
        let mut instrument_noted = false;

        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match parse_market_event(trimmed, now_ms()) {
                Ok(Some(event)) => {
                    if !instrument_noted {
                        if let MarketEvent::Trade(t) = &event {
                            annotate_instrument(&t.pair_address);
                            instrument_noted = true;
                        }
                    }
                    if tx.send(event).await.is_err() {
                        tracing::warn!("event channel closed; stopping replay");
                        break;
                    }
                    delivered += 1;
                }
                Ok(None) => skipped += 1,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed capture line");
                    skipped += 1;
                }
            }

            if let Some(pace) = self.pace {
                tokio::time::sleep(pace).await;
            }
        }

        tracing::info!(delivered, skipped, "replay finished");
        Ok(())
    }
}
