use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid RSI period: {0} (must be at least 1)")]
    InvalidRsiPeriod(usize),

    #[error("invalid volume horizon: {0} ms (must be positive)")]
    InvalidVolumeHorizon(u64),
}
