// File: crates/chart-core/src/error.rs
// Summary: Caller-facing error type. Data problems never land here; they degrade to placeholders.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("viewport {width}x{height} leaves no plot area after margins")]
    EmptyPlotArea { width: u32, height: u32 },

    #[error("malformed backtest payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("unknown chart kind '{0}'")]
    UnknownKind(String),
}

pub type ChartResult<T> = Result<T, ChartError>;
