//! Error types
//!
//! Every error here is an input-contract violation reported to the immediate
//! caller. Not having enough observations is not an error; see
//! [`Estimation::InsufficientData`](crate::types::Estimation).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("confidence level must be an integer in 1..=5, got {0}")]
    InvalidConfidence(i64),
    #[error("score must be a finite number in [0, 100], got {0}")]
    InvalidScore(f64),
    #[error("observation {index}: response time must be non-negative, got {value} ms")]
    NegativeResponseTime { index: usize, value: i64 },
    #[error("difficulty parameter must be finite, got {value}")]
    InvalidDifficultyParameter { value: f64 },
    #[error("unknown difficulty label: {0}")]
    UnknownDifficultyLabel(String),
    #[error("difficulty level {level} is outside 1..={max}")]
    InvalidDifficultyLevel { level: u8, max: u8 },
    #[error("calibration delta must be a finite non-negative magnitude, got {0}")]
    InvalidDelta(f64),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
