//! Input Validation
//!
//! Contract checks applied at the public boundary. Out-of-range input is
//! rejected, never coerced: a bad value here indicates an upstream bug.
//!
//! Functions:
//! - Score / confidence / delta validation
//! - Observation window validation

use crate::error::{CoreError, Result};
use crate::types::{ConfidenceLevel, ResponseObservation, MAX_SCORE, MIN_SCORE};

pub fn validate_score(score: f64) -> Result<f64> {
    if score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(score)
    } else {
        Err(CoreError::InvalidScore(score))
    }
}

pub fn validate_confidence(level: i64) -> Result<ConfidenceLevel> {
    ConfidenceLevel::new(level)
}

/// Trend inputs are stored magnitudes of calibration deltas
pub fn validate_abs_delta(delta: f64) -> Result<f64> {
    if delta.is_finite() && delta >= 0.0 {
        Ok(delta)
    } else {
        Err(CoreError::InvalidDelta(delta))
    }
}

pub fn validate_parameter(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoreError::InvalidDifficultyParameter { value })
    }
}

/// 校验观测窗口: 响应时间非负, 难度参数有限
pub fn validate_observations(observations: &[ResponseObservation]) -> Result<()> {
    for (index, obs) in observations.iter().enumerate() {
        if obs.response_time_ms < 0 {
            return Err(CoreError::NegativeResponseTime {
                index,
                value: obs.response_time_ms,
            });
        }
        validate_parameter(obs.difficulty)?;
    }
    Ok(())
}
