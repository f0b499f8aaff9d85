//! Confidence Calibration
//!
//! Compares a learner's self-reported confidence with how they actually
//! scored.
//!
//! - `normalize_confidence`: 1..=5 → 0..=100, `(level - 1) * 25`
//! - `compute_calibration`: `delta = confidence - score`, labelled against
//!   the policy thresholds (±15 by default)
//! - `classify_trend`: two-point comparison of stored |delta| values
//!
//! Thresholds are bound to the analyzer instance, so labels stay consistent
//! across a learner's history while different policies can run side by side.

use tracing::debug;

use crate::config::CalibrationPolicy;
use crate::error::Result;
use crate::sanitize::{validate_abs_delta, validate_confidence, validate_score};
use crate::types::{CalibrationCategory, CalibrationResult, CalibrationTrend};

#[derive(Debug, Clone, Default)]
pub struct CalibrationAnalyzer {
    policy: CalibrationPolicy,
}

impl CalibrationAnalyzer {
    pub fn new(policy: CalibrationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &CalibrationPolicy {
        &self.policy
    }

    pub fn normalize_confidence(level: i64) -> Result<f64> {
        Ok(validate_confidence(level)?.normalized())
    }

    pub fn categorize(&self, delta: f64) -> CalibrationCategory {
        if delta > self.policy.overconfident_threshold {
            CalibrationCategory::Overconfident
        } else if delta < self.policy.underconfident_threshold {
            CalibrationCategory::Underconfident
        } else {
            CalibrationCategory::Calibrated
        }
    }

    pub fn compute_calibration(&self, score: f64, level: i64) -> Result<CalibrationResult> {
        let score = validate_score(score)?;
        let confidence_normalized = Self::normalize_confidence(level)?;
        let delta = confidence_normalized - score;
        let category = self.categorize(delta);

        debug!(
            score,
            confidence = confidence_normalized,
            delta,
            category = category.as_str(),
            "calibration computed"
        );

        Ok(CalibrationResult {
            confidence_normalized,
            delta,
            category,
        })
    }

    /// `change = previous - recent`; positive means the gap is closing.
    pub fn classify_trend(
        &self,
        previous_abs_delta: f64,
        recent_abs_delta: f64,
    ) -> Result<CalibrationTrend> {
        let previous = validate_abs_delta(previous_abs_delta)?;
        let recent = validate_abs_delta(recent_abs_delta)?;
        let change = previous - recent;

        let trend = if change > self.policy.trend_threshold {
            CalibrationTrend::Improving
        } else if change < -self.policy.trend_threshold {
            CalibrationTrend::Worsening
        } else {
            CalibrationTrend::Stable
        };

        Ok(trend)
    }

    /// Trend between two stored results; uses their |delta|
    pub fn trend_between(
        &self,
        previous: &CalibrationResult,
        recent: &CalibrationResult,
    ) -> Result<CalibrationTrend> {
        self.classify_trend(previous.abs_delta(), recent.abs_delta())
    }
}
