use tracing::debug;

use crate::config::ControllerConfig;
use crate::error::Result;
use crate::sanitize::{validate_confidence, validate_score};
use crate::scale::DifficultyScale;
use crate::types::{ConfidenceLevel, DifficultyAdjustment, DifficultyLevel, ReasonCode};

/// Picks the next item's difficulty band from the last score and the
/// learner's self-reported confidence. Moves at most one band per call.
#[derive(Debug, Clone, Default)]
pub struct DifficultyController {
    config: ControllerConfig,
    scale: DifficultyScale,
}

impl DifficultyController {
    pub fn new(config: ControllerConfig, scale: DifficultyScale) -> Self {
        Self { config, scale }
    }

    pub fn scale(&self) -> &DifficultyScale {
        &self.scale
    }

    /// Rules, first match wins:
    /// 1. score < low_score → `INCORRECT_DECREASE`
    /// 2. score ≥ high_score and confidence ≥ high_confidence → `CORRECT_CONFIDENT_INCREASE`
    /// 3. confidence ≥ high_confidence (score below high_score) → `OVERCONFIDENT_CORRECTION`
    /// 4. otherwise → `STABLE_PERFORMANCE`
    pub fn decide(&self, score: f64, confidence: ConfidenceLevel) -> ReasonCode {
        let confident = confidence.get() >= self.config.high_confidence;

        if score < self.config.low_score {
            ReasonCode::IncorrectDecrease
        } else if score >= self.config.high_score && confident {
            ReasonCode::CorrectConfidentIncrease
        } else if confident {
            ReasonCode::OverconfidentCorrection
        } else {
            ReasonCode::StablePerformance
        }
    }

    pub fn adjust_difficulty(
        &self,
        current: DifficultyLevel,
        score: f64,
        confidence_level: i64,
    ) -> Result<DifficultyAdjustment> {
        let score = validate_score(score)?;
        let confidence = validate_confidence(confidence_level)?;

        let previous = self.scale.clamp(current);
        let reason_code = self.decide(score, confidence);
        let (next, clamped) = self.scale.step(previous, reason_code.direction());
        let magnitude = next.get() as i32 - previous.get() as i32;

        debug!(
            previous = previous.get(),
            next = next.get(),
            score,
            confidence = confidence.get(),
            reason = reason_code.as_str(),
            clamped,
            "difficulty adjusted"
        );

        Ok(DifficultyAdjustment {
            previous_difficulty: previous,
            next_difficulty: next,
            magnitude,
            reason_code,
            clamped,
        })
    }

    /// Label-based variant for callers that store band names
    pub fn adjust_label(
        &self,
        current: &str,
        score: f64,
        confidence_level: i64,
    ) -> Result<(DifficultyAdjustment, &'static str)> {
        let level = self.scale.parse_label(current)?;
        let adjustment = self.adjust_difficulty(level, score, confidence_level)?;
        let label = self.scale.label(adjustment.next_difficulty)?;
        Ok((adjustment, label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn level(n: u8) -> DifficultyLevel {
        DifficultyLevel::new(n)
    }

    #[test]
    fn test_confident_correct_increases() {
        let ctl = DifficultyController::default();
        let adj = ctl.adjust_difficulty(level(2), 90.0, 5).unwrap();
        assert_eq!(adj.next_difficulty, level(3));
        assert_eq!(adj.magnitude, 1);
        assert_eq!(adj.reason_code, ReasonCode::CorrectConfidentIncrease);
        assert!(!adj.clamped);
    }

    #[test]
    fn test_low_score_decreases_regardless_of_confidence() {
        let ctl = DifficultyController::default();
        for confidence in 1..=5 {
            let adj = ctl.adjust_difficulty(level(3), 30.0, confidence).unwrap();
            assert_eq!(adj.reason_code, ReasonCode::IncorrectDecrease);
            assert_eq!(adj.next_difficulty, level(2));
        }
    }

    #[test]
    fn test_confident_middling_score_is_overconfident_correction() {
        let ctl = DifficultyController::default();
        let adj = ctl.adjust_difficulty(level(3), 65.0, 4).unwrap();
        assert_eq!(adj.reason_code, ReasonCode::OverconfidentCorrection);
        assert_eq!(adj.magnitude, -1);
    }

    #[test]
    fn test_unconfident_high_score_is_stable() {
        let ctl = DifficultyController::default();
        let adj = ctl.adjust_difficulty(level(3), 95.0, 3).unwrap();
        assert_eq!(adj.reason_code, ReasonCode::StablePerformance);
        assert_eq!(adj.next_difficulty, level(3));
        assert_eq!(adj.magnitude, 0);
    }

    #[test]
    fn test_threshold_boundaries() {
        let ctl = DifficultyController::default();
        let c = ConfidenceLevel::new(4).unwrap();
        assert_eq!(ctl.decide(80.0, c), ReasonCode::CorrectConfidentIncrease);
        assert_eq!(ctl.decide(79.99, c), ReasonCode::OverconfidentCorrection);
        assert_eq!(ctl.decide(50.0, c), ReasonCode::OverconfidentCorrection);
        assert_eq!(ctl.decide(49.99, c), ReasonCode::IncorrectDecrease);
    }

    #[test]
    fn test_clamps_at_maximum() {
        let ctl = DifficultyController::default();
        let adj = ctl.adjust_difficulty(level(5), 100.0, 5).unwrap();
        assert_eq!(adj.next_difficulty, level(5));
        assert_eq!(adj.magnitude, 0);
        assert_eq!(adj.reason_code, ReasonCode::CorrectConfidentIncrease);
        assert!(adj.clamped);
    }

    #[test]
    fn test_out_of_range_current_is_clamped_first() {
        let ctl = DifficultyController::default();
        let adj = ctl.adjust_difficulty(level(0), 10.0, 1).unwrap();
        assert_eq!(adj.previous_difficulty, level(1));
        assert_eq!(adj.next_difficulty, level(1));

        let adj = ctl.adjust_difficulty(level(42), 60.0, 2).unwrap();
        assert_eq!(adj.next_difficulty, level(5));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let ctl = DifficultyController::default();
        assert!(matches!(
            ctl.adjust_difficulty(level(2), 90.0, 6),
            Err(CoreError::InvalidConfidence(6))
        ));
        assert!(matches!(
            ctl.adjust_difficulty(level(2), 101.0, 3),
            Err(CoreError::InvalidScore(_))
        ));
    }

    #[test]
    fn test_three_band_labels() {
        let ctl = DifficultyController::new(ControllerConfig::default(), DifficultyScale::three_band());
        let (adj, label) = ctl.adjust_label("mid", 85.0, 4).unwrap();
        assert_eq!(label, "hard");
        assert_eq!(adj.next_difficulty, level(3));

        let (_, label) = ctl.adjust_label("easy", 20.0, 2).unwrap();
        assert_eq!(label, "easy");

        assert!(ctl.adjust_label("extreme", 20.0, 2).is_err());
    }
}
