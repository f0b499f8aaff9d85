//! Ability Estimation (Rasch / 1PL)
//!
//! Maximum-likelihood estimate of a learner's latent ability from a window
//! of graded responses.
//!
//! Model: `P(correct | θ, b) = 1 / (1 + exp(-(θ - b)))`
//!
//! Procedure (Newton-Raphson, identical to Fisher scoring for the 1PL):
//! - θ₀ = mean observed difficulty, clamped into the θ range
//! - score `U(θ) = Σ(yᵢ - pᵢ)`, information `I(θ) = Σ pᵢ(1 - pᵢ)`
//! - `θ ← θ + U/I`, step limited to ±`max_step`, information floored
//! - stop when `|Δθ| < tolerance` or after `max_iterations`
//! - `SE = 1/sqrt(I(θ̂))`, interval `θ̂ ± z·SE`
//!
//! All-correct and all-incorrect windows have no finite MLE. They are
//! clamped to the range bound and flagged instead of iterated. Mixed windows
//! whose MLE lies past a bound end pinned there and are flagged the same way.

pub mod efficiency;

pub use efficiency::EfficiencyAnalyzer;

use tracing::{debug, trace, warn};

use crate::config::EstimatorConfig;
use crate::error::Result;
use crate::sanitize::validate_observations;
use crate::types::{
    AbilityEstimate, ConfidenceInterval, Estimation, ResponseObservation, StopReason,
};

/// Logit clamp keeping exp() well inside f64 range
const MAX_LOGIT: f64 = 20.0;

#[derive(Debug, Clone, Default)]
pub struct AbilityEstimator {
    config: EstimatorConfig,
}

impl AbilityEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn probability(theta: f64, difficulty: f64) -> f64 {
        let z = (theta - difficulty).clamp(-MAX_LOGIT, MAX_LOGIT);
        1.0 / (1.0 + (-z).exp())
    }

    pub fn item_information(theta: f64, difficulty: f64) -> f64 {
        let p = Self::probability(theta, difficulty);
        p * (1.0 - p)
    }

    pub fn test_information(theta: f64, observations: &[ResponseObservation]) -> f64 {
        observations
            .iter()
            .map(|obs| Self::item_information(theta, obs.difficulty))
            .sum()
    }

    /// First derivative of the log-likelihood at `theta`
    pub fn score(theta: f64, observations: &[ResponseObservation]) -> f64 {
        observations
            .iter()
            .map(|obs| {
                let y = if obs.correct { 1.0 } else { 0.0 };
                y - Self::probability(theta, obs.difficulty)
            })
            .sum()
    }

    pub fn estimate(&self, observations: &[ResponseObservation]) -> Result<Estimation> {
        validate_observations(observations)?;

        let start = observations.len().saturating_sub(self.config.window_size);
        let window = &observations[start..];

        if window.len() < self.config.min_observations {
            debug!(
                observations = window.len(),
                required = self.config.min_observations,
                "not enough observations to estimate ability"
            );
            return Ok(Estimation::InsufficientData {
                observations: window.len(),
                required: self.config.min_observations,
            });
        }

        let correct = window.iter().filter(|obs| obs.correct).count();
        let estimate = if correct == 0 || correct == window.len() {
            self.degenerate(window, correct > 0)
        } else {
            self.newton_raphson(window)
        };

        debug!(
            theta = estimate.theta,
            se = estimate.standard_error,
            iterations = estimate.iterations_used,
            stopped_early = estimate.stopped_early,
            observations = estimate.observations_used,
            "ability estimated"
        );

        Ok(Estimation::Estimated(estimate))
    }

    fn newton_raphson(&self, window: &[ResponseObservation]) -> AbilityEstimate {
        let cfg = &self.config;
        let mean_difficulty =
            window.iter().map(|obs| obs.difficulty).sum::<f64>() / window.len() as f64;

        let mut theta = mean_difficulty.clamp(cfg.theta_min, cfg.theta_max);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < cfg.max_iterations {
            iterations += 1;

            let score = Self::score(theta, window);
            let information = Self::test_information(theta, window).max(cfg.min_information);
            let step = (score / information).clamp(-cfg.max_step, cfg.max_step);
            let next = (theta + step).clamp(cfg.theta_min, cfg.theta_max);
            let delta = next - theta;
            theta = next;

            trace!(iteration = iterations, theta, score, information, delta, "newton step");

            if delta.abs() < cfg.tolerance {
                converged = true;
                break;
            }
        }

        // Pinned at a bound while the likelihood still pulls outward: the MLE
        // lies beyond the range, so the clamp is reported like a degenerate pattern.
        let score = Self::score(theta, window);
        let pinned = (theta >= cfg.theta_max && score > cfg.tolerance)
            || (theta <= cfg.theta_min && score < -cfg.tolerance);

        if pinned {
            converged = false;
            debug!(theta, score, iterations, "ability estimate clamped at range bound");
        } else if !converged {
            warn!(
                theta,
                iterations, "ability estimate did not converge within the iteration cap"
            );
        }

        let information = Self::test_information(theta, window).max(cfg.min_information);
        let mut standard_error = 1.0 / information.sqrt();

        let stop_reason = if pinned {
            standard_error = standard_error.max(cfg.degenerate_min_standard_error);
            Some(StopReason::BoundaryClamp)
        } else {
            (standard_error < cfg.target_standard_error).then_some(StopReason::TargetPrecision)
        };

        self.build(window, theta, standard_error, iterations, converged, stop_reason)
    }

    fn degenerate(&self, window: &[ResponseObservation], all_correct: bool) -> AbilityEstimate {
        let cfg = &self.config;
        let theta = if all_correct { cfg.theta_max } else { cfg.theta_min };
        let information = Self::test_information(theta, window).max(cfg.min_information);
        let standard_error = (1.0 / information.sqrt()).max(cfg.degenerate_min_standard_error);

        debug!(
            all_correct,
            observations = window.len(),
            theta,
            "degenerate response pattern, clamping ability to range bound"
        );

        self.build(
            window,
            theta,
            standard_error,
            0,
            false,
            Some(StopReason::DegeneratePattern),
        )
    }

    fn build(
        &self,
        window: &[ResponseObservation],
        theta: f64,
        standard_error: f64,
        iterations_used: u32,
        converged: bool,
        stop_reason: Option<StopReason>,
    ) -> AbilityEstimate {
        let margin = self.config.z_score * standard_error;
        let mean_response_time_ms = window
            .iter()
            .map(|obs| obs.response_time_ms as f64)
            .sum::<f64>()
            / window.len() as f64;

        AbilityEstimate {
            theta,
            standard_error,
            confidence_interval: ConfidenceInterval {
                low: theta - margin,
                high: theta + margin,
            },
            iterations_used,
            stopped_early: stop_reason.is_some(),
            stop_reason,
            converged,
            observations_used: window.len(),
            mean_response_time_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn obs(difficulty: f64, correct: bool) -> ResponseObservation {
        ResponseObservation::new(difficulty, correct, 1500)
    }

    fn estimate(window: &[ResponseObservation]) -> AbilityEstimate {
        AbilityEstimator::default()
            .estimate(window)
            .unwrap()
            .into_estimate()
            .expect("expected a numeric estimate")
    }

    #[test]
    fn test_probability_range() {
        for theta in [-4.0, -1.0, 0.0, 1.0, 4.0] {
            for b in [-3.0, 0.0, 3.0] {
                let p = AbilityEstimator::probability(theta, b);
                assert!(p > 0.0 && p < 1.0, "p={p} for theta={theta}, b={b}");
            }
        }
        assert!((AbilityEstimator::probability(0.0, 0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_probability_extreme_logit_stays_finite() {
        let p = AbilityEstimator::probability(1e6, -1e6);
        assert!(p.is_finite() && p < 1.0);
        assert!(AbilityEstimator::item_information(1e6, -1e6) > 0.0);
    }

    #[test]
    fn test_empty_window_is_insufficient() {
        let result = AbilityEstimator::default().estimate(&[]).unwrap();
        assert_eq!(
            result,
            Estimation::InsufficientData {
                observations: 0,
                required: 1
            }
        );
    }

    #[test]
    fn test_mixed_responses_match_closed_form() {
        // 3 of 5 correct at b = 0: θ̂ = ln(3/2), I = 5 · 0.6 · 0.4
        let window = [
            obs(0.0, true),
            obs(0.0, true),
            obs(0.0, true),
            obs(0.0, false),
            obs(0.0, false),
        ];
        let est = estimate(&window);
        assert!((est.theta - 1.5f64.ln()).abs() < 1e-3);
        assert!((est.standard_error - 1.0 / 1.2f64.sqrt()).abs() < 1e-3);
        assert!(est.converged);
        assert!(!est.stopped_early);
        assert!(est.confidence_interval.contains(est.theta));
        assert!((est.confidence_interval.width() - 2.0 * 1.96 * est.standard_error).abs() < 1e-9);
    }

    #[test]
    fn test_all_correct_clamps_to_upper_bound() {
        let window = vec![obs(0.0, true); 5];
        let est = estimate(&window);
        assert_eq!(est.theta, 4.0);
        assert!(est.stopped_early);
        assert_eq!(est.stop_reason, Some(StopReason::DegeneratePattern));
        assert!(est.standard_error.is_finite() && est.standard_error >= 1.0);
        assert_eq!(est.iterations_used, 0);
    }

    #[test]
    fn test_all_incorrect_clamps_to_lower_bound() {
        let window = vec![obs(1.0, false); 4];
        let est = estimate(&window);
        assert_eq!(est.theta, -4.0);
        assert!(est.stopped_early);
        assert!(est.standard_error.is_finite());
        assert!(est.confidence_interval.low <= est.theta);
    }

    #[test]
    fn test_single_observation() {
        let est = estimate(&[obs(0.5, false)]);
        assert_eq!(est.theta, -4.0);
        assert_eq!(est.observations_used, 1);
        assert!(est.standard_error > 0.0 && est.standard_error.is_finite());
    }

    #[test]
    fn test_target_precision_stops_early() {
        let mut window = Vec::new();
        for i in 0..40 {
            window.push(obs(0.0, i % 2 == 0));
        }
        let est = estimate(&window);
        // I = 40 · 0.25 = 10 → SE ≈ 0.316 < 0.5
        assert!(est.theta.abs() < 1e-6);
        assert!(est.stopped_early);
        assert_eq!(est.stop_reason, Some(StopReason::TargetPrecision));
    }

    #[test]
    fn test_harder_items_answered_correctly_raise_theta() {
        let easy = [obs(-1.0, true), obs(-1.0, false), obs(-1.0, true)];
        let hard = [obs(1.5, true), obs(1.5, false), obs(1.5, true)];
        assert!(estimate(&hard).theta > estimate(&easy).theta);
    }

    #[test]
    fn test_window_keeps_most_recent() {
        let config = EstimatorConfig {
            window_size: 4,
            ..EstimatorConfig::default()
        };
        let estimator = AbilityEstimator::new(config);
        let mut window = vec![obs(0.0, false); 10];
        window.extend([obs(0.0, true), obs(0.0, true), obs(0.0, false), obs(0.0, true)]);
        let est = estimator.estimate(&window).unwrap().into_estimate().unwrap();
        assert_eq!(est.observations_used, 4);
        assert!(est.theta > 0.0);
    }

    #[test]
    fn test_mixed_window_beyond_range_reports_clamp() {
        let est = estimate(&[obs(6.0, true), obs(9.0, false)]);
        assert_eq!(est.theta, 4.0);
        assert!(!est.converged);
        assert!(est.stopped_early);
        assert_eq!(est.stop_reason, Some(StopReason::BoundaryClamp));
        assert!(AbilityEstimator::score(est.theta, &[obs(6.0, true), obs(9.0, false)]) > 0.5);
        assert!(est.standard_error.is_finite() && est.standard_error >= 1.0);

        let low = estimate(&[obs(-7.0, true), obs(-6.0, false)]);
        assert_eq!(low.theta, -4.0);
        assert_eq!(low.stop_reason, Some(StopReason::BoundaryClamp));
    }

    #[test]
    fn test_negative_response_time_rejected() {
        let window = [ResponseObservation::new(0.0, true, -1)];
        assert!(matches!(
            AbilityEstimator::default().estimate(&window),
            Err(CoreError::NegativeResponseTime { index: 0, value: -1 })
        ));
    }

    #[test]
    fn test_extreme_difficulties_stay_finite() {
        let window = [obs(-30.0, true), obs(30.0, false), obs(-30.0, false), obs(30.0, true)];
        let est = estimate(&window);
        assert!(est.theta.is_finite());
        assert!((-4.0..=4.0).contains(&est.theta));
        assert!(est.standard_error.is_finite() && est.standard_error > 0.0);
    }

    #[test]
    fn test_mean_response_time() {
        let window = [
            ResponseObservation::new(0.0, true, 1000),
            ResponseObservation::new(0.0, false, 3000),
        ];
        assert!((estimate(&window).mean_response_time_ms - 2000.0).abs() < 1e-9);
    }
}
