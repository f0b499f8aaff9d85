//! Estimation efficiency.
//!
//! Advisory "keep asking / stop asking" guidance from the closed-form
//! precision model `SE(n) ≈ 1 / sqrt(n · p̄(1 - p̄))`. Nothing here blocks
//! estimation.

use tracing::debug;

use crate::config::EfficiencyConfig;
use crate::types::{AbilityEstimate, EfficiencyReport, StopReason, TestingRecommendation};

#[derive(Debug, Clone, Default)]
pub struct EfficiencyAnalyzer {
    config: EfficiencyConfig,
}

impl EfficiencyAnalyzer {
    pub fn new(config: EfficiencyConfig) -> Self {
        Self { config }
    }

    /// Information contributed by one representative item
    pub fn item_information(&self) -> f64 {
        let p = self.config.representative_p;
        p * (1.0 - p)
    }

    pub fn standard_error_at(&self, observations: u32) -> Option<f64> {
        (observations > 0).then(|| 1.0 / (observations as f64 * self.item_information()).sqrt())
    }

    /// Smallest n with SE(n) strictly below the target
    pub fn observations_for_target(&self) -> u32 {
        required_observations(self.config.target_standard_error, self.item_information())
    }

    /// Share of the current standard error removed by one more observation.
    ///
    /// `1 - SE(n+1)/SE(n) = 1 - sqrt(n/(n+1))`; the first observation counts as 1.0.
    pub fn marginal_precision_gain(observations: u32) -> f64 {
        let n = observations as f64;
        1.0 - (n / (n + 1.0)).sqrt()
    }

    pub fn analyze(&self, observations_used: u32) -> EfficiencyReport {
        let required = self.observations_for_target();
        self.report(observations_used, required)
    }

    /// Same report, but with the per-item information inferred from an
    /// actual estimate instead of the worst-case p̄.
    ///
    /// Clamped estimates carry a floored standard error that says nothing
    /// about item information, so they get the worst-case report.
    pub fn analyze_estimate(&self, estimate: &AbilityEstimate) -> EfficiencyReport {
        let used = estimate.observations_used as u32;
        let clamped = matches!(
            estimate.stop_reason,
            Some(StopReason::DegeneratePattern | StopReason::BoundaryClamp)
        );
        if used == 0 || clamped || !(estimate.standard_error > 0.0) {
            return self.analyze(used);
        }
        let observed_information = 1.0 / (estimate.standard_error.powi(2) * used as f64);
        let required = required_observations(self.config.target_standard_error, observed_information);
        self.report(used, required)
    }

    fn report(&self, observations_used: u32, required: u32) -> EfficiencyReport {
        let additional = required.saturating_sub(observations_used);
        let recommendation = if additional == 0 {
            TestingRecommendation::StopAsking
        } else {
            TestingRecommendation::KeepAsking
        };

        debug!(
            observations_used,
            required,
            recommendation = recommendation.as_str(),
            "efficiency analyzed"
        );

        EfficiencyReport {
            observations_used,
            estimated_observations_for_target_precision: required,
            marginal_precision_gain: Self::marginal_precision_gain(observations_used),
            current_standard_error: self.standard_error_at(observations_used),
            additional_observations_needed: additional,
            recommendation,
        }
    }
}

fn required_observations(target_se: f64, item_information: f64) -> u32 {
    let exact = 1.0 / (target_se * target_se * item_information);
    if !exact.is_finite() {
        return u32::MAX;
    }
    let mut n = exact.ceil().max(1.0).min(u32::MAX as f64) as u32;
    // SE(n) == target exactly is not "below" the target
    if n < u32::MAX && 1.0 / (n as f64 * item_information).sqrt() >= target_se {
        n += 1;
    }
    n
}
