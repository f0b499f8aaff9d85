use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calibration::CalibrationAnalyzer;
use crate::config::EngineConfig;
use crate::difficulty::DifficultyController;
use crate::error::Result;
use crate::irt::{AbilityEstimator, EfficiencyAnalyzer};
use crate::scale::DifficultyScale;
use crate::types::*;

/// One graded response as reported by the session layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseInput {
    /// Band the item was served at
    pub difficulty: DifficultyLevel,
    pub correct: bool,
    /// Score on the item, 0..=100
    pub score: f64,
    /// Self-reported confidence, 1..=5
    pub confidence_level: i64,
    pub response_time_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcome {
    /// The observation derived from the response; the caller appends it to its stored window
    pub observation: ResponseObservation,
    pub calibration: CalibrationResult,
    pub estimation: Estimation,
    pub efficiency: EfficiencyReport,
    pub adjustment: DifficultyAdjustment,
    /// Band nearest to the current ability estimate, when there is one
    pub ability_level: Option<DifficultyLevel>,
}

/// Stateless facade over the estimation core.
///
/// Holds configuration only. Every method is a pure function of its
/// arguments, so one engine can be shared across threads and learners.
#[derive(Debug, Clone)]
pub struct AdaptiveEngine {
    config: EngineConfig,
    scale: DifficultyScale,
    estimator: AbilityEstimator,
    efficiency: EfficiencyAnalyzer,
    controller: DifficultyController,
    calibration: CalibrationAnalyzer,
}

impl AdaptiveEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let scale = DifficultyScale::new(&config.scale);
        Self {
            estimator: AbilityEstimator::new(config.estimator.clone()),
            efficiency: EfficiencyAnalyzer::new(config.efficiency.clone()),
            controller: DifficultyController::new(config.controller.clone(), scale.clone()),
            calibration: CalibrationAnalyzer::new(config.calibration.clone()),
            scale,
            config,
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::new(EngineConfig::from_env())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scale(&self) -> &DifficultyScale {
        &self.scale
    }

    pub fn estimate_ability(&self, observations: &[ResponseObservation]) -> Result<Estimation> {
        self.estimator.estimate(observations)
    }

    pub fn estimate_efficiency(&self, observations_used: u32) -> EfficiencyReport {
        self.efficiency.analyze(observations_used)
    }

    pub fn adjust_difficulty(
        &self,
        current: DifficultyLevel,
        score: f64,
        confidence_level: i64,
    ) -> Result<DifficultyAdjustment> {
        self.controller.adjust_difficulty(current, score, confidence_level)
    }

    pub fn compute_calibration(&self, score: f64, confidence_level: i64) -> Result<CalibrationResult> {
        self.calibration.compute_calibration(score, confidence_level)
    }

    pub fn classify_trend(
        &self,
        previous_abs_delta: f64,
        recent_abs_delta: f64,
    ) -> Result<CalibrationTrend> {
        self.calibration
            .classify_trend(previous_abs_delta, recent_abs_delta)
    }

    /// Estimate many learners' windows in parallel; results keep input order
    pub fn estimate_ability_batch(
        &self,
        windows: &[Vec<ResponseObservation>],
    ) -> Vec<Result<Estimation>> {
        windows
            .par_iter()
            .map(|window| self.estimator.estimate(window))
            .collect()
    }

    /// Runs the per-response flow for one graded answer: calibrate the
    /// response, re-estimate ability over `window` plus the new observation,
    /// report efficiency, and pick the next band.
    pub fn process_response(
        &self,
        window: &[ResponseObservation],
        input: &ResponseInput,
    ) -> Result<StepOutcome> {
        let calibration = self
            .calibration
            .compute_calibration(input.score, input.confidence_level)?;

        let observation = ResponseObservation::new(
            self.scale.to_parameter(input.difficulty)?,
            input.correct,
            input.response_time_ms,
        );

        let mut observations = Vec::with_capacity(window.len() + 1);
        observations.extend_from_slice(window);
        observations.push(observation);

        let estimation = self.estimator.estimate(&observations)?;
        let efficiency = match estimation.estimate() {
            Some(estimate) => self.efficiency.analyze_estimate(estimate),
            None => self.efficiency.analyze(0),
        };
        let ability_level = estimation
            .estimate()
            .map(|estimate| self.scale.level_for_ability(estimate.theta))
            .transpose()?;

        let adjustment =
            self.controller
                .adjust_difficulty(input.difficulty, input.score, input.confidence_level)?;

        debug!(
            category = calibration.category.as_str(),
            reason = adjustment.reason_code.as_str(),
            next = adjustment.next_difficulty.get(),
            recommendation = efficiency.recommendation.as_str(),
            "response processed"
        );

        Ok(StepOutcome {
            observation,
            calibration,
            estimation,
            efficiency,
            adjustment,
            ability_level,
        })
    }
}

impl Default for AdaptiveEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}
