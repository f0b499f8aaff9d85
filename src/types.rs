//! Common Types and Constants
//!
//! Shared data structures used across all estimation modules.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

// ==================== Constants ====================

/// Lowest self-reported confidence level
pub const MIN_CONFIDENCE_LEVEL: i64 = 1;

/// Highest self-reported confidence level
pub const MAX_CONFIDENCE_LEVEL: i64 = 5;

/// Normalized confidence points per level step (1..5 -> 0..100)
pub const CONFIDENCE_STEP: f64 = 25.0;

/// Lowest valid performance score
pub const MIN_SCORE: f64 = 0.0;

/// Highest valid performance score
pub const MAX_SCORE: f64 = 100.0;

// ==================== Observation Types ====================

/// One graded response, as seen by the ability estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseObservation {
    /// Item difficulty parameter b on the ability scale
    pub difficulty: f64,
    /// Whether the response was graded correct
    pub correct: bool,
    /// Response latency in milliseconds (must be non-negative)
    pub response_time_ms: i64,
}

impl ResponseObservation {
    pub fn new(difficulty: f64, correct: bool, response_time_ms: i64) -> Self {
        Self {
            difficulty,
            correct,
            response_time_ms,
        }
    }
}

// ==================== Ability Types ====================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceInterval {
    pub low: f64,
    pub high: f64,
}

impl ConfidenceInterval {
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Why the estimator flagged `stopped_early`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopReason {
    /// All responses correct or all incorrect; theta clamped to the range bound
    DegeneratePattern,
    /// Mixed responses whose maximum-likelihood ability lies beyond the θ range
    BoundaryClamp,
    /// Standard error already below the configured target precision
    TargetPrecision,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DegeneratePattern => "DEGENERATE_PATTERN",
            Self::BoundaryClamp => "BOUNDARY_CLAMP",
            Self::TargetPrecision => "TARGET_PRECISION",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityEstimate {
    /// Latent ability on the logistic scale
    pub theta: f64,
    /// 1 / sqrt(I(theta)); strictly positive and finite
    pub standard_error: f64,
    pub confidence_interval: ConfidenceInterval,
    pub iterations_used: u32,
    pub stopped_early: bool,
    pub stop_reason: Option<StopReason>,
    /// Newton-Raphson reached the tolerance before the iteration cap
    pub converged: bool,
    /// Observations inside the window that contributed to the estimate
    pub observations_used: usize,
    pub mean_response_time_ms: f64,
}

/// Result of an ability estimation request.
///
/// An empty window is an expected condition, so it is a variant here
/// rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Estimation {
    Estimated(AbilityEstimate),
    #[serde(rename_all = "camelCase")]
    InsufficientData { observations: usize, required: usize },
}

impl Estimation {
    pub fn estimate(&self) -> Option<&AbilityEstimate> {
        match self {
            Self::Estimated(estimate) => Some(estimate),
            Self::InsufficientData { .. } => None,
        }
    }

    pub fn into_estimate(self) -> Option<AbilityEstimate> {
        match self {
            Self::Estimated(estimate) => Some(estimate),
            Self::InsufficientData { .. } => None,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}

// ==================== Efficiency Types ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestingRecommendation {
    KeepAsking,
    StopAsking,
}

impl TestingRecommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeepAsking => "KEEP_ASKING",
            Self::StopAsking => "STOP_ASKING",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EfficiencyReport {
    pub observations_used: u32,
    pub estimated_observations_for_target_precision: u32,
    /// Fraction of the current standard error removed by one more observation
    pub marginal_precision_gain: f64,
    /// Worst-case standard error at `observations_used`; `None` before any response
    pub current_standard_error: Option<f64>,
    pub additional_observations_needed: u32,
    pub recommendation: TestingRecommendation,
}

// ==================== Difficulty Types ====================

/// 1-based ordinal position on a [`DifficultyScale`](crate::scale::DifficultyScale)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DifficultyLevel(u8);

impl DifficultyLevel {
    pub const fn new(level: u8) -> Self {
        Self(level)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl From<u8> for DifficultyLevel {
    fn from(level: u8) -> Self {
        Self(level)
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-visible reason for a difficulty decision; UI copy keys off these labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    CorrectConfidentIncrease,
    IncorrectDecrease,
    OverconfidentCorrection,
    StablePerformance,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CorrectConfidentIncrease => "CORRECT_CONFIDENT_INCREASE",
            Self::IncorrectDecrease => "INCORRECT_DECREASE",
            Self::OverconfidentCorrection => "OVERCONFIDENT_CORRECTION",
            Self::StablePerformance => "STABLE_PERFORMANCE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "CORRECT_CONFIDENT_INCREASE" => Some(Self::CorrectConfidentIncrease),
            "INCORRECT_DECREASE" => Some(Self::IncorrectDecrease),
            "OVERCONFIDENT_CORRECTION" => Some(Self::OverconfidentCorrection),
            "STABLE_PERFORMANCE" => Some(Self::StablePerformance),
            _ => None,
        }
    }

    /// Intended band step before clamping at the scale extremes
    pub fn direction(&self) -> i32 {
        match self {
            Self::CorrectConfidentIncrease => 1,
            Self::IncorrectDecrease | Self::OverconfidentCorrection => -1,
            Self::StablePerformance => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyAdjustment {
    pub previous_difficulty: DifficultyLevel,
    pub next_difficulty: DifficultyLevel,
    /// Band step actually applied: -1, 0 or +1
    pub magnitude: i32,
    pub reason_code: ReasonCode,
    /// The decided step was blocked by the end of the scale
    pub clamped: bool,
}

// ==================== Calibration Types ====================

/// Self-reported confidence on the fixed 1..=5 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ConfidenceLevel(u8);

impl ConfidenceLevel {
    pub fn new(level: i64) -> Result<Self> {
        if (MIN_CONFIDENCE_LEVEL..=MAX_CONFIDENCE_LEVEL).contains(&level) {
            Ok(Self(level as u8))
        } else {
            Err(CoreError::InvalidConfidence(level))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Linear map 1..=5 -> 0..=100
    pub fn normalized(self) -> f64 {
        (self.0 as f64 - MIN_CONFIDENCE_LEVEL as f64) * CONFIDENCE_STEP
    }
}

impl TryFrom<i64> for ConfidenceLevel {
    type Error = CoreError;

    fn try_from(level: i64) -> Result<Self> {
        Self::new(level)
    }
}

impl From<ConfidenceLevel> for i64 {
    fn from(level: ConfidenceLevel) -> Self {
        level.0 as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalibrationCategory {
    Overconfident,
    Underconfident,
    Calibrated,
}

impl CalibrationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overconfident => "OVERCONFIDENT",
            Self::Underconfident => "UNDERCONFIDENT",
            Self::Calibrated => "CALIBRATED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "OVERCONFIDENT" => Some(Self::Overconfident),
            "UNDERCONFIDENT" => Some(Self::Underconfident),
            "CALIBRATED" => Some(Self::Calibrated),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationResult {
    /// Self-reported confidence on the 0..=100 scale
    pub confidence_normalized: f64,
    /// confidence_normalized - score; positive means overconfident
    pub delta: f64,
    pub category: CalibrationCategory,
}

impl CalibrationResult {
    /// The magnitude callers store and later pass to trend classification
    pub fn abs_delta(&self) -> f64 {
        self.delta.abs()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalibrationTrend {
    Improving,
    Stable,
    Worsening,
}

impl CalibrationTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improving => "IMPROVING",
            Self::Stable => "STABLE",
            Self::Worsening => "WORSENING",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "IMPROVING" => Some(Self::Improving),
            "STABLE" => Some(Self::Stable),
            "WORSENING" => Some(Self::Worsening),
            _ => None,
        }
    }
}
