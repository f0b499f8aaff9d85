use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandSet {
    Three,
    #[default]
    Five,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScaleConfig {
    pub bands: BandSet,
    /// Distance between adjacent band centers on the ability scale
    pub spacing: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            bands: BandSet::Five,
            spacing: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EstimatorConfig {
    pub max_iterations: u32,
    pub tolerance: f64,
    pub theta_min: f64,
    pub theta_max: f64,
    /// Largest Newton step allowed per iteration
    pub max_step: f64,
    pub min_information: f64,
    /// z for the two-sided interval (1.96 = 95%)
    pub z_score: f64,
    pub target_standard_error: f64,
    /// SE floor reported for all-correct / all-incorrect patterns
    pub degenerate_min_standard_error: f64,
    pub min_observations: usize,
    /// Only the most recent `window_size` observations are used
    pub window_size: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            tolerance: 1e-4,
            theta_min: -4.0,
            theta_max: 4.0,
            max_step: 1.0,
            min_information: 1e-6,
            z_score: 1.96,
            target_standard_error: 0.5,
            degenerate_min_standard_error: 1.0,
            min_observations: 1,
            window_size: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EfficiencyConfig {
    pub target_standard_error: f64,
    /// Representative success probability; 0.5 is the worst case
    pub representative_p: f64,
}

impl Default for EfficiencyConfig {
    fn default() -> Self {
        Self {
            target_standard_error: 0.5,
            representative_p: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControllerConfig {
    pub high_score: f64,
    pub low_score: f64,
    pub high_confidence: u8,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            high_score: 80.0,
            low_score: 50.0,
            high_confidence: 4,
        }
    }
}

/// Calibration thresholds, fixed per analyzer instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalibrationPolicy {
    pub overconfident_threshold: f64,
    pub underconfident_threshold: f64,
    pub trend_threshold: f64,
}

impl Default for CalibrationPolicy {
    fn default() -> Self {
        Self {
            overconfident_threshold: 15.0,
            underconfident_threshold: -15.0,
            trend_threshold: 5.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub scale: ScaleConfig,
    pub estimator: EstimatorConfig,
    pub efficiency: EfficiencyConfig,
    pub controller: ControllerConfig,
    pub calibration: CalibrationPolicy,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(val) = env_parse::<f64>("DANCI_ADAPTIVE_TARGET_SE") {
            config.estimator.target_standard_error = val;
            config.efficiency.target_standard_error = val;
        }
        if let Some(val) = env_parse::<u32>("DANCI_ADAPTIVE_MAX_ITERATIONS") {
            config.estimator.max_iterations = val;
        }
        if let Some(val) = env_parse::<usize>("DANCI_ADAPTIVE_WINDOW_SIZE") {
            config.estimator.window_size = val;
        }
        if let Some(val) = env_parse::<f64>("DANCI_ADAPTIVE_THETA_BOUND") {
            config.estimator.theta_min = -val.abs();
            config.estimator.theta_max = val.abs();
        }
        if let Ok(val) = std::env::var("DANCI_ADAPTIVE_BANDS") {
            match val.trim() {
                "3" | "three" => config.scale.bands = BandSet::Three,
                "5" | "five" => config.scale.bands = BandSet::Five,
                other => warn!(value = other, "ignoring unrecognized DANCI_ADAPTIVE_BANDS"),
            }
        }
        if let Some(val) = env_parse::<f64>("DANCI_ADAPTIVE_CALIBRATION_THRESHOLD") {
            config.calibration.overconfident_threshold = val.abs();
            config.calibration.underconfident_threshold = -val.abs();
        }

        config
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let est = &self.estimator;
        if !(est.theta_min.is_finite() && est.theta_max.is_finite()) || est.theta_min >= est.theta_max {
            return Err(invalid(format!(
                "theta range [{}, {}] is empty",
                est.theta_min, est.theta_max
            )));
        }
        if est.max_iterations == 0 {
            return Err(invalid("maxIterations must be at least 1"));
        }
        if !(est.tolerance > 0.0) || !(est.max_step > 0.0) || !(est.min_information > 0.0) {
            return Err(invalid("tolerance, maxStep and minInformation must be positive"));
        }
        if !(est.z_score > 0.0) {
            return Err(invalid("zScore must be positive"));
        }
        if !(est.target_standard_error > 0.0) || !(est.degenerate_min_standard_error > 0.0) {
            return Err(invalid("standard error targets must be positive"));
        }
        if est.min_observations == 0 || est.window_size < est.min_observations {
            return Err(invalid("windowSize must be >= minObservations >= 1"));
        }

        let eff = &self.efficiency;
        if !(eff.target_standard_error > 0.0) {
            return Err(invalid("efficiency targetStandardError must be positive"));
        }
        if !(eff.representative_p > 0.0 && eff.representative_p < 1.0) {
            return Err(invalid("representativeP must lie strictly inside (0, 1)"));
        }

        let ctl = &self.controller;
        if !(0.0..=100.0).contains(&ctl.low_score)
            || !(0.0..=100.0).contains(&ctl.high_score)
            || ctl.low_score > ctl.high_score
        {
            return Err(invalid("controller scores must satisfy 0 <= lowScore <= highScore <= 100"));
        }
        if !(1..=5).contains(&ctl.high_confidence) {
            return Err(invalid("highConfidence must be in 1..=5"));
        }

        let cal = &self.calibration;
        if !(cal.overconfident_threshold >= 0.0) || !(cal.underconfident_threshold <= 0.0) {
            return Err(invalid(
                "overconfidentThreshold must be >= 0 and underconfidentThreshold <= 0",
            ));
        }
        if !(cal.trend_threshold >= 0.0) {
            return Err(invalid("trendThreshold must be >= 0"));
        }

        if !(self.scale.spacing > 0.0) || !self.scale.spacing.is_finite() {
            return Err(invalid("scale spacing must be positive"));
        }

        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> CoreError {
    CoreError::InvalidConfig(msg.into())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(val) => Some(val),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let config = EngineConfig::from_json(r#"{"estimator": {"maxIterations": 30}}"#).unwrap();
        assert_eq!(config.estimator.max_iterations, 30);
        assert_eq!(config.estimator.theta_max, 4.0);
        assert_eq!(config.calibration.overconfident_threshold, 15.0);
    }

    #[test]
    fn test_band_set_default_and_lowercase_json() {
        assert_eq!(BandSet::default(), BandSet::Five);
        let config = EngineConfig::from_json(r#"{"scale": {"bands": "three"}}"#).unwrap();
        assert_eq!(config.scale.bands, BandSet::Three);
        assert_eq!(serde_json::to_string(&BandSet::Five).unwrap(), r#""five""#);
    }

    #[test]
    fn test_from_json_rejects_empty_theta_range() {
        let err = EngineConfig::from_json(r#"{"estimator": {"thetaMin": 2.0, "thetaMax": 1.0}}"#)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_json_malformed() {
        let err = EngineConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, CoreError::ConfigParse(_)));
    }

    #[test]
    fn test_rejects_degenerate_representative_p() {
        let mut config = EngineConfig::default();
        config.efficiency.representative_p = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_calibration_thresholds() {
        let mut config = EngineConfig::default();
        config.calibration.underconfident_threshold = 10.0;
        assert!(config.validate().is_err());
    }
}
