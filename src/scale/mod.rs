//! Difficulty Scale
//!
//! Maps the ordinal difficulty vocabulary shown to learners onto the
//! continuous difficulty parameter b used by the Rasch model.
//!
//! Band centers are symmetric around 0 and one `spacing` apart:
//! - five bands, spacing 1.0: -2, -1, 0, 1, 2
//! - three bands, spacing 1.0: -1, 0, 1
//!
//! Each band owns the half-open interval `[center - spacing/2, center + spacing/2)`,
//! so a parameter sitting exactly on a boundary belongs to the harder band.
//! Parameters past either end resolve to the extreme band.

use crate::config::{BandSet, ScaleConfig};
use crate::error::{CoreError, Result};
use crate::sanitize::validate_parameter;
use crate::types::DifficultyLevel;

const THREE_BAND_LABELS: [&str; 3] = ["easy", "mid", "hard"];
const FIVE_BAND_LABELS: [&str; 5] = ["very_easy", "easy", "medium", "hard", "very_hard"];

#[derive(Debug, Clone)]
pub struct DifficultyScale {
    labels: &'static [&'static str],
    spacing: f64,
}

impl Default for DifficultyScale {
    fn default() -> Self {
        Self::new(&ScaleConfig::default())
    }
}

impl DifficultyScale {
    pub fn new(config: &ScaleConfig) -> Self {
        let labels: &'static [&'static str] = match config.bands {
            BandSet::Three => &THREE_BAND_LABELS,
            BandSet::Five => &FIVE_BAND_LABELS,
        };
        Self {
            labels,
            spacing: config.spacing,
        }
    }

    pub fn three_band() -> Self {
        Self::new(&ScaleConfig {
            bands: BandSet::Three,
            ..ScaleConfig::default()
        })
    }

    pub fn five_band() -> Self {
        Self::new(&ScaleConfig::default())
    }

    pub fn band_count(&self) -> u8 {
        self.labels.len() as u8
    }

    pub fn min_level(&self) -> DifficultyLevel {
        DifficultyLevel::new(1)
    }

    pub fn max_level(&self) -> DifficultyLevel {
        DifficultyLevel::new(self.band_count())
    }

    pub fn contains(&self, level: DifficultyLevel) -> bool {
        (1..=self.band_count()).contains(&level.get())
    }

    /// Pull an out-of-range level back onto the nearest end of the scale
    pub fn clamp(&self, level: DifficultyLevel) -> DifficultyLevel {
        DifficultyLevel::new(level.get().clamp(1, self.band_count()))
    }

    /// Move `delta` bands from `level`, stopping at the ends.
    ///
    /// Returns the new level and whether the move was cut short.
    pub fn step(&self, level: DifficultyLevel, delta: i32) -> (DifficultyLevel, bool) {
        let start = self.clamp(level).get() as i32;
        let wanted = start + delta;
        let landed = wanted.clamp(1, self.band_count() as i32);
        (DifficultyLevel::new(landed as u8), landed != wanted)
    }

    pub fn levels(&self) -> impl Iterator<Item = DifficultyLevel> + '_ {
        (1..=self.band_count()).map(DifficultyLevel::new)
    }

    pub fn label(&self, level: DifficultyLevel) -> Result<&'static str> {
        self.check(level)?;
        Ok(self.labels[level.get() as usize - 1])
    }

    /// Case-insensitive; `-` and spaces are read as `_`
    pub fn parse_label(&self, label: &str) -> Result<DifficultyLevel> {
        let normalized = label.trim().to_lowercase().replace(['-', ' '], "_");
        self.labels
            .iter()
            .position(|&l| l == normalized)
            .map(|idx| DifficultyLevel::new(idx as u8 + 1))
            .ok_or_else(|| CoreError::UnknownDifficultyLabel(label.to_string()))
    }

    pub fn to_parameter(&self, level: DifficultyLevel) -> Result<f64> {
        self.check(level)?;
        Ok((level.get() as f64 - self.midpoint()) * self.spacing)
    }

    pub fn label_to_parameter(&self, label: &str) -> Result<f64> {
        let level = self.parse_label(label)?;
        self.to_parameter(level)
    }

    pub fn from_parameter(&self, value: f64) -> Result<DifficultyLevel> {
        let value = validate_parameter(value)?;
        let position = value / self.spacing + self.midpoint();
        let band = (position + 0.5)
            .floor()
            .clamp(1.0, self.band_count() as f64);
        Ok(DifficultyLevel::new(band as u8))
    }

    pub fn label_for_parameter(&self, value: f64) -> Result<&'static str> {
        let level = self.from_parameter(value)?;
        self.label(level)
    }

    /// Band whose difficulty is nearest to an ability estimate, i.e. the band
    /// a learner at `theta` answers correctly about half the time.
    pub fn level_for_ability(&self, theta: f64) -> Result<DifficultyLevel> {
        self.from_parameter(theta)
    }

    fn midpoint(&self) -> f64 {
        (self.band_count() as f64 + 1.0) / 2.0
    }

    fn check(&self, level: DifficultyLevel) -> Result<()> {
        if self.contains(level) {
            Ok(())
        } else {
            Err(CoreError::InvalidDifficultyLevel {
                level: level.get(),
                max: self.band_count(),
            })
        }
    }
}
