//! Response Simulation
//!
//! Draws Rasch-model responses for a learner with a known ability. Used to
//! check that the estimator recovers θ and to drive benchmarks.
//!
//! Seeded runs are fully reproducible.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::irt::AbilityEstimator;
use crate::scale::DifficultyScale;
use crate::types::ResponseObservation;

/// Mean and spread of simulated response latencies
const BASE_RESPONSE_MS: f64 = 3000.0;
const RESPONSE_JITTER_MS: f64 = 1500.0;

pub struct ResponseSimulator {
    theta: f64,
    rng: ChaCha8Rng,
}

impl ResponseSimulator {
    pub fn new(theta: f64, seed: u64) -> Self {
        Self {
            theta,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn respond(&mut self, difficulty: f64) -> ResponseObservation {
        let p = AbilityEstimator::probability(self.theta, difficulty);
        let correct = self.rng.gen::<f64>() < p;
        // harder-than-ability items take longer
        let offset = (difficulty - self.theta).clamp(-2.0, 2.0) * 400.0;
        let jitter = self.rng.gen_range(-RESPONSE_JITTER_MS..RESPONSE_JITTER_MS);
        let response_time_ms = (BASE_RESPONSE_MS + offset + jitter).max(200.0) as i64;
        ResponseObservation::new(difficulty, correct, response_time_ms)
    }

    /// `count` responses to items drawn uniformly from `[low, high)`.
    ///
    /// Panics unless `low < high`.
    pub fn session(&mut self, count: usize, low: f64, high: f64) -> Vec<ResponseObservation> {
        assert!(low < high, "empty difficulty range [{low}, {high})");
        (0..count)
            .map(|_| {
                let b = self.rng.gen_range(low..high);
                self.respond(b)
            })
            .collect()
    }

    /// `count` responses cycling through the bands of `scale`
    pub fn banded_session(
        &mut self,
        scale: &DifficultyScale,
        count: usize,
    ) -> Vec<ResponseObservation> {
        let params: Vec<f64> = scale
            .levels()
            .filter_map(|level| scale.to_parameter(level).ok())
            .collect();
        // every band set has at least one level, and its own levels always map
        (0..count)
            .map(|i| self.respond(params[i % params.len()]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let a = ResponseSimulator::new(0.5, 7).session(30, -2.0, 2.0);
        let b = ResponseSimulator::new(0.5, 7).session(30, -2.0, 2.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_response_times_non_negative() {
        let mut sim = ResponseSimulator::new(-1.0, 11);
        assert!(sim
            .session(200, -3.0, 3.0)
            .iter()
            .all(|obs| obs.response_time_ms >= 0));
    }

    #[test]
    fn test_high_ability_mostly_correct_on_easy_items() {
        let mut sim = ResponseSimulator::new(3.0, 3);
        let responses = sim.session(200, -2.0, -1.0);
        let correct = responses.iter().filter(|obs| obs.correct).count();
        assert!(correct > 180, "correct={correct}");
    }

    #[test]
    fn test_banded_session_cycles_bands() {
        let scale = DifficultyScale::three_band();
        let responses = ResponseSimulator::new(0.0, 1).banded_session(&scale, 6);
        let bs: Vec<f64> = responses.iter().map(|obs| obs.difficulty).collect();
        assert_eq!(bs, vec![-1.0, 0.0, 1.0, -1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_banded_session_covers_every_band_set() {
        for scale in [DifficultyScale::three_band(), DifficultyScale::five_band()] {
            let responses = ResponseSimulator::new(0.0, 5).banded_session(&scale, 10);
            assert_eq!(responses.len(), 10);
        }
    }

    #[test]
    #[should_panic(expected = "empty difficulty range")]
    fn test_session_rejects_empty_range() {
        ResponseSimulator::new(0.0, 1).session(5, 1.0, 1.0);
    }
}
